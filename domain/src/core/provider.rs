//! Provider value object — the closed panel of advocate identities
//!
//! The panel is a fixed set with a fixed ordering. The ordering is
//! load-bearing: fan-out output, stance-group membership lists, and every
//! user-visible enumeration are sorted by it, so downstream consumers
//! never observe completion-order nondeterminism.

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the five advocate providers (Value Object)
///
/// Declaration order is the canonical global ordering; `Ord` follows it.
/// The set is closed by design — providers are never created or removed
/// at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Gemini,
    DeepSeek,
    Mistral,
}

impl Provider {
    /// All providers in canonical order.
    pub const ALL: [Provider; 5] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Gemini,
        Provider::DeepSeek,
        Provider::Mistral,
    ];

    /// Number of providers on the panel.
    pub const COUNT: usize = Self::ALL.len();

    /// Stable machine identifier (used in config and serialized records).
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::DeepSeek => "deepseek",
            Provider::Mistral => "mistral",
        }
    }

    /// Name shown to users and to the assisting models.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "ChatGPT",
            Provider::Anthropic => "Claude",
            Provider::Gemini => "Gemini",
            Provider::DeepSeek => "DeepSeek",
            Provider::Mistral => "Mistral",
        }
    }

    /// Position in the canonical ordering.
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Reverse lookup by the display name used in assisting-model JSON.
    pub fn from_display_name(name: &str) -> Option<Provider> {
        Self::ALL.iter().copied().find(|p| p.display_name() == name)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| DomainError::UnknownProvider(s.to_string()))
    }
}

impl Serialize for Provider {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_matches_ord() {
        let mut shuffled = vec![
            Provider::Mistral,
            Provider::OpenAi,
            Provider::DeepSeek,
            Provider::Anthropic,
            Provider::Gemini,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Provider::ALL.to_vec());
    }

    #[test]
    fn test_ordinal_is_position_in_all() {
        for (i, provider) in Provider::ALL.iter().enumerate() {
            assert_eq!(provider.ordinal(), i);
        }
    }

    #[test]
    fn test_str_roundtrip() {
        for provider in Provider::ALL {
            let parsed: Provider = provider.as_str().parse().unwrap();
            assert_eq!(parsed, provider);
        }
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result: Result<Provider, _> = "grok".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_display_name_lookup() {
        assert_eq!(Provider::from_display_name("Claude"), Some(Provider::Anthropic));
        assert_eq!(Provider::from_display_name("ChatGPT"), Some(Provider::OpenAi));
        assert_eq!(Provider::from_display_name("HAL 9000"), None);
    }

    #[test]
    fn test_serde_uses_stable_id() {
        let json = serde_json::to_string(&Provider::DeepSeek).unwrap();
        assert_eq!(json, "\"deepseek\"");
        let back: Provider = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Provider::DeepSeek);
    }
}
