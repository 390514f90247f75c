//! Configuration file schema
//!
//! One `[providers.<name>]` table per advocate, an `[assist]` table for
//! the assisting model, and `[deliberation]` for pipeline knobs. Keys are
//! resolved through environment-variable indirection by default; a
//! literal `api_key` in the file overrides the env var.

use serde::{Deserialize, Serialize};

/// One provider binding: where to reach it and with which model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEntry {
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Direct API key (overrides the env var; not recommended).
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ProviderEntry {
    fn default() -> Self {
        Self {
            api_key_env: String::new(),
            api_key: None,
            base_url: String::new(),
            model: String::new(),
            max_tokens: 240,
            temperature: 0.2,
        }
    }
}

impl ProviderEntry {
    fn preset(api_key_env: &str, base_url: &str, model: &str) -> Self {
        Self {
            api_key_env: api_key_env.to_string(),
            base_url: base_url.to_string(),
            model: model.to_string(),
            ..Default::default()
        }
    }

    /// The effective API key: file override first, then the env var.
    /// Empty when neither is set — the gateway turns that into a
    /// missing-key placeholder instead of a request.
    pub fn resolve_api_key(&self) -> String {
        if let Some(key) = &self.api_key
            && !key.trim().is_empty()
        {
            return key.trim().to_string();
        }
        std::env::var(&self.api_key_env).unwrap_or_default()
    }
}

/// The five advocate bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub openai: ProviderEntry,
    pub anthropic: ProviderEntry,
    pub gemini: ProviderEntry,
    pub deepseek: ProviderEntry,
    pub mistral: ProviderEntry,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            openai: ProviderEntry::preset(
                "OPENAI_API_KEY",
                "https://api.openai.com/v1",
                "gpt-4.1-mini",
            ),
            anthropic: ProviderEntry::preset(
                "ANTHROPIC_API_KEY",
                "https://api.anthropic.com",
                "claude-sonnet-4-20250514",
            ),
            gemini: ProviderEntry::preset(
                "GEMINI_API_KEY",
                "https://generativelanguage.googleapis.com",
                "gemini-2.0-flash",
            ),
            deepseek: ProviderEntry::preset(
                "DEEPSEEK_API_KEY",
                "https://api.deepseek.com/v1",
                "deepseek-chat",
            ),
            mistral: ProviderEntry::preset(
                "MISTRAL_API_KEY",
                "https://api.mistral.ai/v1",
                "mistral-small-latest",
            ),
        }
    }
}

/// The assisting model backing labeler, classifier, and arbiter calls.
/// Always an OpenAI-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 600,
            temperature: 0.1,
        }
    }
}

impl AssistConfig {
    pub fn resolve_api_key(&self) -> String {
        if let Some(key) = &self.api_key
            && !key.trim().is_empty()
        {
            return key.trim().to_string();
        }
        std::env::var(&self.api_key_env).unwrap_or_default()
    }
}

/// Pipeline knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliberationConfig {
    /// Per-call deadline for every provider and assisting call.
    pub request_timeout_secs: u64,
}

impl Default for DeliberationConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub providers: ProvidersConfig,
    pub assist: AssistConfig,
    pub deliberation: DeliberationConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_all_five_providers() {
        let config = FileConfig::default();
        assert_eq!(config.providers.openai.api_key_env, "OPENAI_API_KEY");
        assert!(config.providers.anthropic.base_url.contains("anthropic"));
        assert!(config.providers.gemini.base_url.contains("googleapis"));
        assert!(config.providers.deepseek.base_url.contains("deepseek"));
        assert!(config.providers.mistral.base_url.contains("mistral"));
        assert_eq!(config.deliberation.request_timeout_secs, 30);
    }

    #[test]
    fn test_file_key_overrides_env_indirection() {
        let entry = ProviderEntry {
            api_key: Some("  sk-literal  ".to_string()),
            api_key_env: "RESOLVE_TEST_UNSET_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(entry.resolve_api_key(), "sk-literal");
    }

    #[test]
    fn test_missing_key_resolves_empty() {
        let entry = ProviderEntry {
            api_key_env: "RESOLVE_TEST_DEFINITELY_UNSET".to_string(),
            ..Default::default()
        };
        assert_eq!(entry.resolve_api_key(), "");
    }

    #[test]
    fn test_partial_toml_merges_over_defaults() {
        let toml = r#"
            [providers.openai]
            model = "gpt-4.1"

            [deliberation]
            request_timeout_secs = 10
        "#;
        use figment::providers::{Format, Serialized, Toml};

        let config: FileConfig = figment::Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::string(toml))
            .extract()
            .unwrap();

        assert_eq!(config.providers.openai.model, "gpt-4.1");
        // Untouched fields keep their defaults
        assert_eq!(config.providers.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.deliberation.request_timeout_secs, 10);
        assert_eq!(config.assist.model, "gpt-4o-mini");
    }
}
