//! Advocate result value object

use crate::core::provider::Provider;
use serde::{Deserialize, Serialize};

/// Sentinel summary for any per-provider failure other than a missing key.
pub const NO_RESPONSE_SUMMARY: &str = "No response.";

/// Sentinel summary when a provider has no API key configured.
pub const MISSING_KEY_SUMMARY: &str = "Missing API key.";

/// One advocate's answer for one round (Value Object)
///
/// Immutable once produced. A later round supersedes the result for the
/// same provider with a fresh value; nothing is mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvocateResult {
    /// Which advocate produced this answer
    pub provider: Provider,
    /// Free-text justification (target ≤120 words, enforced by prompt)
    pub explanation: String,
    /// Canonical short answer: a letter, comma-joined letters, or one sentence
    pub summary: String,
}

impl AdvocateResult {
    pub fn new(
        provider: Provider,
        explanation: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            explanation: explanation.into(),
            summary: summary.into(),
        }
    }

    /// Placeholder for a provider that failed to answer (network error,
    /// bad status, malformed body, timeout). The failure never escapes the
    /// batch; it rides along as an inline result.
    pub fn no_response(provider: Provider, explanation: impl Into<String>) -> Self {
        Self::new(provider, explanation, NO_RESPONSE_SUMMARY)
    }

    /// Placeholder for a provider with no credential configured.
    pub fn missing_key(provider: Provider) -> Self {
        Self::new(
            provider,
            format!("Missing API key for {}.", provider.display_name()),
            MISSING_KEY_SUMMARY,
        )
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.display_name()
    }
}

/// Sort results into the canonical provider ordering.
///
/// Fan-out completion order is a race; every consumer downstream of the
/// fan-out sees this normalized ordering instead.
pub fn into_provider_order(mut results: Vec<AdvocateResult>) -> Vec<AdvocateResult> {
    results.sort_by_key(|r| r.provider.ordinal());
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_summaries() {
        let down = AdvocateResult::no_response(Provider::Gemini, "HTTP 500");
        assert_eq!(down.summary, NO_RESPONSE_SUMMARY);
        assert_eq!(down.explanation, "HTTP 500");

        let keyless = AdvocateResult::missing_key(Provider::Mistral);
        assert_eq!(keyless.summary, MISSING_KEY_SUMMARY);
        assert!(keyless.explanation.contains("Mistral"));
    }

    #[test]
    fn test_order_normalization() {
        let scrambled = vec![
            AdvocateResult::new(Provider::Mistral, "e", "s"),
            AdvocateResult::new(Provider::OpenAi, "e", "s"),
            AdvocateResult::new(Provider::DeepSeek, "e", "s"),
        ];
        let ordered = into_provider_order(scrambled);
        let providers: Vec<Provider> = ordered.iter().map(|r| r.provider).collect();
        assert_eq!(
            providers,
            vec![Provider::OpenAi, Provider::DeepSeek, Provider::Mistral]
        );
    }
}
