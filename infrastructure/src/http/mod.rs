//! HTTP transports for the provider APIs
//!
//! One capability, three wire dialects: OpenAI-compatible chat
//! completions (also serving DeepSeek and Mistral at their own base
//! URLs), the Anthropic messages API, and the Gemini generateContent
//! API. The dialects differ only in envelope and auth; everything above
//! them sees `send(system, user, model, temperature, max_tokens)`.

pub mod anthropic;
pub mod gemini;
pub mod openai_compat;

use async_trait::async_trait;
use resolve_application::LlmError;

pub use anthropic::AnthropicTransport;
pub use gemini::GeminiTransport;
pub use openai_compat::OpenAiCompatTransport;

/// One prompt, one provider API, one text reply.
#[async_trait]
pub trait ProviderTransport: Send + Sync {
    async fn send(
        &self,
        system: &str,
        user: &str,
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError>;
}

/// Map a reqwest failure onto the port's error taxonomy.
pub(crate) fn map_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Transport(e.to_string())
    }
}

/// Error bodies are kept short; they end up in placeholder explanations.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let end = body
        .char_indices()
        .nth(MAX)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    format!("{}…", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_short_passthrough() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn test_truncate_body_long_is_clipped() {
        let long = "x".repeat(500);
        let clipped = truncate_body(&long);
        assert!(clipped.ends_with('…'));
        assert!(clipped.chars().count() <= 201);
    }
}
