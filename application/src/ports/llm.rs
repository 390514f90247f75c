//! LLM gateway ports
//!
//! Two capabilities: the advocate panel (one bound model per provider)
//! and the assisting model used for labeling, classification, and
//! arbitration. Model choice, credentials, temperatures, and transport
//! all belong to the adapter; use cases only hand over prompt text.

use async_trait::async_trait;
use resolve_domain::Provider;
use thiserror::Error;

/// Errors from an LLM call. Per-provider failures in the fan-out are
/// converted to placeholder results by the caller; assisting-call
/// failures surface to each use case's own recovery policy.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Empty response body")]
    EmptyResponse,
}

/// Gateway to the advocate panel.
///
/// One call queries one provider's bound model with that provider's
/// system prompt and a user message, returning raw reply text.
#[async_trait]
pub trait AdvocateGateway: Send + Sync {
    async fn query(
        &self,
        provider: Provider,
        system: &str,
        user: &str,
    ) -> Result<String, LlmError>;
}

/// Gateway to the assisting model backing labeler, classifier, and
/// arbiter calls.
#[async_trait]
pub trait AssistGateway: Send + Sync {
    /// Free-text completion.
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;

    /// Completion constrained to a JSON object reply (strict-JSON
    /// contracts: labeler, classifier, arbiter sections/reasons).
    async fn complete_json(&self, system: &str, user: &str) -> Result<String, LlmError>;
}
