//! Option labeling use case
//!
//! Delegates option extraction to the assisting model and validates the
//! reply in the domain. A failure here is terminal for the submission:
//! the caller surfaces the reason and never fans out.

use crate::ports::llm::AssistGateway;
use resolve_domain::prompt::assist::labeler_system;
use resolve_domain::{LabelError, LabeledQuestion, parse_labeler_reply};
use std::sync::Arc;
use tracing::{debug, info};

/// Use case for extracting canonical options from closed-form questions.
pub struct OptionLabeler<A: AssistGateway> {
    assist: Arc<A>,
}

impl<A: AssistGateway> OptionLabeler<A> {
    pub fn new(assist: Arc<A>) -> Self {
        Self { assist }
    }

    /// Extract stem + labeled options from raw pasted text.
    pub async fn label(&self, raw_question: &str) -> Result<LabeledQuestion, LabelError> {
        let reply = self
            .assist
            .complete_json(labeler_system(), raw_question)
            .await
            .map_err(|e| LabelError::AssistUnavailable(e.to_string()))?;

        debug!("Labeler reply: {} bytes", reply.len());
        let labeled = parse_labeler_reply(&reply)?;
        info!(
            "Labeled question with {} options",
            labeled.options.len()
        );
        Ok(labeled)
    }
}
