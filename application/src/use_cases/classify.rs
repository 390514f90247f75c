//! Stance classification use case
//!
//! Chooses the strategy by problem type: closed-form answers are grouped
//! deterministically with no model call; open-ended answers go to the
//! assisting model, validated against the coverage invariant, with a
//! guaranteed singleton fallback. This use case never fails — worst case
//! it degrades to one group per advocate.

use crate::ports::llm::AssistGateway;
use resolve_domain::prompt::assist::{classifier_system, classifier_user};
use resolve_domain::stance::classify::parse_classifier_reply;
use resolve_domain::{
    AdvocateResult, ProblemType, StanceGroup, classify_closed_form, resolve_classifier_groups,
    singleton_fallback,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for grouping advocate answers into stances.
pub struct StanceClassifier<A: AssistGateway> {
    assist: Arc<A>,
}

impl<A: AssistGateway> StanceClassifier<A> {
    pub fn new(assist: Arc<A>) -> Self {
        Self { assist }
    }

    /// Group the results into stances. Infallible by design.
    pub async fn classify(
        &self,
        problem_type: ProblemType,
        question: &str,
        results: &[AdvocateResult],
    ) -> Vec<StanceGroup> {
        if problem_type.is_closed_form() {
            let groups = classify_closed_form(results);
            info!("Closed-form classification: {} group(s)", groups.len());
            return groups;
        }

        match self.classify_open_ended(question, results).await {
            Some(groups) => {
                info!("Semantic classification: {} group(s)", groups.len());
                groups
            }
            None => {
                warn!("Semantic classification unavailable; using singleton fallback");
                singleton_fallback(results)
            }
        }
    }

    /// One assisting call; `None` on any transport, parse, or invariant
    /// failure.
    async fn classify_open_ended(
        &self,
        question: &str,
        results: &[AdvocateResult],
    ) -> Option<Vec<StanceGroup>> {
        let user = classifier_user(question, results);

        let reply = match self.assist.complete_json(classifier_system(), &user).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Classifier call failed: {}", e);
                return None;
            }
        };

        let parsed = match parse_classifier_reply(&reply) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Classifier reply unparsable: {}", e);
                debug!("Classifier reply was: {}", reply);
                return None;
            }
        };

        resolve_classifier_groups(parsed, results)
    }
}
