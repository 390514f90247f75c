//! Arbitration use case
//!
//! Renders stance groups into neutral prose. Everything with a
//! deterministic shape (paragraph order, openers, the bold-span marker,
//! change sentences, the no-change literal) is assembled in code from the
//! domain helpers; the assisting model only supplies rationale text,
//! under strict JSON contracts. Both operations are stateless and fail
//! closed: degenerate assisting output is an error, never fabricated
//! content.

use crate::ports::llm::{AssistGateway, LlmError};
use resolve_domain::arbiter::{agreement_header, by_ascending_size, change_sentence, think_line};
use resolve_domain::prompt::assist::{
    arbiter_rationale_system, arbiter_rationale_user, arbiter_reasons_system,
    arbiter_reasons_user, arbiter_sections_system, arbiter_sections_user,
};
use resolve_domain::{ALL_STOOD_BY, AdvocateResult, StanceGroup, changed_providers, group_of};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from a summarization step. The underlying results and groups
/// stay valid and displayable even when one of these is returned.
#[derive(Error, Debug)]
pub enum ArbiterError {
    #[error("Arbiter request failed: {0}")]
    Request(#[from] LlmError),

    #[error("Arbiter returned an empty response")]
    Empty,

    #[error("Arbiter reply was malformed: {0}")]
    Malformed(String),

    #[error("Arbiter omitted the rationale for stance {0}")]
    MissingSection(String),

    #[error("Arbiter omitted the change reason for {0}")]
    MissingReason(String),
}

#[derive(Debug, Deserialize)]
struct SectionsReply {
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct Section {
    stance_id: String,
    rationale: String,
}

#[derive(Debug, Deserialize)]
struct ReasonsReply {
    reasons: HashMap<String, String>,
}

/// Use case producing the initial summary and the round-change summary.
pub struct Arbiter<A: AssistGateway> {
    assist: Arc<A>,
}

impl<A: AssistGateway> Arbiter<A> {
    pub fn new(assist: Arc<A>) -> Self {
        Self { assist }
    }

    /// Summarize a fresh classification.
    ///
    /// One group: a short rationale paragraph with no provider names,
    /// under a fixed agreement header. Several groups: one paragraph per
    /// group, smallest group first, each opened by the deterministic
    /// provider-list sentence.
    pub async fn summarize_initial(
        &self,
        groups: &[StanceGroup],
        results: &[AdvocateResult],
    ) -> Result<String, ArbiterError> {
        match groups {
            [] => Err(ArbiterError::Empty),
            [only] => self.summarize_agreement(only, results).await,
            _ => self.summarize_disagreement(groups, results).await,
        }
    }

    async fn summarize_agreement(
        &self,
        group: &StanceGroup,
        results: &[AdvocateResult],
    ) -> Result<String, ArbiterError> {
        let user = arbiter_rationale_user(&group.summary, results);
        let rationale = self
            .assist
            .complete(arbiter_rationale_system(), &user)
            .await?;
        let rationale = rationale.trim();

        if rationale.is_empty() {
            return Err(ArbiterError::Empty);
        }

        info!("Arbiter produced an agreement summary");
        Ok(format!("{}\n{}", agreement_header(&group.summary), rationale))
    }

    async fn summarize_disagreement(
        &self,
        groups: &[StanceGroup],
        results: &[AdvocateResult],
    ) -> Result<String, ArbiterError> {
        let user = arbiter_sections_user(groups, results);
        let reply = self
            .assist
            .complete_json(arbiter_sections_system(), &user)
            .await?;

        let parsed: SectionsReply =
            serde_json::from_str(reply.trim()).map_err(|e| ArbiterError::Malformed(e.to_string()))?;

        let rationales: HashMap<String, String> = parsed
            .sections
            .into_iter()
            .map(|s| (s.stance_id, s.rationale.trim().to_string()))
            .collect();

        let mut paragraphs = Vec::with_capacity(groups.len());
        for group in by_ascending_size(groups) {
            let rationale = rationales
                .get(&group.stance_id)
                .filter(|r| !r.is_empty())
                .ok_or_else(|| ArbiterError::MissingSection(group.stance_id.clone()))?;
            paragraphs.push(format!("{}\n{}", think_line(&group.members), rationale));
        }

        info!("Arbiter produced a {}-stance summary", groups.len());
        Ok(paragraphs.join("\n\n"))
    }

    /// Summarize what changed between two rounds.
    ///
    /// Membership-based change detection happens here in code; the model
    /// is consulted only for the per-provider reason clauses, and only
    /// when something actually changed.
    pub async fn summarize_changes(
        &self,
        previous_groups: &[StanceGroup],
        previous_results: &[AdvocateResult],
        new_groups: &[StanceGroup],
        new_results: &[AdvocateResult],
    ) -> Result<String, ArbiterError> {
        let changed = changed_providers(previous_groups, new_groups);
        if changed.is_empty() {
            info!("No stance changes this round");
            return Ok(ALL_STOOD_BY.to_string());
        }

        let user = arbiter_reasons_user(
            &changed,
            previous_groups,
            previous_results,
            new_groups,
            new_results,
        );
        let reply = self
            .assist
            .complete_json(arbiter_reasons_system(), &user)
            .await?;

        let parsed: ReasonsReply =
            serde_json::from_str(reply.trim()).map_err(|e| ArbiterError::Malformed(e.to_string()))?;

        let mut sentences = Vec::with_capacity(changed.len());
        for provider in changed {
            let name = provider.display_name();
            let reason = parsed
                .reasons
                .get(name)
                .map(|r| r.trim())
                .filter(|r| !r.is_empty())
                .ok_or_else(|| ArbiterError::MissingReason(name.to_string()))?;

            let old_summary = group_of(previous_groups, provider)
                .map(|g| g.summary.as_str())
                .unwrap_or_default();
            let new_summary = group_of(new_groups, provider)
                .map(|g| g.summary.as_str())
                .unwrap_or_default();

            sentences.push(change_sentence(provider, old_summary, new_summary, reason));
        }

        info!("Arbiter summarized {} stance change(s)", sentences.len());
        Ok(sentences.join("\n"))
    }
}
