//! Stance classification strategies
//!
//! Closed-form answers are grouped deterministically by a canonical key;
//! open-ended answers are grouped by an assisting model whose JSON reply
//! is validated here against the coverage invariant. Everything in this
//! module is pure — the assisting call itself lives in the application
//! layer, which feeds the raw reply text in.

use crate::advocate::result::AdvocateResult;
use crate::core::provider::Provider;
use crate::stance::group::{StanceGroup, covers_exactly_once};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Canonical key for the empty option set.
const EMPTY_KEY: &str = "∅";

/// Canonicalize a closed-form summary so that two answers share a key iff
/// they denote the same option set.
///
/// Splits on commas, trims and upper-cases each token, drops empties,
/// sorts, and rejoins: `"A, B"`, `"b,a"`, and `" A ,B "` all become
/// `"A, B"`.
pub fn canonical_key(summary: &str) -> String {
    let mut parts: Vec<String> = summary
        .split(',')
        .map(|part| part.trim().to_uppercase())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        return EMPTY_KEY.to_string();
    }

    parts.sort();
    parts.join(", ")
}

/// Group closed-form answers by canonical key. No assisting call.
///
/// Stance ids are assigned by ascending canonical-key order; members
/// within each group follow canonical provider order.
pub fn classify_closed_form(results: &[AdvocateResult]) -> Vec<StanceGroup> {
    // BTreeMap gives the ascending key order for stance-id assignment
    let mut by_key: BTreeMap<String, Vec<Provider>> = BTreeMap::new();
    for result in results {
        by_key
            .entry(canonical_key(&result.summary))
            .or_default()
            .push(result.provider);
    }

    by_key
        .into_iter()
        .enumerate()
        .map(|(index, (key, members))| StanceGroup::new(index, members, key))
        .collect()
}

/// Degenerate fallback: one singleton group per advocate, in provider
/// order, each summarized by that advocate's own summary.
///
/// Guarantees forward progress whenever the assisting classification is
/// unavailable or returns an invalid grouping.
pub fn singleton_fallback(results: &[AdvocateResult]) -> Vec<StanceGroup> {
    let mut ordered: Vec<&AdvocateResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.provider.ordinal());

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            StanceGroup::new(index, vec![result.provider], result.summary.clone())
        })
        .collect()
}

/// The strict JSON contract the assisting classifier must honor.
#[derive(Debug, Deserialize)]
pub struct ClassifierReply {
    pub groups: Vec<ClassifierReplyGroup>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifierReplyGroup {
    pub stance_id: String,
    pub members: Vec<String>,
    pub stance_summary: String,
}

/// Parse the raw classifier reply text.
pub fn parse_classifier_reply(raw: &str) -> Result<ClassifierReply, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

/// Validate an assisting classifier reply and convert it into stance
/// groups, or `None` when it must be rejected.
///
/// Rejection reasons: a member name that is not a panel display name, a
/// provider missing or duplicated, or empty groups — i.e. any violation
/// of the coverage invariant. Groups are re-numbered S1… in the reply's
/// stance-id order, members normalized to provider order.
pub fn resolve_classifier_groups(
    reply: ClassifierReply,
    results: &[AdvocateResult],
) -> Option<Vec<StanceGroup>> {
    let mut raw_groups = reply.groups;
    raw_groups.sort_by(|a, b| a.stance_id.cmp(&b.stance_id));

    let mut groups = Vec::with_capacity(raw_groups.len());
    for (index, raw) in raw_groups.into_iter().enumerate() {
        let mut members = Vec::with_capacity(raw.members.len());
        for name in &raw.members {
            members.push(Provider::from_display_name(name)?);
        }
        groups.push(StanceGroup::new(index, members, raw.stance_summary));
    }

    // The reply must cover exactly the providers that were classified.
    // The panel is fixed, so input coverage equals panel coverage.
    if results.len() != Provider::COUNT || !covers_exactly_once(&groups) {
        return None;
    }

    Some(groups)
}
