//! Stance group value object and the coverage invariant

use crate::core::provider::Provider;
use serde::{Deserialize, Serialize};

/// A cluster of advocates whose answers agree in bottom-line outcome
///
/// Rebuilt from scratch on every classification. The `stance_id` ("S1",
/// "S2", …) is unique only within one classification — it is re-derived
/// each call and must never be compared across rounds; round-to-round
/// change detection goes through membership instead (see
/// [`super::diff`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanceGroup {
    pub stance_id: String,
    /// Members in canonical provider order
    pub members: Vec<Provider>,
    /// Short human-readable description of the shared stance
    pub summary: String,
}

impl StanceGroup {
    /// Create a group with the conventional id for its 0-based index,
    /// normalizing member order.
    pub fn new(index: usize, mut members: Vec<Provider>, summary: impl Into<String>) -> Self {
        members.sort_by_key(|p| p.ordinal());
        Self {
            stance_id: format!("S{}", index + 1),
            members,
            summary: summary.into(),
        }
    }

    pub fn contains(&self, provider: Provider) -> bool {
        self.members.contains(&provider)
    }

    pub fn is_unanimous(&self) -> bool {
        self.members.len() == Provider::COUNT
    }
}

/// The classification invariant: every provider on the panel appears in
/// exactly one group, and no group names an outsider.
pub fn covers_exactly_once(groups: &[StanceGroup]) -> bool {
    let mut seen = [0usize; Provider::COUNT];
    for group in groups {
        for provider in &group.members {
            seen[provider.ordinal()] += 1;
        }
    }
    seen.iter().all(|&count| count == 1)
}

/// The group a provider belongs to, if any.
pub fn group_of(groups: &[StanceGroup], provider: Provider) -> Option<&StanceGroup> {
    groups.iter().find(|g| g.contains(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_are_normalized() {
        let group = StanceGroup::new(0, vec![Provider::Mistral, Provider::OpenAi], "B");
        assert_eq!(group.stance_id, "S1");
        assert_eq!(group.members, vec![Provider::OpenAi, Provider::Mistral]);
    }

    #[test]
    fn test_full_coverage_holds() {
        let groups = vec![
            StanceGroup::new(0, vec![Provider::OpenAi, Provider::Anthropic], "A"),
            StanceGroup::new(
                1,
                vec![Provider::Gemini, Provider::DeepSeek, Provider::Mistral],
                "B",
            ),
        ];
        assert!(covers_exactly_once(&groups));
    }

    #[test]
    fn test_missing_provider_fails_coverage() {
        let groups = vec![StanceGroup::new(
            0,
            vec![Provider::OpenAi, Provider::Anthropic],
            "A",
        )];
        assert!(!covers_exactly_once(&groups));
    }

    #[test]
    fn test_duplicate_provider_fails_coverage() {
        let groups = vec![
            StanceGroup::new(0, Provider::ALL.to_vec(), "A"),
            StanceGroup::new(1, vec![Provider::Gemini], "B"),
        ];
        assert!(!covers_exactly_once(&groups));
    }

    #[test]
    fn test_group_lookup() {
        let groups = vec![
            StanceGroup::new(0, vec![Provider::OpenAi], "A"),
            StanceGroup::new(1, vec![Provider::Gemini], "B"),
        ];
        assert_eq!(group_of(&groups, Provider::Gemini).unwrap().stance_id, "S2");
        assert!(group_of(&groups, Provider::Mistral).is_none());
    }
}
