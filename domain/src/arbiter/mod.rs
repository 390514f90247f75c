//! Pure assembly helpers for arbiter output
//!
//! The arbiter's natural-language rationales come from an assisting model
//! (application layer); everything with a deterministic shape — paragraph
//! ordering, the "`<providers> think:`" openers, the bold-span marker, the
//! change sentences — is assembled here in code so its wording never
//! depends on model behavior.

use crate::advocate::result::AdvocateResult;
use crate::core::provider::Provider;
use crate::stance::group::StanceGroup;
use serde_json::{Value, json};

/// Opening marker of the rich-text emphasis span. The consuming UI renders
/// only this convention — never markdown.
pub const BOLD_OPEN: &str = "<bold>";

/// Closing marker of the rich-text emphasis span.
pub const BOLD_CLOSE: &str = "</bold>";

/// Wrap text in the emphasis span.
pub fn bold(text: &str) -> String {
    format!("{BOLD_OPEN}{text}{BOLD_CLOSE}")
}

/// The deterministic paragraph opener for a stance group.
///
/// Joins member display names with correct conjunction grammar: a bare
/// name for one member, an "and" join for two, an Oxford-comma list for
/// three or more. Singular/plural verb agrees with member count.
pub fn think_line(members: &[Provider]) -> String {
    let names: Vec<&str> = members.iter().map(|p| p.display_name()).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => format!("{only} thinks:"),
        [first, second] => format!("{first} and {second} think:"),
        [init @ .., last] => format!("{}, and {} think:", init.join(", "), last),
    }
}

/// Groups ordered for the initial summary: ascending member count,
/// ties broken by stance id so the ordering is total.
pub fn by_ascending_size(groups: &[StanceGroup]) -> Vec<&StanceGroup> {
    let mut ordered: Vec<&StanceGroup> = groups.iter().collect();
    ordered.sort_by(|a, b| {
        a.members
            .len()
            .cmp(&b.members.len())
            .then_with(|| a.stance_id.cmp(&b.stance_id))
    });
    ordered
}

/// Header line for the unanimous case.
pub fn agreement_header(stance_summary: &str) -> String {
    format!(
        "All advocates agreed with this stance: {}",
        bold(stance_summary)
    )
}

/// One change sentence for `summarize_changes`.
pub fn change_sentence(
    provider: Provider,
    old_summary: &str,
    new_summary: &str,
    reason: &str,
) -> String {
    let reason = reason.trim().trim_end_matches('.');
    format!(
        "{} changed stance from {} to {} because {}.",
        provider.display_name(),
        old_summary,
        new_summary,
        reason
    )
}

/// Provider→stance mapping handed to the assisting model, one entry per
/// provider in stance-id order.
pub fn stance_mapping_json(groups: &[StanceGroup]) -> Value {
    let mut ordered: Vec<&StanceGroup> = groups.iter().collect();
    ordered.sort_by(|a, b| a.stance_id.cmp(&b.stance_id));

    let items: Vec<Value> = ordered
        .iter()
        .flat_map(|group| {
            group.members.iter().map(move |provider| {
                json!({
                    "provider": provider.display_name(),
                    "stance_id": group.stance_id,
                    "stance_summary": group.summary,
                })
            })
        })
        .collect();

    Value::Array(items)
}

/// Advocate results as JSON for the assisting model, in provider order.
pub fn results_json(results: &[AdvocateResult]) -> Value {
    let mut ordered: Vec<&AdvocateResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.provider.ordinal());

    let items: Vec<Value> = ordered
        .iter()
        .map(|result| {
            json!({
                "provider": result.provider_name(),
                "summary": result.summary,
                "explanation": result.explanation,
            })
        })
        .collect();

    Value::Array(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_think_line_grammar() {
        assert_eq!(think_line(&[Provider::Anthropic]), "Claude thinks:");
        assert_eq!(
            think_line(&[Provider::OpenAi, Provider::Anthropic]),
            "ChatGPT and Claude think:"
        );
        assert_eq!(
            think_line(&[Provider::OpenAi, Provider::Anthropic, Provider::Gemini]),
            "ChatGPT, Claude, and Gemini think:"
        );
        assert_eq!(
            think_line(&Provider::ALL),
            "ChatGPT, Claude, Gemini, DeepSeek, and Mistral think:"
        );
    }

    #[test]
    fn test_ascending_size_with_stable_ties() {
        let groups = vec![
            StanceGroup::new(0, vec![Provider::OpenAi, Provider::Anthropic], "A"),
            StanceGroup::new(1, vec![Provider::Gemini], "B"),
            StanceGroup::new(2, vec![Provider::DeepSeek], "C"),
        ];
        let ordered = by_ascending_size(&groups);
        let ids: Vec<&str> = ordered.iter().map(|g| g.stance_id.as_str()).collect();
        assert_eq!(ids, vec!["S2", "S3", "S1"]);
    }

    #[test]
    fn test_agreement_header_uses_span_marker() {
        let header = agreement_header("Canberra is the capital.");
        assert_eq!(
            header,
            "All advocates agreed with this stance: <bold>Canberra is the capital.</bold>"
        );
    }

    #[test]
    fn test_change_sentence_shape() {
        let sentence = change_sentence(
            Provider::Gemini,
            "A",
            "B",
            "the cost argument was more persuasive. ",
        );
        assert_eq!(
            sentence,
            "Gemini changed stance from A to B because the cost argument was more persuasive."
        );
    }

    #[test]
    fn test_stance_mapping_lists_every_member() {
        let groups = vec![
            StanceGroup::new(0, vec![Provider::OpenAi, Provider::Gemini], "A"),
            StanceGroup::new(
                1,
                vec![Provider::Anthropic, Provider::DeepSeek, Provider::Mistral],
                "B",
            ),
        ];
        let mapping = stance_mapping_json(&groups);
        let items = mapping.as_array().unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0]["provider"], "ChatGPT");
        assert_eq!(items[0]["stance_id"], "S1");
        assert_eq!(items[2]["stance_id"], "S2");
    }
}
