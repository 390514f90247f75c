//! Assisting-model prompts: labeler, classifier, and arbiter calls
//!
//! Every assisting call that feeds a parser requests strict JSON; the
//! schemas quoted in these prompts are the ones the validators in
//! [`crate::labeling`], [`crate::stance::classify`], and the application
//! arbiter expect.

use crate::advocate::result::AdvocateResult;
use crate::arbiter::{results_json, stance_mapping_json};
use crate::core::provider::Provider;
use crate::stance::group::StanceGroup;
use serde_json::json;

// ---------------------------------------------------------------------------
// Labeler
// ---------------------------------------------------------------------------

/// System prompt for the option labeler. The user message is the raw
/// pasted question, verbatim.
pub fn labeler_system() -> &'static str {
    r#"You are a parser. Do not answer the question.
Extract multiple-choice options from the pasted text and assign canonical labels A, B, C, ...

Return ONLY valid JSON in this exact format:
{
  "ok": true,
  "question_stem": "the question text without options",
  "options": [
    {"label": "A", "text": "first option text"},
    {"label": "B", "text": "second option text"}
  ]
}

Or if extraction fails:
{
  "ok": false,
  "reason": "explanation of why extraction failed"
}

Rules:
- Extract options from these formats:
  - Labeled lists: A) option  B) option  or  1. option  2. option
  - Bulleted lists: - option  or  * option
  - Comma-separated: "apples, oranges, bananas, grapes"
  - Inline after a question mark: "question? option1, option2, option3"
- Remove original labels (letters/numbers) but keep the option text
- Assign new labels sequentially starting from A
- question_stem must be only the question, without the options
- If fewer than 2 options are found, return ok=false
- If more than 26 options are found, return ok=false
- Never invent options
- Never include text outside the JSON"#
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// System prompt for open-ended stance clustering.
///
/// The merge-aggressively policy is deliberate: tone, hedging, and degree
/// are ignored, and only the bottom-line outcome separates stances. The
/// exact boundary is a tunable, exercised by the scenario tests rather
/// than pinned down formally.
pub fn classifier_system() -> &'static str {
    r#"You are a classifier. Do not answer the question.
Group the following short answers by semantic stance.

Rules:
- Group answers by their bottom-line outcome ONLY; ignore tone, hedging, and degree.
- Merge aggressively: prefer the smallest number of groups.
- Each answer must belong to exactly one group.
- Do not judge which stance is correct.
- Do not invent new stances.
- Do not omit any input.
- Return ONLY valid JSON matching the schema below.
- Keep stance summaries short (max ~15 words).

Schema:
{
  "groups": [
    {
      "stance_id": "S1",
      "members": ["provider1", "provider2"],
      "stance_summary": "short description of the shared stance"
    }
  ]
}"#
}

/// User message for the classifier: the question plus each provider's
/// summary as a JSON array.
pub fn classifier_user(question: &str, results: &[AdvocateResult]) -> String {
    let items: Vec<serde_json::Value> = results
        .iter()
        .map(|r| {
            json!({
                "provider": r.provider_name(),
                "summary": r.summary,
            })
        })
        .collect();

    let input = serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string());

    format!(
        "QUESTION: {question}\n\nGroup these summaries by stance. Input (JSON array):\n{input}"
    )
}

// ---------------------------------------------------------------------------
// Arbiter
// ---------------------------------------------------------------------------

/// System prompt for the unanimous-stance rationale.
pub fn arbiter_rationale_system() -> &'static str {
    r#"You are an arbiter. You write a brief rationale paragraph for a single shared stance.

Hard rules:
- Do NOT mention any provider names.
- Do NOT use Markdown.
- Output only 1-3 sentences (one paragraph) of plain text."#
}

/// User message for the unanimous-stance rationale.
pub fn arbiter_rationale_user(stance_summary: &str, results: &[AdvocateResult]) -> String {
    let summaries: Vec<String> = results
        .iter()
        .map(|r| r.summary.trim())
        .filter(|s| !s.is_empty())
        .map(|s| format!("- {s}"))
        .collect();

    let explanations: Vec<&str> = results
        .iter()
        .map(|r| r.explanation.trim())
        .filter(|e| !e.is_empty())
        .collect();

    format!(
        "STANCE (one sentence):\n{stance_summary}\n\n\
         ADVOCATE SUMMARIES:\n{}\n\n\
         ADVOCATE EXPLANATIONS:\n{}",
        summaries.join("\n"),
        explanations.join("\n\n---\n\n"),
    )
}

/// System prompt for the multi-stance rationale sections.
///
/// The paragraph openers and ordering are assembled in code; the model
/// only supplies one rationale per stance, as strict JSON.
pub fn arbiter_sections_system() -> &'static str {
    r#"You are an arbiter. Your job is to explain each stance held by the advocates based only on their explanations.
Do not choose a winner. Do not try to converge the stances. Do not debate.

For every stance in the mapping you receive, write one paragraph of 2-4 sentences explaining what that stance argues and why, in plain, natural language. Wrap the single main stance sentence of each paragraph in <bold>...</bold> tags. Do not use Markdown (no **), headings, bullets, provider names, or stance IDs inside the paragraphs.

Return ONLY valid JSON in this exact format, with one entry per stance_id in the mapping:
{
  "sections": [
    {"stance_id": "S1", "rationale": "paragraph with the main sentence in <bold>...</bold>"}
  ]
}

Do not invent or extend claims. Do not omit any stance."#
}

/// User message for the multi-stance rationale sections.
pub fn arbiter_sections_user(groups: &[StanceGroup], results: &[AdvocateResult]) -> String {
    let mapping = serde_json::to_string_pretty(&stance_mapping_json(groups))
        .unwrap_or_else(|_| "[]".to_string());

    let explanations: Vec<String> = results
        .iter()
        .map(|r| format!("{}:\n{}", r.provider_name(), r.explanation))
        .collect();

    format!(
        "STANCE MAPPING (JSON array):\n{mapping}\n\n\
         FULL EXPLANATIONS:\n{}",
        explanations.join("\n\n"),
    )
}

/// System prompt for round-change reasons.
///
/// Change detection and sentence assembly happen in code; the model only
/// supplies one brief reason clause per changed provider.
pub fn arbiter_reasons_system() -> &'static str {
    r#"You are an arbiter. Advocates have just reconsidered their answers, and some changed stance.

For each provider listed in CHANGED_PROVIDERS, write one brief plain-English clause (not a full sentence, no trailing period) explaining why it changed stance, based on its NEW explanation.

Return ONLY valid JSON in this exact format, with one entry per changed provider:
{
  "reasons": {
    "ProviderName": "brief reason clause"
  }
}

Provider names must exactly match the input names. Do not add other providers."#
}

/// User message for round-change reasons.
pub fn arbiter_reasons_user(
    changed: &[Provider],
    previous_groups: &[StanceGroup],
    previous_results: &[AdvocateResult],
    new_groups: &[StanceGroup],
    new_results: &[AdvocateResult],
) -> String {
    let changed_names: Vec<&str> = changed.iter().map(|p| p.display_name()).collect();

    let pretty = |value: serde_json::Value| {
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "[]".to_string())
    };

    format!(
        "CHANGED_PROVIDERS (JSON array):\n{}\n\n\
         PREVIOUS_STANCE_MAPPING (JSON array):\n{}\n\n\
         NEW_STANCE_MAPPING (JSON array):\n{}\n\n\
         PREVIOUS_RESULTS (JSON array of provider, summary, explanation):\n{}\n\n\
         NEW_RESULTS (JSON array of provider, summary, explanation):\n{}",
        pretty(json!(changed_names)),
        pretty(stance_mapping_json(previous_groups)),
        pretty(stance_mapping_json(new_groups)),
        pretty(results_json(previous_results)),
        pretty(results_json(new_results)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(summaries: [&str; 5]) -> Vec<AdvocateResult> {
        Provider::ALL
            .iter()
            .zip(summaries)
            .map(|(&p, s)| AdvocateResult::new(p, format!("{s} because"), s))
            .collect()
    }

    #[test]
    fn test_classifier_user_embeds_question_and_summaries() {
        let results = panel(["yes", "no", "yes", "no", "yes"]);
        let user = classifier_user("Is water wet?", &results);
        assert!(user.starts_with("QUESTION: Is water wet?"));
        assert!(user.contains("\"provider\": \"Claude\""));
        assert!(user.contains("\"summary\": \"no\""));
    }

    #[test]
    fn test_sections_user_contains_mapping_and_explanations() {
        let results = panel(["a", "a", "b", "b", "b"]);
        let groups = vec![
            StanceGroup::new(0, vec![Provider::OpenAi, Provider::Anthropic], "a"),
            StanceGroup::new(
                1,
                vec![Provider::Gemini, Provider::DeepSeek, Provider::Mistral],
                "b",
            ),
        ];
        let user = arbiter_sections_user(&groups, &results);
        assert!(user.contains("STANCE MAPPING"));
        assert!(user.contains("\"stance_id\": \"S2\""));
        assert!(user.contains("ChatGPT:\na because"));
    }

    #[test]
    fn test_reasons_user_lists_changed_names_first() {
        let results = panel(["a", "a", "b", "b", "b"]);
        let groups = vec![StanceGroup::new(0, Provider::ALL.to_vec(), "a")];
        let user = arbiter_reasons_user(
            &[Provider::Anthropic, Provider::Mistral],
            &groups,
            &results,
            &groups,
            &results,
        );
        assert!(user.starts_with("CHANGED_PROVIDERS"));
        assert!(user.contains("\"Claude\""));
        assert!(user.contains("\"Mistral\""));
    }
}
