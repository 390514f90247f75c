//! Option labeling for closed-form questions
//!
//! Closed-form questions arrive as free-form pasted text. An assisting
//! model extracts a question stem and the option list as strict JSON;
//! this module validates that reply and canonicalizes the labels. Labels
//! are always reassigned sequentially from 'A' — whatever markup the user
//! pasted (letters, numbers, bullets, comma lists) is discarded.

use serde::Deserialize;
use thiserror::Error;

/// Minimum options a closed-form question must offer.
pub const MIN_OPTIONS: usize = 2;

/// Maximum options (one per letter A–Z).
pub const MAX_OPTIONS: usize = 26;

/// A single canonical option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledOption {
    /// Uppercase letter 'A'..='Z'
    pub label: char,
    pub text: String,
}

/// A fully labeled closed-form question. Replaces the raw pasted text for
/// the rest of the closed-form pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledQuestion {
    pub stem: String,
    pub options: Vec<LabeledOption>,
}

/// Why labeling failed. Terminal for the submission: callers surface the
/// reason and must not fan out.
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("The option labeler is unavailable: {0}")]
    AssistUnavailable(String),

    #[error("The option labeler returned malformed JSON: {0}")]
    Malformed(String),

    /// The model itself declined (ok=false) with its own reason.
    #[error("{0}")]
    Extraction(String),

    #[error("Found {0} option(s); a closed-form question needs at least {MIN_OPTIONS}")]
    TooFewOptions(usize),

    #[error("Found {0} options; at most {MAX_OPTIONS} are supported")]
    TooManyOptions(usize),

    #[error("The option labeler did not return a question stem")]
    MissingStem,
}

impl LabelError {
    /// Full user-facing message with the recovery hint attached.
    pub fn user_message(&self) -> String {
        let reason = self.to_string();
        format!(
            "{}. Paste the options as a list or switch to a general question.",
            reason.trim_end_matches('.')
        )
    }
}

#[derive(Debug, Deserialize)]
struct LabelerReply {
    ok: bool,
    reason: Option<String>,
    question_stem: Option<String>,
    #[serde(default)]
    options: Option<Vec<ReplyOption>>,
}

#[derive(Debug, Deserialize)]
struct ReplyOption {
    // The model's own label is ignored; labels are reassigned sequentially.
    #[serde(default)]
    #[allow(dead_code)]
    label: Option<String>,
    text: String,
}

impl LabeledQuestion {
    /// Build a labeled question from a stem and option texts, assigning
    /// labels 'A', 'B', … in order.
    pub fn from_parts(
        stem: impl Into<String>,
        option_texts: Vec<String>,
    ) -> Result<Self, LabelError> {
        let stem = stem.into().trim().to_string();
        if stem.is_empty() {
            return Err(LabelError::MissingStem);
        }

        let texts: Vec<String> = option_texts
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if texts.len() < MIN_OPTIONS {
            return Err(LabelError::TooFewOptions(texts.len()));
        }
        if texts.len() > MAX_OPTIONS {
            return Err(LabelError::TooManyOptions(texts.len()));
        }

        let options = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| LabeledOption {
                label: (b'A' + i as u8) as char,
                text,
            })
            .collect();

        Ok(Self { stem, options })
    }

    /// Labels joined for prompt text, e.g. "A/B/C/D".
    pub fn label_run(&self) -> String {
        self.options
            .iter()
            .map(|o| o.label.to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Options rendered inline, e.g. "A) apples B) oranges".
    pub fn rendered_options(&self) -> String {
        self.options
            .iter()
            .map(|o| format!("{}) {}", o.label, o.text))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A short sample of labels for multi-select format hints,
    /// e.g. "A, B, C".
    pub fn label_sample(&self) -> String {
        self.options
            .iter()
            .take(3)
            .map(|o| o.label.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parse and validate an assisting-model labeler reply.
pub fn parse_labeler_reply(raw: &str) -> Result<LabeledQuestion, LabelError> {
    let reply: LabelerReply =
        serde_json::from_str(raw.trim()).map_err(|e| LabelError::Malformed(e.to_string()))?;

    if !reply.ok {
        let reason = reply
            .reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| "Could not reliably detect multiple-choice options".to_string());
        return Err(LabelError::Extraction(reason));
    }

    let stem = reply.question_stem.ok_or(LabelError::MissingStem)?;
    let option_texts = reply
        .options
        .unwrap_or_default()
        .into_iter()
        .map(|o| o.text)
        .collect();

    LabeledQuestion::from_parts(stem, option_texts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_plain_options_are_labeled() {
        let raw = r#"{"ok": true, "question_stem": "Pick:",
                      "options": [{"text": "apples"}, {"text": "oranges"}]}"#;
        let labeled = parse_labeler_reply(raw).unwrap();
        assert_eq!(labeled.stem, "Pick:");
        assert_eq!(labeled.options.len(), 2);
        assert_eq!(labeled.options[0].label, 'A');
        assert_eq!(labeled.options[0].text, "apples");
        assert_eq!(labeled.options[1].label, 'B');
        assert_eq!(labeled.options[1].text, "oranges");
    }

    #[test]
    fn test_model_labels_are_discarded() {
        let raw = r#"{"ok": true, "question_stem": "Which?",
                      "options": [{"label": "3", "text": "yes"},
                                  {"label": "x", "text": "no"}]}"#;
        let labeled = parse_labeler_reply(raw).unwrap();
        assert_eq!(labeled.options[0].label, 'A');
        assert_eq!(labeled.options[1].label, 'B');
    }

    #[test]
    fn test_declined_extraction_surfaces_model_reason() {
        let raw = r#"{"ok": false, "reason": "No enumerable options found."}"#;
        let err = parse_labeler_reply(raw).unwrap_err();
        assert!(matches!(err, LabelError::Extraction(_)));
        assert!(err.to_string().contains("No enumerable options"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = parse_labeler_reply("I found three options!").unwrap_err();
        assert!(matches!(err, LabelError::Malformed(_)));
    }

    #[test]
    fn test_single_option_rejected() {
        let raw = r#"{"ok": true, "question_stem": "Q", "options": [{"text": "only"}]}"#;
        assert!(matches!(
            parse_labeler_reply(raw).unwrap_err(),
            LabelError::TooFewOptions(1)
        ));
    }

    #[test]
    fn test_27_options_rejected() {
        let options: Vec<String> = (0..27).map(|i| format!("opt {i}")).collect();
        assert!(matches!(
            LabeledQuestion::from_parts("Q", options).unwrap_err(),
            LabelError::TooManyOptions(27)
        ));
    }

    #[test]
    fn test_missing_stem_rejected() {
        let raw = r#"{"ok": true, "options": [{"text": "a"}, {"text": "b"}]}"#;
        assert!(matches!(
            parse_labeler_reply(raw).unwrap_err(),
            LabelError::MissingStem
        ));
    }

    #[test]
    fn test_prompt_renderings() {
        let labeled = LabeledQuestion::from_parts(
            "Pick:",
            vec!["apples".into(), "oranges".into(), "pears".into(), "plums".into()],
        )
        .unwrap();
        assert_eq!(labeled.label_run(), "A/B/C/D");
        assert_eq!(labeled.label_sample(), "A, B, C");
        assert_eq!(
            labeled.rendered_options(),
            "A) apples B) oranges C) pears D) plums"
        );
    }

    #[test]
    fn test_user_message_carries_hint() {
        let msg = LabelError::TooFewOptions(1).user_message();
        assert!(msg.contains("switch to a general question"));
    }
}
