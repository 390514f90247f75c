//! Advocate reply parsing — the two-line micro-format
//!
//! Advocates are instructed to answer in exactly two labeled lines:
//!
//! ```text
//! EXPLANATION: <brief justification>
//! SUMMARY: <canonical short answer>
//! ```
//!
//! These functions extract the two fields from free-form LLM output. They
//! are pure domain logic — no I/O, just text pattern matching — with a
//! documented fallback when a model ignores the contract.

/// Maximum words kept when a summary has to be synthesized from raw text.
pub const MAX_SUMMARY_WORDS: usize = 22;

const EXPLANATION_TAG: &str = "EXPLANATION:";
const SUMMARY_TAG: &str = "SUMMARY:";

/// Fallback summary when the reply contains no usable text at all.
const EMPTY_REPLY_SUMMARY: &str = "No summary available.";

/// The two fields extracted from an advocate reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub explanation: String,
    pub summary: String,
}

/// Parse an advocate reply into explanation and summary.
///
/// When both tagged lines are present and non-empty they are used as-is.
/// Otherwise the whole trimmed reply becomes the explanation and the
/// summary falls back to the first sentence, truncated to
/// [`MAX_SUMMARY_WORDS`] words.
pub fn parse_advocate_reply(raw: &str) -> ParsedReply {
    let trimmed = raw.trim();

    let field = |tag: &str| -> Option<String> {
        trimmed
            .lines()
            .map(str::trim)
            .find_map(|line| line.strip_prefix(tag))
            .map(|rest| rest.trim().to_string())
            .filter(|rest| !rest.is_empty())
    };

    if let (Some(explanation), Some(summary)) = (field(EXPLANATION_TAG), field(SUMMARY_TAG)) {
        return ParsedReply {
            explanation,
            summary,
        };
    }

    let fallback = truncate_words(first_sentence(trimmed), MAX_SUMMARY_WORDS);
    ParsedReply {
        explanation: trimmed.to_string(),
        summary: if fallback.is_empty() {
            EMPTY_REPLY_SUMMARY.to_string()
        } else {
            fallback
        },
    }
}

/// First sentence of the text, terminator included. The whole text when no
/// terminator is found.
fn first_sentence(text: &str) -> &str {
    match text.find(['.', '!', '?']) {
        Some(i) => &text[..=i],
        None => text,
    }
}

/// Keep at most `max_words` whitespace-separated words, appending an
/// ellipsis when anything was dropped.
fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.trim().to_string();
    }
    format!("{}…", words[..max_words].join(" "))
}
