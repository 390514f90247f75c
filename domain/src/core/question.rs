//! Question value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The user's question as submitted (Value Object)
///
/// Stored trimmed and guaranteed non-empty. For closed-form flows the raw
/// text is later replaced by a labeled stem + options, but the original is
/// kept for reconsideration rounds, which re-run the labeler on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
}

impl Question {
    /// Create a question, rejecting empty or whitespace-only input.
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return Err(DomainError::EmptyQuestion);
        }
        Ok(Self { content })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Short prefix for log lines.
    pub fn preview(&self) -> &str {
        let end = self
            .content
            .char_indices()
            .nth(60)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len());
        &self.content[..end]
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_is_trimmed() {
        let q = Question::new("  What is Rust?  ").unwrap();
        assert_eq!(q.content(), "What is Rust?");
    }

    #[test]
    fn test_empty_question_rejected() {
        assert!(Question::new("").is_err());
        assert!(Question::new("   \n ").is_err());
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let q = Question::new("é".repeat(80)).unwrap();
        assert_eq!(q.preview().chars().count(), 60);
    }
}
