//! Problem type value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Shape of the question being deliberated
///
/// Determines the prompt grammar sent to advocates, the expected answer
/// format, and which stance-classification strategy applies. Chosen once
/// per submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    /// Multiple choice, exactly one correct option
    SingleSelect,
    /// Multiple choice, any subset of options
    MultiSelect,
    /// Open-ended question with a one-sentence answer
    General,
    /// Open-ended comparison between alternatives
    Comparison,
}

impl ProblemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::SingleSelect => "single_select",
            ProblemType::MultiSelect => "multi_select",
            ProblemType::General => "general",
            ProblemType::Comparison => "comparison",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProblemType::SingleSelect => "Multiple Choice (single select)",
            ProblemType::MultiSelect => "Multiple Choice (multi select)",
            ProblemType::General => "General Question",
            ProblemType::Comparison => "Comparison",
        }
    }

    /// Closed-form questions have a finite canonical answer space and go
    /// through the option labeler and the deterministic classifier.
    pub fn is_closed_form(&self) -> bool {
        matches!(self, ProblemType::SingleSelect | ProblemType::MultiSelect)
    }
}

impl std::fmt::Display for ProblemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for ProblemType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_select" | "single-select" => Ok(ProblemType::SingleSelect),
            "multi_select" | "multi-select" => Ok(ProblemType::MultiSelect),
            "general" => Ok(ProblemType::General),
            "comparison" => Ok(ProblemType::Comparison),
            other => Err(DomainError::UnknownProblemType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_form_split() {
        assert!(ProblemType::SingleSelect.is_closed_form());
        assert!(ProblemType::MultiSelect.is_closed_form());
        assert!(!ProblemType::General.is_closed_form());
        assert!(!ProblemType::Comparison.is_closed_form());
    }

    #[test]
    fn test_parse_accepts_both_separators() {
        let a: ProblemType = "single_select".parse().unwrap();
        let b: ProblemType = "single-select".parse().unwrap();
        assert_eq!(a, b);
        assert!("essay".parse::<ProblemType>().is_err());
    }
}
