//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown problem type: {0}")]
    UnknownProblemType(String),

    #[error("Question cannot be empty")]
    EmptyQuestion,
}
