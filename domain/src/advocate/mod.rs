//! Advocate answers and the reply micro-format

pub mod parsing;
pub mod result;
