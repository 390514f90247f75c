//! Use cases orchestrating the deliberation pipeline

pub mod arbitrate;
pub mod classify;
pub mod fan_out;
pub mod label_options;
