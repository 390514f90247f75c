//! Prompt templates for every model-facing call in the pipeline
//!
//! The wording here is policy, not contract: it can be tuned freely as
//! long as the advocate two-line output format and the assisting-model
//! JSON schemas stay in sync with the parsers in [`crate::advocate`],
//! [`crate::labeling`], and [`crate::stance`].

pub mod advocate;
pub mod assist;
