//! Stance grouping — clustering advocate answers by bottom-line outcome

pub mod classify;
pub mod diff;
pub mod group;
