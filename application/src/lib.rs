//! Application layer for resolve
//!
//! Use cases orchestrating the deliberation pipeline, the ports they
//! depend on, and the session state machine that owns round bookkeeping.
//! Adapters implementing the ports live in the infrastructure layer.

pub mod ports;
pub mod session;
pub mod use_cases;

pub use ports::llm::{AdvocateGateway, AssistGateway, LlmError};
pub use ports::progress::{DeliberationPhase, NoProgress, ProgressNotifier};
pub use session::{
    MAX_ROUNDS, RunRecord, RunType, SessionController, SessionError, TurnOutcome,
};
pub use use_cases::arbitrate::{Arbiter, ArbiterError};
pub use use_cases::classify::StanceClassifier;
pub use use_cases::fan_out::{AdvocateFanOut, DEFAULT_CALL_TIMEOUT};
pub use use_cases::label_options::OptionLabeler;
