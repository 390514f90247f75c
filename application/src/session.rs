//! Deliberation session controller
//!
//! One instance owns one question session: the current results, stance
//! groups, and round bookkeeping. State lives behind a single mutex and
//! is replaced wholesale at two transition points — submission and round
//! completion — never mutated ambiently. A generation counter makes a
//! newer submission win over any pipeline still in flight, and an
//! in-flight flag keeps rounds serial.

use crate::ports::llm::{AdvocateGateway, AssistGateway};
use crate::ports::progress::{DeliberationPhase, ProgressNotifier};
use crate::use_cases::arbitrate::{Arbiter, ArbiterError};
use crate::use_cases::classify::StanceClassifier;
use crate::use_cases::fan_out::AdvocateFanOut;
use crate::use_cases::label_options::OptionLabeler;
use resolve_domain::prompt::advocate::{initial_user_message, reconsider_user_message};
use resolve_domain::{
    AdvocateResult, LabelError, LabeledQuestion, ProblemType, Provider, Question, StanceGroup,
    group_of,
};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

/// Hard cap on reconsideration rounds per question.
pub const MAX_ROUNDS: u32 = 2;

/// Errors surfaced by the session controller.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Option labeling failed; the submission is rejected before any
    /// advocate is queried.
    #[error("{}", .0.user_message())]
    Labeling(#[from] LabelError),

    /// The prose summary failed. The round's results and groups are
    /// already committed and remain displayable.
    #[error(transparent)]
    Arbiter(#[from] ArbiterError),

    #[error("No deliberation to reconsider yet")]
    NoActiveQuestion,

    #[error("A resolve round is already running")]
    RoundInFlight,

    #[error("The resolve round cap ({MAX_ROUNDS}) has been reached")]
    RoundCapReached,

    #[error("All advocates already share one stance")]
    NothingToReconsider,

    #[error("Superseded by a newer submission")]
    Superseded,
}

/// Which pipeline produced a run record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunType {
    Initial,
    ResolveRound,
}

/// The per-turn record handed back for the caller to persist. The
/// orchestrator itself stores nothing beyond the live session state.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub run_type: RunType,
    pub round_index: u32,
    pub arbiter_output: String,
    pub advocate_outputs: Vec<AdvocateResult>,
    pub classifier_output: Vec<StanceGroup>,
    /// Closed-form question on which the panel split
    pub mcq_disagreement: bool,
}

/// Result of one submit or resolve-round turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// The user-facing summary text
    pub message: String,
    pub run: RunRecord,
}

#[derive(Debug, Clone)]
struct RoundState {
    generation: u64,
    problem_type: ProblemType,
    question: Question,
    labeled: Option<LabeledQuestion>,
    round_index: u32,
    results: Vec<AdvocateResult>,
    groups: Vec<StanceGroup>,
}

/// Clears the round-in-flight flag on every exit path.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Controller owning one question session end to end.
pub struct SessionController<G, A>
where
    G: AdvocateGateway + 'static,
    A: AssistGateway,
{
    fan_out: AdvocateFanOut<G>,
    labeler: OptionLabeler<A>,
    classifier: StanceClassifier<A>,
    arbiter: Arbiter<A>,
    state: Mutex<Option<RoundState>>,
    generation: AtomicU64,
    round_in_flight: AtomicBool,
}

impl<G, A> SessionController<G, A>
where
    G: AdvocateGateway + 'static,
    A: AssistGateway,
{
    pub fn new(advocates: Arc<G>, assist: Arc<A>) -> Self {
        Self {
            fan_out: AdvocateFanOut::new(advocates),
            labeler: OptionLabeler::new(Arc::clone(&assist)),
            classifier: StanceClassifier::new(Arc::clone(&assist)),
            arbiter: Arbiter::new(assist),
            state: Mutex::new(None),
            generation: AtomicU64::new(0),
            round_in_flight: AtomicBool::new(false),
        }
    }

    /// Override the per-call deadline used by the fan-out.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.fan_out = self.fan_out.with_timeout(timeout);
        self
    }

    /// Rounds completed for the current question, if any.
    pub async fn round_index(&self) -> Option<u32> {
        self.state.lock().await.as_ref().map(|s| s.round_index)
    }

    /// Submit a new question, discarding any previous session state.
    ///
    /// This is a hard session boundary: the round index restarts at zero
    /// and an older submission or round still in flight can no longer
    /// commit its result.
    pub async fn submit(
        &self,
        problem_type: ProblemType,
        question: Question,
        progress: &dyn ProgressNotifier,
    ) -> Result<TurnOutcome, SessionError> {
        // Claiming a new generation up front supersedes everything older.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            "Submitting {} question: {}",
            problem_type.as_str(),
            question.preview()
        );

        let labeled = if problem_type.is_closed_form() {
            progress.on_phase_start(DeliberationPhase::Labeling, 1);
            let labeled = self.labeler.label(question.content()).await?;
            progress.on_phase_complete(DeliberationPhase::Labeling);
            Some(labeled)
        } else {
            None
        };

        let user = initial_user_message(problem_type, question.content(), labeled.as_ref());
        let results = self.fan_out.run(&user, progress).await;

        progress.on_phase_start(DeliberationPhase::Classification, 1);
        let groups = self
            .classifier
            .classify(problem_type, question.content(), &results)
            .await;
        progress.on_phase_complete(DeliberationPhase::Classification);

        let mcq_disagreement = problem_type.is_closed_form() && groups.len() > 1;

        // Commit before arbitration so the results stay displayable even
        // if the prose summary fails.
        {
            let mut state = self.state.lock().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                return Err(SessionError::Superseded);
            }
            *state = Some(RoundState {
                generation,
                problem_type,
                question,
                labeled,
                round_index: 0,
                results: results.clone(),
                groups: groups.clone(),
            });
        }

        progress.on_phase_start(DeliberationPhase::Arbitration, 1);
        let message = self.arbiter.summarize_initial(&groups, &results).await?;
        progress.on_phase_complete(DeliberationPhase::Arbitration);

        Ok(TurnOutcome {
            message: message.clone(),
            run: RunRecord {
                run_type: RunType::Initial,
                round_index: 0,
                arbiter_output: message,
                advocate_outputs: results,
                classifier_output: groups,
                mcq_disagreement,
            },
        })
    }

    /// Run one reconsideration round: each advocate sees the reasoning of
    /// every rival stance (its own group's peers are withheld) and may
    /// revise its answer.
    pub async fn resolve_round(
        &self,
        progress: &dyn ProgressNotifier,
    ) -> Result<TurnOutcome, SessionError> {
        if self.round_in_flight.swap(true, Ordering::SeqCst) {
            return Err(SessionError::RoundInFlight);
        }
        let _guard = InFlightGuard {
            flag: &self.round_in_flight,
        };

        let snapshot = {
            let state = self.state.lock().await;
            state.clone().ok_or(SessionError::NoActiveQuestion)?
        };

        // Guard checks precede any network call.
        if snapshot.round_index >= MAX_ROUNDS {
            return Err(SessionError::RoundCapReached);
        }
        if snapshot.groups.len() <= 1 {
            return Err(SessionError::NothingToReconsider);
        }

        info!(
            "Starting resolve round {} of {}",
            snapshot.round_index + 1,
            MAX_ROUNDS
        );

        let labeled = if snapshot.problem_type.is_closed_form() {
            progress.on_phase_start(DeliberationPhase::Labeling, 1);
            let labeled = self.labeler.label(snapshot.question.content()).await?;
            progress.on_phase_complete(DeliberationPhase::Labeling);
            Some(labeled)
        } else {
            None
        };

        let problem_type = snapshot.problem_type;
        let question = snapshot.question.content().to_string();

        let results = self
            .fan_out
            .run_personalized(
                |provider| {
                    let prior = snapshot
                        .results
                        .iter()
                        .find(|r| r.provider == provider)
                        .cloned()
                        .unwrap_or_else(|| {
                            AdvocateResult::no_response(provider, "No previous answer.")
                        });
                    reconsider_user_message(
                        problem_type,
                        &question,
                        labeled.as_ref(),
                        &prior,
                        &rival_reasoning(provider, &snapshot.groups, &snapshot.results),
                    )
                },
                progress,
            )
            .await;

        progress.on_phase_start(DeliberationPhase::Classification, 1);
        let groups = self
            .classifier
            .classify(problem_type, &question, &results)
            .await;
        progress.on_phase_complete(DeliberationPhase::Classification);

        let mcq_disagreement = problem_type.is_closed_form() && groups.len() > 1;
        let round_index = snapshot.round_index + 1;

        {
            let mut state = self.state.lock().await;
            match state.as_ref() {
                Some(current) if current.generation == snapshot.generation => {}
                // A newer question took the session over while this
                // round was running; its state must not be overwritten.
                _ => return Err(SessionError::Superseded),
            }
            *state = Some(RoundState {
                generation: snapshot.generation,
                problem_type,
                question: snapshot.question.clone(),
                labeled,
                round_index,
                results: results.clone(),
                groups: groups.clone(),
            });
        }

        progress.on_phase_start(DeliberationPhase::Arbitration, 1);
        let message = self
            .arbiter
            .summarize_changes(&snapshot.groups, &snapshot.results, &groups, &results)
            .await?;
        progress.on_phase_complete(DeliberationPhase::Arbitration);

        Ok(TurnOutcome {
            message: message.clone(),
            run: RunRecord {
                run_type: RunType::ResolveRound,
                round_index,
                arbiter_output: message,
                advocate_outputs: results,
                classifier_output: groups,
                mcq_disagreement,
            },
        })
    }
}

/// Concatenated explanations of every advocate outside `provider`'s own
/// stance group. Peers that already agree are withheld — only rival
/// reasoning should drive re-examination.
fn rival_reasoning(
    provider: Provider,
    groups: &[StanceGroup],
    results: &[AdvocateResult],
) -> String {
    let own_group = group_of(groups, provider);

    let lines: Vec<String> = results
        .iter()
        .filter(|r| r.provider != provider)
        .filter(|r| !own_group.is_some_and(|g| g.contains(r.provider)))
        .map(|r| format!("{}:\n{}", r.provider_name(), r.explanation))
        .collect();

    lines.join("\n\n")
}
