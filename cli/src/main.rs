//! CLI entrypoint for resolve
//!
//! Wires the layers together: config → HTTP gateways → session
//! controller, then runs one submission and any requested resolve
//! rounds, printing the arbitrated summary.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use resolve_application::{
    DeliberationPhase, NoProgress, ProgressNotifier, SessionController, SessionError, TurnOutcome,
};
use resolve_domain::{BOLD_CLOSE, BOLD_OPEN, ProblemType, Provider, Question};
use resolve_infrastructure::{
    ConfigLoader, HttpAdvocateGateway, HttpAssistGateway, JsonlRunLogger,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "resolve",
    about = "Ask one question to five model advocates and reconcile their stances"
)]
struct Cli {
    /// The question to deliberate (free text; paste options inline for
    /// closed-form types)
    question: Option<String>,

    /// Question shape: general, comparison, single-select, multi-select
    #[arg(long, default_value = "general")]
    problem_type: ProblemType,

    /// Resolve rounds to attempt after the initial pass (capped at 2)
    #[arg(long, default_value_t = 0)]
    rounds: u32,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ignore config files and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Append turn records to this JSONL file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Progress lines on stderr, keeping stdout for the deliberation itself.
struct ConsoleProgress;

impl ProgressNotifier for ConsoleProgress {
    fn on_phase_start(&self, phase: DeliberationPhase, task_count: usize) {
        if task_count > 1 {
            eprintln!("· {} ({} calls)", phase, task_count);
        } else {
            eprintln!("· {}", phase);
        }
    }

    fn on_advocate_complete(&self, provider: Provider, success: bool) {
        let mark = if success { "✓" } else { "✗" };
        eprintln!("  {mark} {}", provider.display_name());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Invalid configuration: {e}"))?
    };

    let question = cli
        .question
        .ok_or_else(|| anyhow!("A question is required."))?;
    let question = Question::new(question).context("Invalid question")?;

    info!("Starting deliberation");

    let advocates = Arc::new(HttpAdvocateGateway::from_config(&config));
    let assist = Arc::new(HttpAssistGateway::from_config(&config));
    let session = SessionController::new(advocates, assist).with_call_timeout(
        Duration::from_secs(config.deliberation.request_timeout_secs),
    );

    let logger = cli.log.as_ref().and_then(JsonlRunLogger::new);

    let progress: &dyn ProgressNotifier = if cli.quiet {
        &NoProgress
    } else {
        &ConsoleProgress
    };

    if !cli.quiet {
        eprintln!("Question: {question}");
        eprintln!("Type: {}", cli.problem_type);
        eprintln!();
    }

    let outcome = session
        .submit(cli.problem_type, question, progress)
        .await?;
    print_outcome(&outcome);
    if let Some(logger) = &logger {
        logger.log(&outcome);
    }

    for round in 1..=cli.rounds.min(resolve_application::MAX_ROUNDS) {
        println!();
        println!("── Resolve round {round} ──");
        match session.resolve_round(progress).await {
            Ok(outcome) => {
                print_outcome(&outcome);
                if let Some(logger) = &logger {
                    logger.log(&outcome);
                }
            }
            Err(
                e @ (SessionError::NothingToReconsider | SessionError::RoundCapReached),
            ) => {
                println!("{e}.");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn print_outcome(outcome: &TurnOutcome) {
    println!("{}", render_emphasis(&outcome.message));
    println!();
    println!("Advocate answers:");
    for result in &outcome.run.advocate_outputs {
        println!("  {:<9} {}", result.provider_name(), result.summary);
    }

    if outcome.run.classifier_output.len() > 1 {
        println!();
        println!("Stances:");
        for group in &outcome.run.classifier_output {
            let members: Vec<&str> = group
                .members
                .iter()
                .map(|p| p.display_name())
                .collect();
            println!("  [{}] {}", members.join(", "), group.summary);
        }
    }
}

/// The bold-span marker is the UI's convention; on a terminal it becomes
/// an ANSI bold run.
fn render_emphasis(text: &str) -> String {
    text.replace(BOLD_OPEN, "\x1b[1m")
        .replace(BOLD_CLOSE, "\x1b[0m")
}
