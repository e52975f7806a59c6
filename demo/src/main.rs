//! Colloquy demo CLI.
//!
//! Parses a chat session JSON file (or the built-in sample exchange) through
//! the full transform-then-validate pipeline and prints one line per record.
//!
//! Usage:
//!   cargo run -p demo -- sample
//!   cargo run -p demo -- sample --sender UNKNOWN
//!   cargo run -p demo -- check session.json --config colloquy.toml
//!
//! Exit codes: 0 valid, 1 unreadable input or config, 2 transform error,
//! 3 validation error.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use colloquy::{
    entity::{Payload, Session},
    error::SessionError,
    samples, PipelineConfig,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Colloquy: discriminated parsing and validation of chat session JSON.
#[derive(Parser)]
#[command(
    name = "colloquy-demo",
    about = "Parse and validate chat session JSON",
    long_about = "Runs a chat session through Colloquy's transform and validate stages\n\
                  and prints the resolved variant of every exchange record."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a session JSON file.
    Check {
        /// Path to the session JSON.
        file: PathBuf,
        /// Optional TOML pipeline configuration.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Parse the built-in three-message sample exchange.
    Sample {
        /// Replace the first record's sender, e.g. `UNKNOWN`.
        #[arg(long)]
        sender: Option<String>,
    },
}

/// Why a run did not produce a valid session.
enum Failure {
    Input(String),
    Session(SessionError),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Failure::Input(_) => 1,
            Failure::Session(SessionError::Transform(_)) => 2,
            Failure::Session(SessionError::Validation(_)) => 3,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set RUST_LOG=debug (or trace for dropped keys) for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(session) => {
            print_summary(&session);
            println!("Session is valid.");
        }
        Err(failure) => {
            match &failure {
                Failure::Input(reason) => eprintln!("Input error: {reason}"),
                Failure::Session(SessionError::Transform(e)) => eprintln!("Transform error: {e}"),
                Failure::Session(SessionError::Validation(e)) => {
                    eprintln!("{}", e.title);
                    for v in &e.violations {
                        eprintln!("  {} [{}]: {}", v.property, v.constraint, v.message);
                    }
                }
            }
            std::process::exit(failure.exit_code());
        }
    }
}

async fn run(command: Command) -> Result<Session, Failure> {
    let (raw, config) = match command {
        Command::Check { file, config } => {
            let config = match config {
                Some(path) => PipelineConfig::from_file(&path)
                    .map_err(|e| Failure::Input(e.to_string()))?,
                None => PipelineConfig::default(),
            };
            (read_json(&file)?, config)
        }
        Command::Sample { sender } => {
            let raw = samples::sample_exchange();
            let raw = match sender {
                Some(sender) => samples::with_sender(&raw, 0, &sender),
                None => raw,
            };
            (raw, PipelineConfig::default())
        }
    };

    debug!(?config, "running session pipeline");
    colloquy::parse_session_with(&raw, &config)
        .await
        .map_err(Failure::Session)
}

fn read_json(path: &Path) -> Result<Value, Failure> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Failure::Input(format!("failed to read '{}': {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| Failure::Input(format!("'{}' is not valid JSON: {e}", path.display())))
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_summary(session: &Session) {
    println!();
    println!("Records: {}", session.records().len());
    println!("=================================");
    for (i, record) in session.records().iter().enumerate() {
        let sender = record
            .sender
            .as_ref()
            .map_or("-", |s| s.as_wire());
        let (kind, detail) = match &record.data {
            Some(Payload::CandidateAnswer(answer)) => {
                let question = answer
                    .question
                    .as_ref()
                    .map_or("-".to_string(), |q| q.kind().to_string());
                (
                    "CandidateAnswer".to_string(),
                    format!(
                        "answered {question} with {:?}",
                        answer.text.as_deref().unwrap_or_default()
                    ),
                )
            }
            Some(payload) => {
                let prompt = payload.prompt();
                let text = prompt
                    .and_then(|p| p.contents.as_ref())
                    .and_then(|c| c.first())
                    .and_then(|c| c.text.as_deref())
                    .unwrap_or_default();
                let options = prompt.map_or(0, |p| p.options().len());
                (payload.kind().to_string(), format!("{text:?}, {options} option(s)"))
            }
            None => ("-".to_string(), String::new()),
        };
        println!("  [{i}] {sender:<9} {kind:<17} {detail}");
    }
    println!();
}
