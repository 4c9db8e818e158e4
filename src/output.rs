// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;

use crate::error::Error;
use crate::release::{ExitOutcome, Phase, PhaseStatus, RunReport};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with per-phase results
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// A single JSON object on stdout
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print the final report of a run that did not fail.
    pub fn report(&self, report: &RunReport) {
        match self.mode {
            OutputMode::Normal => {
                for result in &report.phases {
                    if result.phase == Phase::Report {
                        continue;
                    }
                    println!("  {} {:<17} {}", marker(result.status), result.phase, result.detail);
                }
                for warning in &report.warnings {
                    println!("  ! {}", warning.message);
                }
                match &report.image {
                    Some(image) => println!(
                        "Release {} ({image}, {:.1}s)",
                        report.outcome,
                        report.elapsed.as_secs_f64()
                    ),
                    None => println!(
                        "Release {} ({:.1}s)",
                        report.outcome,
                        report.elapsed.as_secs_f64()
                    ),
                }
            }
            OutputMode::Quiet => println!("{}", report.outcome),
            OutputMode::Json => print_json(report),
        }
    }

    /// Print a fatal error.
    pub fn error(&self, error: &Error) {
        let outcome = error.outcome();
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {error}");
            }
            OutputMode::Json => {
                let phase = match error {
                    Error::Release(e) => Some(e.phase()),
                    _ => None,
                };
                print_json(&JsonFailure {
                    outcome,
                    phase,
                    error: error.to_string(),
                });
            }
        }
    }
}

fn marker(status: PhaseStatus) -> &'static str {
    match status {
        PhaseStatus::Success => "✓",
        PhaseStatus::Skipped => "-",
        PhaseStatus::Failed => "✗",
    }
}

fn print_json<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct JsonFailure {
    outcome: ExitOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<Phase>,
    error: String,
}
