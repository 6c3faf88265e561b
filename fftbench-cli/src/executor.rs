//! Sweep Execution
//!
//! Starts the sweep worker, mirrors its progress events onto a terminal
//! progress bar and turns Ctrl-C into a cancellation request.
//!
//! ```text
//! CaseRegistry ──► spawn_sweep ──► worker thread
//!                      │                │
//!                      │   ProgressEvent (mpsc)
//!                      ▼                │
//!                 ProgressBar ◄─────────┘
//!                      │
//!                      ▼
//!                  Execution (report, status, steps)
//! ```

use crate::interrupt;
use fftbench_core::{
    CaseRegistry, SweepError, SweepPlan, SweepStatus, WorkerOptions, spawn_sweep,
};
use fftbench_report::{BenchmarkReport, RunStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

/// How often the executor checks for Ctrl-C while no progress arrives
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of one sweep run from the CLI
#[derive(Debug)]
pub struct Execution {
    /// How the sweep ended
    pub status: RunStatus,
    /// Full or partial report
    pub report: BenchmarkReport,
    /// Completed steps
    pub steps: usize,
    /// Expected steps
    pub total_steps: usize,
    /// The fault that aborted the sweep, if any
    pub fault: Option<SweepError>,
}

/// Run `plan` over the enabled cases of `registry` on the sweep worker.
///
/// Runner faults are not returned as errors: they come back in
/// [`Execution::fault`] together with the partial report.
pub fn execute(
    registry: CaseRegistry,
    plan: SweepPlan,
    options: WorkerOptions,
    show_progress: bool,
) -> anyhow::Result<Execution> {
    interrupt::reset();
    let handle = spawn_sweep(registry.into_cases(), plan, options)?;
    let total_steps = handle.total_steps();

    let pb = if show_progress {
        ProgressBar::new(total_steps as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut cancel_sent = false;
    loop {
        match handle.progress().recv_timeout(POLL_INTERVAL) {
            Ok(event) => {
                if let Some(label) = event.label {
                    pb.set_message(format!("Testing {} ...", label));
                }
                pb.set_position(event.step as u64);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if !cancel_sent && interrupt::interrupted() {
            pb.set_message("Cancelling ...");
            handle.cancel();
            cancel_sent = true;
        }
    }

    let result = handle.join()?;

    let execution = match result.outcome {
        Ok(outcome) => {
            let status = match outcome.status {
                SweepStatus::Completed => RunStatus::Completed,
                SweepStatus::Cancelled => RunStatus::Cancelled,
            };
            pb.finish_with_message(match status {
                RunStatus::Completed => "Complete",
                _ => "Cancelled",
            });
            Execution {
                status,
                report: outcome.report,
                steps: outcome.steps,
                total_steps,
                fault: None,
            }
        }
        Err(fault @ SweepError::RunnerFault { .. }) => {
            pb.abandon_with_message("Faulted");
            let report = fault.partial_report().cloned().unwrap_or_default();
            Execution {
                status: RunStatus::Faulted,
                steps: report.outcome_count() + report.unsupported().len(),
                report,
                total_steps,
                fault: Some(fault),
            }
        }
        Err(other) => {
            pb.abandon();
            return Err(other.into());
        }
    };

    Ok(execution)
}
