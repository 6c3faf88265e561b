//! Sweep Orchestrator
//!
//! Drives every enabled case across a range of power-of-two sizes:
//!
//! ```text
//! for case in enabled cases (registration order)
//!     announce case
//!     for e in start..=end
//!         sawtooth(2^e) → run → record → progress → cancelled?
//! ```
//!
//! Rejected sizes are recorded as gaps and the sweep moves on. Any other
//! failure, including a panic inside a transform, aborts the sweep and hands
//! the partial report back inside the error. Cancellation is polled once per
//! step, after the step has been recorded.

use crate::case::{CaseError, TransformCase};
use crate::runner;
use crate::signal;
use fftbench_report::{BenchmarkReport, record, record_unsupported};
use std::ops::RangeInclusive;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Largest exponent a plan accepts (sizes up to 2^30)
pub const MAX_EXPONENT: u32 = 30;

/// Sweep errors
#[derive(Debug, Error)]
pub enum SweepError {
    /// A plan asked for zero repeats
    #[error("Repeat count must be at least 1")]
    InvalidRepeat,

    /// A plan exponent exceeds [`MAX_EXPONENT`]
    #[error("Exponent {exponent} out of range (max {max})")]
    ExponentOutOfRange {
        /// Offending exponent
        exponent: u32,
        /// Largest accepted exponent
        max: u32,
    },

    /// A case failed with something other than a size rejection
    #[error("{case} faulted at n = {size}: {message}")]
    RunnerFault {
        /// Faulting case
        case: String,
        /// Size being measured
        size: usize,
        /// Error or panic message
        message: String,
        /// Everything recorded before the fault
        partial: Box<BenchmarkReport>,
    },

    /// The worker thread could not be started
    #[error("Failed to spawn sweep worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// The worker thread died outside any case
    #[error("Sweep worker panicked")]
    WorkerPanicked,
}

impl SweepError {
    /// Partial report carried by a runner fault
    pub fn partial_report(&self) -> Option<&BenchmarkReport> {
        match self {
            SweepError::RunnerFault { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// Take the partial report out of a runner fault
    pub fn into_partial_report(self) -> Option<BenchmarkReport> {
        match self {
            SweepError::RunnerFault { partial, .. } => Some(*partial),
            _ => None,
        }
    }
}

/// Validated sweep parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPlan {
    start_exponent: u32,
    end_exponent: u32,
    repeat: u32,
}

impl SweepPlan {
    /// Build a plan. The bounds may come in either order; they are stored
    /// as `min..=max`.
    pub fn new(start_exponent: u32, end_exponent: u32, repeat: u32) -> Result<Self, SweepError> {
        if repeat == 0 {
            return Err(SweepError::InvalidRepeat);
        }
        for exponent in [start_exponent, end_exponent] {
            if exponent > MAX_EXPONENT {
                return Err(SweepError::ExponentOutOfRange {
                    exponent,
                    max: MAX_EXPONENT,
                });
            }
        }
        Ok(Self {
            start_exponent: start_exponent.min(end_exponent),
            end_exponent: start_exponent.max(end_exponent),
            repeat,
        })
    }

    /// Smallest exponent
    pub fn start_exponent(&self) -> u32 {
        self.start_exponent
    }

    /// Largest exponent
    pub fn end_exponent(&self) -> u32 {
        self.end_exponent
    }

    /// Transform calls per step
    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    /// Exponents in ascending order
    pub fn exponents(&self) -> RangeInclusive<u32> {
        self.start_exponent..=self.end_exponent
    }

    /// Sizes in ascending order
    pub fn sizes(&self) -> impl Iterator<Item = usize> + use<> {
        self.exponents().map(|e| 1usize << e)
    }

    /// Steps each enabled case contributes
    pub fn steps_per_case(&self) -> usize {
        (self.end_exponent - self.start_exponent) as usize + 1
    }

    /// Expected steps for `enabled_cases` cases
    pub fn total_steps(&self, enabled_cases: usize) -> usize {
        enabled_cases * self.steps_per_case()
    }
}

/// Progress notification.
///
/// A case announcement (`label` set) is sent before the first step of each
/// case runs; it repeats the completed count and does not advance it. Every
/// finished step then sends an event without a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Completed steps so far; never decreases
    pub step: usize,
    /// Expected steps for the whole sweep
    pub total: usize,
    /// Name of the case about to run, on announcements only
    pub label: Option<String>,
}

impl ProgressEvent {
    /// Whether this event marks a finished step rather than a case start
    pub fn is_step(&self) -> bool {
        self.label.is_none()
    }
}

/// Shared flag used to stop a sweep between steps
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect after the current step
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// How a sweep ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStatus {
    /// Every step ran
    Completed,
    /// Stopped early through the cancellation token
    Cancelled,
}

/// Report and status of a finished sweep
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    /// Everything recorded
    pub report: BenchmarkReport,
    /// How the sweep ended
    pub status: SweepStatus,
    /// Steps completed
    pub steps: usize,
}

/// Run every enabled case over every size of `plan`.
///
/// `progress` is called once when each case starts and once per completed
/// step. `cancel` is checked after
/// each step; once set, the sweep returns what it has with
/// [`SweepStatus::Cancelled`].
pub fn sweep<P>(
    cases: &mut [TransformCase],
    plan: &SweepPlan,
    mut progress: P,
    cancel: &CancellationToken,
) -> Result<SweepOutcome, SweepError>
where
    P: FnMut(ProgressEvent),
{
    let enabled = cases.iter().filter(|c| c.is_enabled()).count();
    let total = plan.total_steps(enabled);
    let mut report = BenchmarkReport::new();
    let mut step = 0;

    info!(
        cases = enabled,
        total_steps = total,
        start = plan.start_exponent(),
        end = plan.end_exponent(),
        repeat = plan.repeat(),
        "starting sweep"
    );

    for case in cases.iter_mut().filter(|c| c.is_enabled()) {
        let name = case.name().to_string();

        progress(ProgressEvent {
            step,
            total,
            label: Some(name.clone()),
        });

        for size in plan.sizes() {
            let data = signal::sawtooth(size);

            let result = catch_unwind(AssertUnwindSafe(|| {
                runner::run(case, &data, plan.repeat())
            }));

            match result {
                Ok(Ok(outcome)) => {
                    debug!(
                        case = %name,
                        size,
                        duration_ns = outcome.duration_ns,
                        "step complete"
                    );
                    record(&mut report, size, &name, outcome);
                }
                Ok(Err(CaseError::SizeUnsupported { reason, .. })) => {
                    warn!(case = %name, size, %reason, "size not supported, skipping");
                    record_unsupported(&mut report, size, &name, reason);
                }
                Ok(Err(CaseError::Fault(message))) => {
                    error!(case = %name, size, %message, "case faulted, aborting sweep");
                    return Err(SweepError::RunnerFault {
                        case: name,
                        size,
                        message,
                        partial: Box::new(report),
                    });
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(case = %name, size, %message, "case panicked, aborting sweep");
                    return Err(SweepError::RunnerFault {
                        case: name,
                        size,
                        message,
                        partial: Box::new(report),
                    });
                }
            }

            step += 1;
            progress(ProgressEvent {
                step,
                total,
                label: None,
            });

            if cancel.is_cancelled() {
                info!(steps = step, total_steps = total, "sweep cancelled");
                return Ok(SweepOutcome {
                    report,
                    status: SweepStatus::Cancelled,
                    steps: step,
                });
            }
        }
    }

    info!(steps = step, "sweep complete");
    Ok(SweepOutcome {
        report,
        status: SweepStatus::Completed,
        steps: step,
    })
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
