//! Sweep Worker Thread
//!
//! Runs a sweep on its own thread so the caller stays responsive. Only three
//! things cross the thread boundary:
//! - progress events, over an `mpsc` channel
//! - the cancellation flag, shared through [`CancellationToken`]
//! - the final result plus the cases, returned through the join handle

use crate::case::TransformCase;
use crate::measure::pin_to_cpu;
use crate::sweep::{CancellationToken, ProgressEvent, SweepError, SweepOutcome, SweepPlan, sweep};
use std::sync::mpsc::{self, Receiver};
use std::thread::JoinHandle;
use tracing::{debug, warn};

/// Name given to the worker thread
pub const WORKER_THREAD_NAME: &str = "fftbench-sweep";

/// Worker settings
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerOptions {
    /// Pin the worker to this CPU core
    pub pin_cpu: Option<usize>,
}

/// What the worker hands back when it finishes
#[derive(Debug)]
pub struct SweepResult {
    /// The cases, returned so they can be swept again
    pub cases: Vec<TransformCase>,
    /// Outcome of the sweep
    pub outcome: Result<SweepOutcome, SweepError>,
}

/// Handle to a running sweep
pub struct SweepHandle {
    progress: Receiver<ProgressEvent>,
    cancel: CancellationToken,
    total_steps: usize,
    handle: JoinHandle<SweepResult>,
}

impl SweepHandle {
    /// Progress events, one per completed step. The channel closes when the
    /// sweep ends.
    pub fn progress(&self) -> &Receiver<ProgressEvent> {
        &self.progress
    }

    /// Token shared with the worker
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Ask the worker to stop after its current step
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Expected number of steps
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Wait for the worker and collect its result
    pub fn join(self) -> Result<SweepResult, SweepError> {
        self.handle.join().map_err(|_| SweepError::WorkerPanicked)
    }
}

/// Start a sweep over `cases` on a dedicated thread.
pub fn spawn_sweep(
    mut cases: Vec<TransformCase>,
    plan: SweepPlan,
    options: WorkerOptions,
) -> Result<SweepHandle, SweepError> {
    let (tx, rx) = mpsc::channel();
    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();
    let enabled = cases.iter().filter(|c| c.is_enabled()).count();
    let total_steps = plan.total_steps(enabled);

    let handle = std::thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            if let Some(cpu) = options.pin_cpu {
                match pin_to_cpu(cpu) {
                    Ok(()) => debug!(cpu, "sweep worker pinned"),
                    Err(e) => warn!(cpu, error = %e, "failed to pin sweep worker"),
                }
            }

            // A disconnected receiver only means nobody is watching progress
            let outcome = sweep(
                &mut cases,
                &plan,
                |event| {
                    let _ = tx.send(event);
                },
                &worker_cancel,
            );

            SweepResult { cases, outcome }
        })
        .map_err(SweepError::WorkerSpawn)?;

    Ok(SweepHandle {
        progress: rx,
        cancel,
        total_steps,
        handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{CaseError, Transform};
    use crate::sweep::SweepStatus;
    use std::time::Duration;

    struct Sleepy {
        name: &'static str,
        nap: Duration,
    }

    impl Transform for Sleepy {
        fn name(&self) -> &str {
            self.name
        }
        fn initialize(&mut self, _data: &[f64]) -> Result<(), CaseError> {
            Ok(())
        }
        fn transform(&mut self, _forward: bool) -> Result<(), CaseError> {
            std::thread::sleep(self.nap);
            Ok(())
        }
    }

    fn sleepy(name: &'static str, millis: u64) -> TransformCase {
        TransformCase::new(Sleepy {
            name,
            nap: Duration::from_millis(millis),
        })
    }

    #[test]
    fn test_worker_delivers_progress_and_returns_cases() {
        let cases = vec![sleepy("a", 0), sleepy("b", 0)];
        let plan = SweepPlan::new(3, 5, 2).unwrap();

        let handle = spawn_sweep(cases, plan, WorkerOptions::default()).unwrap();
        assert_eq!(handle.total_steps(), 6);

        let events: Vec<_> = handle.progress().iter().collect();
        assert_eq!(events.len(), 8);
        assert_eq!(events.iter().filter(|e| e.is_step()).count(), 6);
        assert_eq!(events.last().unwrap().step, 6);

        let result = handle.join().unwrap();
        assert_eq!(result.cases.len(), 2);
        let outcome = result.outcome.unwrap();
        assert_eq!(outcome.status, SweepStatus::Completed);
        assert_eq!(outcome.report.outcome_count(), 6);
    }

    #[test]
    fn test_worker_cancellation_stops_early() {
        let cases = vec![sleepy("slow", 5)];
        let plan = SweepPlan::new(0, 20, 1).unwrap();

        let handle = spawn_sweep(cases, plan, WorkerOptions::default()).unwrap();
        let first = handle.progress().recv().unwrap();
        assert_eq!(first.label.as_deref(), Some("slow"));
        assert_eq!(first.step, 0);
        handle.cancel();

        let result = handle.join().unwrap();
        let outcome = result.outcome.unwrap();
        assert_eq!(outcome.status, SweepStatus::Cancelled);
        assert!(outcome.steps >= 1 && outcome.steps < 21);
        assert_eq!(outcome.report.outcome_count(), outcome.steps);
    }
}
