#![warn(missing_docs)]
//! fftbench Core - Sweep Engine
//!
//! Drives externally supplied transform implementations across a range of
//! power-of-two sizes and collects their timings:
//! - [`Transform`] trait and [`CaseRegistry`] for implementations under test
//! - Deterministic sawtooth input ([`sawtooth`])
//! - Timed repeat loop ([`run`]) with cycle counting where available
//! - Sweep orchestration with progress events and cooperative cancellation
//! - Dedicated worker thread ([`spawn_sweep`])
//!
//! The engine never checks transform output; it only times calls and reacts
//! to their errors.

mod case;
mod measure;
mod runner;
mod signal;
mod sweep;
mod worker;

pub use case::{CaseError, CaseRegistry, RegistryError, Transform, TransformCase};
pub use measure::{Elapsed, HAS_CYCLE_COUNTER, Timer, pin_to_cpu};
pub use runner::run;
pub use signal::{SAWTOOTH_PERIOD, sawtooth};
pub use sweep::{
    CancellationToken, MAX_EXPONENT, ProgressEvent, SweepError, SweepOutcome, SweepPlan,
    SweepStatus, sweep,
};
pub use worker::{SweepHandle, SweepResult, WORKER_THREAD_NAME, WorkerOptions, spawn_sweep};

pub use fftbench_report::{BenchmarkReport, SizeResult, TimingOutcome};
