#![warn(missing_docs)]
//! # fftbench
//!
//! Benchmark sweep engine for interchangeable FFT implementations.
//!
//! fftbench times externally supplied transforms over a range of
//! power-of-two input sizes and aggregates the timings into a report:
//! - **Pluggable cases**: implement [`Transform`] and register it in a [`CaseRegistry`]
//! - **Deterministic input**: every case sees the same [`sawtooth`] signal
//! - **Timed repeats**: one initialization, then `repeat` timed transform calls
//! - **Background sweeps**: [`spawn_sweep`] runs on a worker thread with progress events and cancellation
//! - **Reports**: text, JSON, CSV and chart series from one [`BenchmarkReport`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use fftbench::prelude::*;
//!
//! let mut registry = CaseRegistry::new();
//! registry.register_transform(MyFft::default())?;
//!
//! let plan = SweepPlan::new(9, 16, 10)?;
//! let outcome = sweep(registry.as_mut_slice(), &plan, |_| {}, &CancellationToken::new())?;
//! println!("{}", render(&outcome.report));
//! ```
//!
//! ## Command Line
//!
//! ```ignore
//! fn main() {
//!     let mut registry = fftbench::builtin_registry().unwrap();
//!     registry.register_transform(MyFft::default()).unwrap();
//!     fftbench::run_with_registry(registry).unwrap();
//! }
//! ```

// Re-export engine types
pub use fftbench_core::{
    CancellationToken, CaseError, CaseRegistry, Elapsed, HAS_CYCLE_COUNTER, MAX_EXPONENT, ProgressEvent,
    RegistryError, SAWTOOTH_PERIOD, SweepError, SweepHandle, SweepOutcome, SweepPlan,
    SweepResult, SweepStatus, Timer, Transform, TransformCase, WORKER_THREAD_NAME,
    WorkerOptions, pin_to_cpu, run as run_case, sawtooth, spawn_sweep, sweep,
};

// Re-export report types
pub use fftbench_report::{
    BenchmarkReport, ChartSeries, OutputFormat, ReportError, RunDocument, RunMeta, RunStatus,
    SizeResult, SweepSettings, SystemInfo, TimingOutcome, UnsupportedStep, chart_series,
    format_duration, generate_csv_report, generate_json_report, record, record_unsupported,
    render,
};

// Re-export built-in cases
pub use fftbench_cli::{NAIVE_DFT_MAX_SIZE, NaiveDft, Radix2, builtin_registry};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchmarkReport, CancellationToken, CaseError, CaseRegistry, ProgressEvent, SweepPlan,
        SweepStatus, TimingOutcome, Transform, render, spawn_sweep, sweep,
    };
}

/// Run the fftbench CLI over the built-in cases.
///
/// ```ignore
/// fn main() {
///     fftbench::run().unwrap();
/// }
/// ```
pub use fftbench_cli::{run, run_with_registry};
