//! Benchmark Runner
//!
//! Times one case over one dataset. The case is initialized once, then
//! `transform(forward = true)` runs `repeat` times back to back under a single
//! timer, so initialization and per-call timer overhead stay out of the
//! measurement.

use crate::case::{CaseError, TransformCase};
use crate::measure::Timer;
use fftbench_report::TimingOutcome;

/// Time `repeat` forward transforms of `case` over `data`.
///
/// Errors from `initialize` or any `transform` call are returned untouched;
/// the caller decides whether a failure is fatal. A `repeat` of zero still
/// runs one call.
pub fn run(case: &mut TransformCase, data: &[f64], repeat: u32) -> Result<TimingOutcome, CaseError> {
    let repeat = repeat.max(1);

    case.initialize(data)?;

    let timer = Timer::start();
    for _ in 0..repeat {
        std::hint::black_box(case.transform(true))?;
    }
    let elapsed = timer.stop();

    Ok(TimingOutcome::new(elapsed.nanos, repeat, elapsed.ticks))
}
