//! Test Signal
//!
//! Every case is fed the same sawtooth so timings from different runs and
//! different implementations are directly comparable.

/// Samples per sawtooth period, independent of the signal length
pub const SAWTOOTH_PERIOD: usize = 32;

/// Generate `length` samples of a sawtooth ramping from -1.0 towards 1.0.
///
/// Sample `i` is `(i mod SAWTOOTH_PERIOD)` mapped linearly onto `[-1.0, 1.0)`.
/// The output depends only on `length`.
pub fn sawtooth(length: usize) -> Vec<f64> {
    let step = 2.0 / SAWTOOTH_PERIOD as f64;
    (0..length)
        .map(|i| -1.0 + (i % SAWTOOTH_PERIOD) as f64 * step)
        .collect()
}
