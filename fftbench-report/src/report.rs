//! Report Data Structures
//!
//! Results are grouped by size first, then by case name. Recording an outcome
//! for a `(size, name)` pair that already exists overwrites that entry only;
//! every other entry at that size is left untouched.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// Timing of one case at one size over `repeat` back-to-back transform calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingOutcome {
    /// Wall-clock time across the whole repeat loop
    pub duration_ns: u64,
    /// Number of transform calls that were timed (always >= 1)
    pub repeat: u32,
    /// CPU cycles across the repeat loop (0 without a hardware counter)
    pub cycles: u64,
}

impl TimingOutcome {
    /// Create an outcome; a repeat count of zero is stored as one
    pub fn new(duration_ns: u64, repeat: u32, cycles: u64) -> Self {
        Self {
            duration_ns,
            repeat: repeat.max(1),
            cycles,
        }
    }

    /// Total elapsed time
    pub fn duration(&self) -> Duration {
        Duration::from_nanos(self.duration_ns)
    }

    /// Mean time of a single transform call
    pub fn per_call_ns(&self) -> f64 {
        self.duration_ns as f64 / self.repeat as f64
    }

    /// Transform calls per second, `None` if the loop took no measurable time
    pub fn calls_per_sec(&self) -> Option<f64> {
        if self.duration_ns == 0 {
            None
        } else {
            Some(self.repeat as f64 * 1e9 / self.duration_ns as f64)
        }
    }

    /// Estimated MFLOPS using the conventional `5 N log2(N)` flop count of a
    /// complex FFT of length `size`
    pub fn mflops(&self, size: usize) -> Option<f64> {
        if self.duration_ns == 0 || size < 2 {
            return None;
        }
        let n = size as f64;
        let flops = 5.0 * n * n.log2();
        // flops per ns == GFLOPS, scale to MFLOPS
        Some(flops / self.per_call_ns() * 1e3)
    }
}

/// All outcomes recorded for a single input size, keyed by case name
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SizeResult {
    outcomes: FxHashMap<String, TimingOutcome>,
}

impl SizeResult {
    /// Outcome recorded for `name`, if any
    pub fn get(&self, name: &str) -> Option<&TimingOutcome> {
        self.outcomes.get(name)
    }

    /// Whether an outcome is recorded for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.outcomes.contains_key(name)
    }

    /// Number of recorded cases
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True when no case recorded an outcome at this size
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Iterate over `(name, outcome)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimingOutcome)> {
        self.outcomes.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn insert(&mut self, name: &str, outcome: TimingOutcome) {
        self.outcomes.insert(name.to_string(), outcome);
    }

    fn remove(&mut self, name: &str) {
        self.outcomes.remove(name);
    }
}

// Serialized with names sorted so JSON output is stable across runs
impl Serialize for SizeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ordered: BTreeMap<&String, &TimingOutcome> = self.outcomes.iter().collect();
        ordered.serialize(serializer)
    }
}

/// A step whose case rejected the requested size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedStep {
    /// Requested input size
    pub size: usize,
    /// Case that rejected it
    pub case: String,
    /// Reason given by the case
    pub reason: String,
}

/// Outcomes of a sweep, ordered by size
///
/// Built by the sweep orchestrator through [`record`] and
/// [`record_unsupported`], then handed to consumers, which only read it.
/// Lookups by `(size, name)` are hash lookups on both axes; the ascending
/// size order is kept separately for iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "ReportData", from = "ReportData")]
pub struct BenchmarkReport {
    sizes: FxHashMap<usize, SizeResult>,
    // keys of `sizes`, ascending
    order: Vec<usize>,
    /// Case names in the order they were first recorded
    cases: Vec<String>,
    unsupported: Vec<UnsupportedStep>,
    // size -> case -> position in `unsupported`
    unsupported_index: FxHashMap<usize, FxHashMap<String, usize>>,
}

/// Serialized shape of a [`BenchmarkReport`]: sizes as an ordered map
#[derive(Serialize, Deserialize)]
struct ReportData {
    sizes: BTreeMap<usize, SizeResult>,
    cases: Vec<String>,
    unsupported: Vec<UnsupportedStep>,
}

impl From<BenchmarkReport> for ReportData {
    fn from(report: BenchmarkReport) -> Self {
        Self {
            sizes: report.sizes.into_iter().collect(),
            cases: report.cases,
            unsupported: report.unsupported,
        }
    }
}

impl From<ReportData> for BenchmarkReport {
    fn from(data: ReportData) -> Self {
        let mut report = Self {
            order: data.sizes.keys().copied().collect(),
            sizes: data.sizes.into_iter().collect(),
            cases: data.cases,
            unsupported: data.unsupported,
            unsupported_index: FxHashMap::default(),
        };
        report.reindex_unsupported();
        report
    }
}

impl BenchmarkReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome for `(size, name)`
    pub fn get(&self, size: usize, name: &str) -> Option<&TimingOutcome> {
        self.sizes.get(&size).and_then(|r| r.get(name))
    }

    /// Everything recorded at `size`
    pub fn size_result(&self, size: usize) -> Option<&SizeResult> {
        self.sizes.get(&size)
    }

    /// Iterate sizes in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SizeResult)> {
        self.order
            .iter()
            .filter_map(|size| self.sizes.get(size).map(|result| (*size, result)))
    }

    /// Sizes present in the report, ascending
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }

    /// Case names in first-recorded order
    pub fn case_names(&self) -> &[String] {
        &self.cases
    }

    /// Steps rejected as unsupported, in the order they happened
    pub fn unsupported(&self) -> &[UnsupportedStep] {
        &self.unsupported
    }

    /// The unsupported entry for `(size, name)`, if the case rejected that size
    pub fn unsupported_at(&self, size: usize, name: &str) -> Option<&UnsupportedStep> {
        let position = *self.unsupported_index.get(&size)?.get(name)?;
        self.unsupported.get(position)
    }

    /// Number of sizes in the report
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Number of recorded outcomes across all sizes
    pub fn outcome_count(&self) -> usize {
        self.sizes.values().map(SizeResult::len).sum()
    }

    fn note_case(&mut self, name: &str) {
        if !self.cases.iter().any(|c| c == name) {
            self.cases.push(name.to_string());
        }
    }

    fn size_entry(&mut self, size: usize) -> &mut SizeResult {
        if let Err(at) = self.order.binary_search(&size) {
            self.order.insert(at, size);
        }
        self.sizes.entry(size).or_default()
    }

    fn clear_unsupported(&mut self, size: usize, name: &str) {
        let position = self
            .unsupported_index
            .get_mut(&size)
            .and_then(|names| names.remove(name));
        if let Some(position) = position {
            self.unsupported.remove(position);
            self.reindex_unsupported();
        }
    }

    fn reindex_unsupported(&mut self) {
        self.unsupported_index.clear();
        for (position, step) in self.unsupported.iter().enumerate() {
            self.unsupported_index
                .entry(step.size)
                .or_default()
                .insert(step.case.clone(), position);
        }
    }
}

/// Record `outcome` for `case_name` at `size`.
///
/// Creates the size entry if needed and overwrites an earlier outcome for the
/// same `(size, case_name)` pair. Any unsupported mark for that pair is
/// cleared.
pub fn record(report: &mut BenchmarkReport, size: usize, case_name: &str, outcome: TimingOutcome) {
    debug_assert!(size > 0, "sizes are positive");
    report.note_case(case_name);
    report.clear_unsupported(size, case_name);
    report.size_entry(size).insert(case_name, outcome);
}

/// Mark `(size, case_name)` as rejected by the case.
///
/// The size still gets an entry (possibly empty) so it shows up in every
/// rendering of the report.
pub fn record_unsupported(
    report: &mut BenchmarkReport,
    size: usize,
    case_name: &str,
    reason: impl Into<String>,
) {
    debug_assert!(size > 0, "sizes are positive");
    report.note_case(case_name);
    report.size_entry(size).remove(case_name);
    let reason = reason.into();

    let existing = report
        .unsupported_index
        .get(&size)
        .and_then(|names| names.get(case_name))
        .copied();
    match existing {
        Some(position) => report.unsupported[position].reason = reason,
        None => {
            report
                .unsupported_index
                .entry(size)
                .or_default()
                .insert(case_name.to_string(), report.unsupported.len());
            report.unsupported.push(UnsupportedStep {
                size,
                case: case_name.to_string(),
                reason,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(ns: u64) -> TimingOutcome {
        TimingOutcome::new(ns, 10, 0)
    }

    #[test]
    fn test_record_keeps_other_names() {
        let mut report = BenchmarkReport::new();
        record(&mut report, 8, "A", outcome(100));
        record(&mut report, 8, "B", outcome(200));

        let at_8 = report.size_result(8).unwrap();
        assert_eq!(at_8.len(), 2);
        assert!(at_8.contains("A"));
        assert!(at_8.contains("B"));
    }

    #[test]
    fn test_record_overwrites_same_name_only() {
        let mut report = BenchmarkReport::new();
        record(&mut report, 8, "A", outcome(100));
        record(&mut report, 8, "B", outcome(200));
        record(&mut report, 8, "A", outcome(300));

        assert_eq!(report.get(8, "A").unwrap().duration_ns, 300);
        assert_eq!(report.get(8, "B").unwrap().duration_ns, 200);
        assert_eq!(report.case_names(), ["A", "B"]);
    }

    #[test]
    fn test_sizes_iterate_ascending() {
        let mut report = BenchmarkReport::new();
        record(&mut report, 512, "A", outcome(1));
        record(&mut report, 128, "A", outcome(1));
        record(&mut report, 256, "B", outcome(1));

        let sizes: Vec<_> = report.sizes().collect();
        assert_eq!(sizes, vec![128, 256, 512]);
        assert_eq!(report.outcome_count(), 3);
    }

    #[test]
    fn test_non_power_of_two_sizes_accepted() {
        let mut report = BenchmarkReport::new();
        record(&mut report, 3, "A", outcome(1));
        assert!(report.get(3, "A").is_some());
    }

    #[test]
    fn test_unsupported_creates_empty_size() {
        let mut report = BenchmarkReport::new();
        record_unsupported(&mut report, 2048, "A", "too large");

        assert!(report.size_result(2048).unwrap().is_empty());
        assert_eq!(report.unsupported_at(2048, "A").unwrap().reason, "too large");
        assert!(report.get(2048, "A").is_none());
    }

    #[test]
    fn test_record_clears_unsupported_mark() {
        let mut report = BenchmarkReport::new();
        record_unsupported(&mut report, 64, "A", "nope");
        record(&mut report, 64, "A", outcome(5));

        assert!(report.unsupported().is_empty());
        assert!(report.get(64, "A").is_some());
    }

    #[test]
    fn test_unsupported_lookup_survives_clearing() {
        let mut report = BenchmarkReport::new();
        record_unsupported(&mut report, 64, "A", "first");
        record_unsupported(&mut report, 64, "B", "second");
        record_unsupported(&mut report, 128, "A", "third");
        record_unsupported(&mut report, 64, "B", "second again");

        record(&mut report, 64, "A", outcome(5));

        assert!(report.unsupported_at(64, "A").is_none());
        assert_eq!(report.unsupported_at(64, "B").unwrap().reason, "second again");
        assert_eq!(report.unsupported_at(128, "A").unwrap().reason, "third");
        assert_eq!(report.unsupported().len(), 2);
    }

    #[test]
    fn test_json_sizes_are_ordered() {
        let mut report = BenchmarkReport::new();
        for size in [4096, 16, 256, 1] {
            record(&mut report, size, "A", outcome(1));
        }

        let json = serde_json::to_string(&report).unwrap();
        let at = |key: &str| json.find(&format!("\"{key}\":{{")).unwrap();
        assert!(at("1") < at("16"));
        assert!(at("16") < at("256"));
        assert!(at("256") < at("4096"));
        assert_eq!(report.sizes().collect::<Vec<_>>(), vec![1, 16, 256, 4096]);
    }

    #[test]
    fn test_outcome_derived_metrics() {
        let o = TimingOutcome::new(1_000_000, 100, 0);
        assert!((o.per_call_ns() - 10_000.0).abs() < f64::EPSILON);
        assert!((o.calls_per_sec().unwrap() - 100_000.0).abs() < 1e-6);

        // 5 * 1024 * 10 flops in 10 µs => 5120 MFLOPS
        let mflops = o.mflops(1024).unwrap();
        assert!((mflops - 5120.0).abs() < 1e-6);

        let instant = TimingOutcome::new(0, 1, 0);
        assert!(instant.calls_per_sec().is_none());
        assert!(instant.mflops(1024).is_none());
    }

    #[test]
    fn test_zero_repeat_is_clamped() {
        assert_eq!(TimingOutcome::new(10, 0, 0).repeat, 1);
    }

    #[test]
    fn test_json_roundtrip_preserves_lookups() {
        let mut report = BenchmarkReport::new();
        record(&mut report, 128, "radix2", outcome(42));
        record_unsupported(&mut report, 256, "dft", "cap");

        let json = serde_json::to_string(&report).unwrap();
        let back: BenchmarkReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert_eq!(back.sizes().collect::<Vec<_>>(), vec![128, 256]);
        assert_eq!(back.unsupported_at(256, "dft").unwrap().reason, "cap");
    }
}
