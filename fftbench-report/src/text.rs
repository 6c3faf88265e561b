//! Text Rendering
//!
//! Human-readable table for a [`BenchmarkReport`]:
//! - One section per size, ascending
//! - One line per case, in first-recorded (registration) order
//! - Total time, time per call and estimated MFLOPS
//! - Explicit `unsupported` lines and `(no results)` for empty sizes
//!
//! The output contains nothing run-specific beyond the report itself, so the
//! same report always renders to the same bytes.

use crate::report::BenchmarkReport;

/// Format a duration in nanoseconds with an adaptive unit
pub fn format_duration(nanos: f64) -> String {
    if nanos < 1_000.0 {
        format!("{:.2} ns", nanos)
    } else if nanos < 1_000_000.0 {
        format!("{:.2} µs", nanos / 1_000.0)
    } else if nanos < 1_000_000_000.0 {
        format!("{:.2} ms", nanos / 1_000_000.0)
    } else {
        format!("{:.2} s", nanos / 1_000_000_000.0)
    }
}

/// Render a report as a text table
pub fn render(report: &BenchmarkReport) -> String {
    let mut output = String::new();

    output.push_str("fftbench results\n");
    output.push_str(&"=".repeat(72));
    output.push_str("\n\n");

    if report.is_empty() {
        output.push_str("  (no results)\n");
        return output;
    }

    let name_width = report
        .case_names()
        .iter()
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    for (size, result) in report.iter() {
        output.push_str(&format!("n = {}\n", size));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        let mut lines = 0;
        for name in report.case_names() {
            if let Some(outcome) = result.get(name) {
                let mflops = outcome
                    .mflops(size)
                    .map(|m| format!("{:.1} MFLOPS", m))
                    .unwrap_or_else(|| "-".to_string());
                output.push_str(&format!(
                    "  {:<width$}  total {:>12}  per call {:>12}  x{:<6} {:>16}\n",
                    name,
                    format_duration(outcome.duration_ns as f64),
                    format_duration(outcome.per_call_ns()),
                    outcome.repeat,
                    mflops,
                    width = name_width
                ));
                lines += 1;
            } else if let Some(step) = report.unsupported_at(size, name) {
                output.push_str(&format!(
                    "  {:<width$}  unsupported ({})\n",
                    name,
                    step.reason,
                    width = name_width
                ));
                lines += 1;
            }
        }

        if lines == 0 {
            output.push_str("  (no results)\n");
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "{} sizes, {} cases, {} measurements, {} unsupported\n",
        report.len(),
        report.case_names().len(),
        report.outcome_count(),
        report.unsupported().len()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{TimingOutcome, record, record_unsupported};

    fn sample_report() -> BenchmarkReport {
        let mut report = BenchmarkReport::new();
        record(&mut report, 256, "zeta", TimingOutcome::new(2_500_000, 10, 0));
        record(&mut report, 128, "zeta", TimingOutcome::new(1_000_000, 10, 0));
        record(&mut report, 128, "alpha", TimingOutcome::new(900, 10, 0));
        record_unsupported(&mut report, 256, "alpha", "size cap 128");
        report
    }

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(12.0), "12.00 ns");
        assert_eq!(format_duration(1_500.0), "1.50 µs");
        assert_eq!(format_duration(2_000_000.0), "2.00 ms");
        assert_eq!(format_duration(3_250_000_000.0), "3.25 s");
    }

    #[test]
    fn test_render_is_deterministic() {
        let report = sample_report();
        assert_eq!(render(&report), render(&report));
        assert_eq!(render(&report), render(&report.clone()));
    }

    #[test]
    fn test_render_sections_ascending_in_registration_order() {
        let text = render(&sample_report());

        let n128 = text.find("n = 128").unwrap();
        let n256 = text.find("n = 256").unwrap();
        assert!(n128 < n256);

        // "zeta" was recorded first, so it leads each section
        let section = &text[n128..n256];
        assert!(section.find("zeta").unwrap() < section.find("alpha").unwrap());
    }

    #[test]
    fn test_render_shows_unsupported_and_empty_sizes() {
        let mut report = sample_report();
        record_unsupported(&mut report, 4096, "zeta", "too big");
        let text = render(&report);

        assert!(text.contains("unsupported (size cap 128)"));
        let n4096 = text.find("n = 4096").unwrap();
        assert!(text[n4096..].contains("unsupported (too big)"));
    }

    #[test]
    fn test_render_empty_report() {
        let text = render(&BenchmarkReport::new());
        assert!(text.contains("(no results)"));
    }
}
