//! Chart Series
//!
//! Reshapes a report into the matrix a bar/line chart renderer needs:
//! sizes along the x-axis, one series per case.

use crate::report::BenchmarkReport;
use serde::{Deserialize, Serialize};

/// Size × case matrix for chart renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Chart title
    pub title: String,
    /// Metric plotted on the value axis
    pub metric: String,
    /// X-axis categories (input sizes), ascending
    pub x_values: Vec<String>,
    /// Series names (case names), in registration order
    pub series_names: Vec<String>,
    /// `series_data[series_idx][x_idx]`, `None` where the case has no outcome
    pub series_data: Vec<Vec<Option<f64>>>,
}

/// Build chart series of total duration in milliseconds
pub fn chart_series(report: &BenchmarkReport) -> ChartSeries {
    let sizes: Vec<usize> = report.sizes().collect();

    let series_data = report
        .case_names()
        .iter()
        .map(|name| {
            sizes
                .iter()
                .map(|&size| {
                    report
                        .get(size, name)
                        .map(|o| o.duration_ns as f64 / 1_000_000.0)
                })
                .collect()
        })
        .collect();

    ChartSeries {
        title: "Benchmark Result".to_string(),
        metric: "total_ms".to_string(),
        x_values: sizes.iter().map(|s| s.to_string()).collect(),
        series_names: report.case_names().to_vec(),
        series_data,
    }
}
