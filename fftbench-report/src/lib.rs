#![warn(missing_docs)]
//! fftbench Report - Aggregation and Output
//!
//! Holds the result model produced by a sweep and turns it into the formats
//! consumers read:
//! - Human-readable text table (deterministic, one section per size)
//! - JSON (report plus run metadata)
//! - CSV (one row per step)
//! - Chart series (size × case matrix for external chart renderers)

mod chart;
mod csv;
mod json;
mod report;
mod text;

pub use chart::{ChartSeries, chart_series};
pub use csv::generate_csv_report;
pub use json::{RunDocument, RunMeta, RunStatus, SweepSettings, SystemInfo, generate_json_report};
pub use report::{
    BenchmarkReport, SizeResult, TimingOutcome, UnsupportedStep, record, record_unsupported,
};
pub use text::{format_duration, render};

/// Errors raised while producing report output
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unrecognized output format name
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text table
    Human,
    /// JSON with run metadata
    Json,
    /// CSV for spreadsheets
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}
