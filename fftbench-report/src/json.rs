//! JSON Output

use crate::chart::{ChartSeries, chart_series};
use crate::ReportError;
use crate::report::BenchmarkReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the sweep that produced a report ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every step ran
    Completed,
    /// Stopped early on request
    Cancelled,
    /// Aborted by a faulting case
    Faulted,
}

/// Sweep parameters captured in run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSettings {
    /// Smallest exponent swept
    pub start_exponent: u32,
    /// Largest exponent swept
    pub end_exponent: u32,
    /// Transform calls timed per step
    pub repeat: u32,
}

/// Host information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// CPU model name
    pub cpu: String,
    /// Available cores
    pub cpu_cores: u32,
}

/// Run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    /// Tool version
    pub version: String,
    /// When the run finished
    pub timestamp: DateTime<Utc>,
    /// Host information
    pub system: SystemInfo,
    /// Sweep parameters
    pub sweep: SweepSettings,
}

/// A report together with metadata and chart data, as written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDocument {
    /// Run metadata
    pub meta: RunMeta,
    /// How the run ended
    pub status: RunStatus,
    /// Aggregated results
    pub report: BenchmarkReport,
    /// Chart-ready view of the results
    pub chart: ChartSeries,
}

impl RunDocument {
    /// Assemble a document, deriving the chart series from `report`
    pub fn new(meta: RunMeta, status: RunStatus, report: BenchmarkReport) -> Self {
        let chart = chart_series(&report);
        Self {
            meta,
            status,
            report,
            chart,
        }
    }
}

/// Generate a prettified JSON document.
pub fn generate_json_report(document: &RunDocument) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{TimingOutcome, record};

    fn meta() -> RunMeta {
        RunMeta {
            version: "0.1.0".to_string(),
            timestamp: Utc::now(),
            system: SystemInfo {
                os: "linux".to_string(),
                arch: "x86_64".to_string(),
                cpu: "test".to_string(),
                cpu_cores: 1,
            },
            sweep: SweepSettings {
                start_exponent: 7,
                end_exponent: 8,
                repeat: 10,
            },
        }
    }

    #[test]
    fn test_json_document() {
        let mut report = BenchmarkReport::new();
        record(&mut report, 128, "radix2", TimingOutcome::new(5_000, 10, 0));

        let doc = RunDocument::new(meta(), RunStatus::Cancelled, report);
        let json = generate_json_report(&doc).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "cancelled");
        assert_eq!(value["meta"]["sweep"]["repeat"], 10);
        assert_eq!(value["report"]["sizes"]["128"]["radix2"]["duration_ns"], 5000);
        assert_eq!(value["chart"]["x_values"][0], "128");
    }
}
