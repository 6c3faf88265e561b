//! Configuration loading from fftbench.toml
//!
//! The configuration file is optional. When `--config` is not given, it is
//! discovered by walking up from the current directory. Command-line flags
//! override whatever the file sets.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up during discovery
pub const CONFIG_FILE_NAME: &str = "fftbench.toml";

/// fftbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FftbenchConfig {
    /// Sweep range and repeat count
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Worker thread settings
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// First size exponent (size = 2^exponent)
    #[serde(default = "default_start_exponent")]
    pub start_exponent: u32,
    /// Last size exponent, inclusive
    #[serde(default = "default_end_exponent")]
    pub end_exponent: u32,
    /// Transform calls timed per size
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    /// Case names to leave out of the sweep
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start_exponent: default_start_exponent(),
            end_exponent: default_end_exponent(),
            repeat: default_repeat(),
            disabled: Vec::new(),
        }
    }
}

fn default_start_exponent() -> u32 {
    9
}
fn default_end_exponent() -> u32 {
    16
}
fn default_repeat() -> u32 {
    10
}

/// Worker thread configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunnerConfig {
    /// Pin the sweep worker to this CPU core
    #[serde(default)]
    pub pin_cpu: Option<usize>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json" or "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Write the report here instead of stdout
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl FftbenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from `start`
    pub fn discover_from(start: impl Into<PathBuf>) -> Option<anyhow::Result<Self>> {
        let mut dir = start.into();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(Self::load(&config_path));
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Discover configuration starting at the current directory
    pub fn discover() -> Option<anyhow::Result<Self>> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(dir)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# fftbench configuration

[sweep]
# First size exponent (size = 2^exponent)
start_exponent = 9
# Last size exponent, inclusive
end_exponent = 16
# Transform calls timed per size
repeat = 10
# Cases to leave out of the sweep
disabled = []

[runner]
# Pin the sweep worker to a CPU core (uncomment to enable)
# pin_cpu = 2

[output]
# Output format: human, json, csv
format = "human"
# Write the report to a file instead of stdout (uncomment to enable)
# path = "target/fftbench/report.json"
"#
        .to_string()
    }
}
