//! Run Metadata Collection
//!
//! Host details written alongside JSON reports. Linux-specific data (CPU
//! model) degrades to "Unknown" on other platforms.

use chrono::Utc;
use fftbench_core::SweepPlan;
use fftbench_report::{RunMeta, SweepSettings, SystemInfo};

/// Build metadata for a finished run
pub fn build_run_meta(plan: &SweepPlan) -> RunMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: num_cpus(),
    };

    RunMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system,
        sweep: SweepSettings {
            start_exponent: plan.start_exponent(),
            end_exponent: plan.end_exponent(),
            repeat: plan.repeat(),
        },
    }
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}
