mod sampler;
mod ticker;

pub use sampler::*;
pub use ticker::*;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// CPU usage above this percentage is [`Tier::High`].
pub const CPU_HIGH_PERCENT: f64 = 10.0;
/// Resident memory above this many megabytes is [`Tier::High`].
pub const MEMORY_HIGH_MB: f64 = 500.0;

pub const NOT_FOUND_TEXT: &str = "App not found.";
pub const NOT_AVAILABLE_TEXT: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Normal,
    High,
}

impl Tier {
    /// `High` only when `value` is strictly above `threshold`.
    pub fn classify(value: f64, threshold: f64) -> Self {
        if value > threshold {
            Self::High
        } else {
            Self::Normal
        }
    }
}

/// How the CPU percentage of a tracked process is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum CpuMode {
    /// CPU time spent between two samples over the wall time between them.
    #[default]
    Interval,
    /// CPU time spent since process start over the process's run time.
    Lifetime,
}

/// One sampling outcome. Nothing from previous samples is folded in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleResult {
    pub cpu_percent: f64,
    pub cpu_tier: Tier,
    pub memory_mb: f64,
    pub memory_tier: Tier,
    pub found: bool,
}

impl SampleResult {
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn found(cpu_percent: f64, memory_mb: f64) -> Self {
        Self {
            cpu_percent,
            cpu_tier: Tier::classify(cpu_percent, CPU_HIGH_PERCENT),
            memory_mb,
            memory_tier: Tier::classify(memory_mb, MEMORY_HIGH_MB),
            found: true,
        }
    }

    pub fn cpu_text(&self) -> String {
        if self.found {
            format!("{:.2}%", self.cpu_percent)
        } else {
            NOT_FOUND_TEXT.to_owned()
        }
    }

    pub fn memory_text(&self) -> String {
        if self.found {
            format!("{:.2} MB", self.memory_mb)
        } else {
            NOT_AVAILABLE_TEXT.to_owned()
        }
    }
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Share of all logical CPUs used between two readings of the same process.
pub fn interval_cpu_percent(prev_cpu_ms: u64, cpu_ms: u64, elapsed: Duration, cpus: usize) -> f64 {
    let wall_ms = elapsed.as_secs_f64() * 1000.0 * cpus.max(1) as f64;
    if wall_ms <= 0.0 {
        return 0.0;
    }
    cpu_ms.saturating_sub(prev_cpu_ms) as f64 / wall_ms * 100.0
}

/// Share of all logical CPUs used on average since the process started.
pub fn lifetime_cpu_percent(cpu_ms: u64, run_time_secs: u64, cpus: usize) -> f64 {
    let wall_ms = run_time_secs as f64 * 1000.0 * cpus.max(1) as f64;
    if wall_ms <= 0.0 {
        return 0.0;
    }
    cpu_ms as f64 / wall_ms * 100.0
}
