//! Terminal front end: samples the target on the model's cadence and prints one
//! line per sample.

use crate::metrics::{SampleError, SampleResult, Tier};
use crate::model::UsageModel;
use log::info;
use std::io::{self, Write};
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error("failed to write sample: {0}")]
    Io(#[from] io::Error),
}

fn tier_marker(tier: Tier) -> &'static str {
    match tier {
        Tier::Normal => "",
        Tier::High => " (high)",
    }
}

pub fn format_sample(name: &str, sample: &SampleResult) -> String {
    if sample.found {
        format!(
            "{name}: cpu {}{} mem {}{}",
            sample.cpu_text(),
            tier_marker(sample.cpu_tier),
            sample.memory_text(),
            tier_marker(sample.memory_tier),
        )
    } else {
        format!("{name}: {} {}", sample.cpu_text(), sample.memory_text())
    }
}

/// Samples the model's target until it disappears or `count` samples were printed.
///
/// `wait` blocks for the given duration and returns the instant it woke up at.
pub fn watch<W, F>(
    model: &mut UsageModel,
    out: &mut W,
    count: Option<u64>,
    mut wait: F,
) -> Result<u64, WatchError>
where
    W: Write,
    F: FnMut(Duration) -> Instant,
{
    let name = model
        .target()
        .ok_or(SampleError::EmptyTarget)?
        .to_owned();
    info!("Watching {:?} every {:?}", name, model.period());

    let mut now = Instant::now();
    model.start(now);
    let mut printed = 0;
    loop {
        if let Some(sample) = model.sample() {
            writeln!(out, "{}", format_sample(&name, sample))?;
            out.flush()?;
            printed += 1;
        }
        if !model.is_tracking() {
            return Err(SampleError::TargetNotFound(name).into());
        }
        if count.is_some_and(|limit| printed >= limit) {
            model.stop();
            return Ok(printed);
        }
        loop {
            let pause = model.time_until_next_sample(now).unwrap_or_default();
            now = wait(pause);
            if model.poll(now) {
                break;
            }
        }
    }
}
