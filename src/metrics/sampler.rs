use super::{
    bytes_to_mb, interval_cpu_percent, lifetime_cpu_percent, CpuMode, SampleResult, Ticker,
};
use crate::process::{ProcessReading, ProcessSource};
use log::{debug, info, warn};
use std::time::{Duration, Instant};
use sysinfo::Pid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("no target process selected")]
    EmptyTarget,
    #[error("no running process named {0:?}")]
    TargetNotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerState {
    #[default]
    Idle,
    Tracking,
}

/// CPU counter of the tracked process at the previous sample.
#[derive(Debug, Clone, Copy)]
struct Baseline {
    pid: Pid,
    cpu_time_ms: u64,
    at: Instant,
}

/// Polls CPU and memory usage of one process, selected by name.
#[derive(Debug, Default)]
pub struct Sampler {
    target: Option<String>,
    state: SamplerState,
    ticker: Ticker,
    cpu_mode: CpuMode,
    baseline: Option<Baseline>,
}

impl Sampler {
    pub fn new(period: Duration, cpu_mode: CpuMode) -> Self {
        Self {
            ticker: Ticker::new(period),
            cpu_mode,
            ..Default::default()
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Records the process to sample. Nothing is resolved until the next sample;
    /// an empty name clears the target and stops sampling.
    pub fn set_target(&mut self, name: &str) {
        let target = (!name.is_empty()).then(|| name.to_owned());
        if target != self.target {
            info!("Target set to {:?}", target);
            self.target = target;
            self.baseline = None;
        }
        if self.target.is_none() {
            self.enter_idle();
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        self.state == SamplerState::Tracking
    }

    pub fn cpu_mode(&self) -> CpuMode {
        self.cpu_mode
    }

    pub fn set_cpu_mode(&mut self, mode: CpuMode) {
        self.cpu_mode = mode;
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn set_period(&mut self, period: Duration) {
        self.ticker.set_period(period);
    }

    pub fn sample_once<S: ProcessSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Option<SampleResult> {
        self.sample_at(source, Instant::now())
    }

    /// Samples the target as of `now`.
    ///
    /// Returns `None` without touching any state when no target is set.
    pub fn sample_at<S: ProcessSource + ?Sized>(
        &mut self,
        source: &mut S,
        now: Instant,
    ) -> Option<SampleResult> {
        match self.resolve(source) {
            Ok(reading) => {
                let cpus = source.logical_cpus();
                let cpu_percent = self.cpu_percent(&reading, cpus, now).max(0.0);
                self.baseline = Some(Baseline {
                    pid: reading.pid,
                    cpu_time_ms: reading.cpu_time_ms,
                    at: now,
                });
                if self.state != SamplerState::Tracking {
                    debug!("Tracking pid {}", reading.pid);
                    self.state = SamplerState::Tracking;
                }
                self.ticker.arm(now);
                Some(SampleResult::found(cpu_percent, bytes_to_mb(reading.memory_bytes)))
            }
            Err(SampleError::EmptyTarget) => None,
            Err(err) => {
                warn!("{}", err);
                self.enter_idle();
                Some(SampleResult::not_found())
            }
        }
    }

    /// Samples if the ticker is due, otherwise does nothing.
    pub fn tick<S: ProcessSource + ?Sized>(
        &mut self,
        source: &mut S,
        now: Instant,
    ) -> Option<SampleResult> {
        if !self.ticker.is_due(now) {
            return None;
        }
        self.ticker.fire(now);
        self.sample_at(source, now)
    }

    /// Disarms the ticker. The target is kept.
    pub fn stop(&mut self) {
        if self.state == SamplerState::Tracking {
            debug!("Sampling stopped");
        }
        self.enter_idle();
    }

    fn enter_idle(&mut self) {
        self.state = SamplerState::Idle;
        self.ticker.disarm();
        self.baseline = None;
    }

    fn resolve<S: ProcessSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<ProcessReading, SampleError> {
        let name = self.target.as_deref().ok_or(SampleError::EmptyTarget)?;
        let hint = self.baseline.map(|b| b.pid);
        source
            .find_by_name(name, hint)
            .ok_or_else(|| SampleError::TargetNotFound(name.to_owned()))
    }

    fn cpu_percent(&self, reading: &ProcessReading, cpus: usize, now: Instant) -> f64 {
        let lifetime = || lifetime_cpu_percent(reading.cpu_time_ms, reading.run_time_secs, cpus);
        match (self.cpu_mode, self.baseline) {
            (CpuMode::Interval, Some(base)) if base.pid == reading.pid && now > base.at => {
                interval_cpu_percent(base.cpu_time_ms, reading.cpu_time_ms, now - base.at, cpus)
            }
            _ => lifetime(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Tier;
    use std::collections::HashMap;

    const MB: u64 = 1024 * 1024;

    #[derive(Default)]
    struct FakeTable {
        processes: HashMap<String, ProcessReading>,
        cpus: usize,
        lookups: Vec<(String, Option<Pid>)>,
    }

    impl FakeTable {
        fn with(
            name: &str,
            pid: u32,
            cpu_time_ms: u64,
            run_time_secs: u64,
            memory_mb: u64,
        ) -> Self {
            let mut table = Self {
                cpus: 1,
                ..Default::default()
            };
            table.put(name, pid, cpu_time_ms, run_time_secs, memory_mb);
            table
        }

        fn put(
            &mut self,
            name: &str,
            pid: u32,
            cpu_time_ms: u64,
            run_time_secs: u64,
            memory_mb: u64,
        ) {
            self.processes.insert(
                name.to_owned(),
                ProcessReading {
                    pid: Pid::from_u32(pid),
                    cpu_time_ms,
                    run_time_secs,
                    memory_bytes: memory_mb * MB,
                },
            );
        }
    }

    impl ProcessSource for FakeTable {
        fn process_names(&mut self) -> Vec<String> {
            self.processes.keys().cloned().collect()
        }

        fn find_by_name(&mut self, name: &str, hint: Option<Pid>) -> Option<ProcessReading> {
            self.lookups.push((name.to_owned(), hint));
            self.processes.get(name).copied()
        }

        fn logical_cpus(&self) -> usize {
            self.cpus
        }
    }

    fn sampler() -> Sampler {
        Sampler::new(Duration::from_secs(1), CpuMode::Interval)
    }

    #[test]
    fn empty_target_is_a_no_op() {
        let mut table = FakeTable::with("app", 1, 0, 1, 1);
        let mut sampler = sampler();
        assert_eq!(sampler.sample_once(&mut table), None);
        sampler.set_target("");
        assert_eq!(sampler.sample_once(&mut table), None);
        assert!(table.lookups.is_empty());
        assert_eq!(sampler.state(), SamplerState::Idle);
        assert!(!sampler.ticker().is_armed());
    }

    #[test]
    fn set_target_does_not_resolve() {
        let mut table = FakeTable::with("app", 1, 0, 1, 1);
        let mut sampler = sampler();
        sampler.set_target("app");
        assert_eq!(sampler.target(), Some("app"));
        assert_eq!(sampler.state(), SamplerState::Idle);
        assert!(table.lookups.is_empty());
        assert!(sampler.sample_once(&mut table).is_some());
    }

    #[test]
    fn missing_target_is_not_found_regardless_of_state() {
        let mut table = FakeTable::with("app", 1, 0, 1, 1);
        let mut sampler = sampler();

        sampler.set_target("NoSuchApp12345");
        let result = sampler.sample_once(&mut table).unwrap();
        assert_eq!(result, SampleResult::not_found());
        assert_eq!(sampler.state(), SamplerState::Idle);

        sampler.set_target("app");
        sampler.sample_once(&mut table).unwrap();
        assert!(sampler.is_tracking());

        sampler.set_target("NoSuchApp12345");
        let result = sampler.sample_once(&mut table).unwrap();
        assert_eq!(result, SampleResult::not_found());
        assert_eq!(sampler.state(), SamplerState::Idle);
        assert!(!sampler.ticker().is_armed());
    }

    #[test]
    fn found_target_starts_tracking() {
        let mut table = FakeTable::with("app", 7, 2_000, 4, 120);
        let mut sampler = sampler();
        sampler.set_target("app");
        let result = sampler.sample_once(&mut table).unwrap();

        assert!(result.found);
        assert!(result.cpu_percent >= 0.0);
        assert_eq!(result.memory_mb, 120.0);
        assert_eq!(result.memory_tier, Tier::Normal);
        assert!(sampler.is_tracking());
        assert!(sampler.ticker().is_armed());
    }

    #[test]
    fn first_sample_uses_lifetime_average() {
        let mut table = FakeTable::with("app", 7, 2_000, 4, 1);
        let mut sampler = sampler();
        sampler.set_target("app");
        let result = sampler.sample_once(&mut table).unwrap();
        assert!((result.cpu_percent - 50.0).abs() < 1e-9);
        assert_eq!(result.cpu_tier, Tier::High);
    }

    #[test]
    fn later_samples_use_interval_rate() {
        let mut table = FakeTable::with("app", 7, 10_000, 100, 1);
        table.cpus = 2;
        let mut sampler = sampler();
        sampler.set_target("app");
        let start = Instant::now();
        sampler.sample_at(&mut table, start).unwrap();

        table.put("app", 7, 10_500, 101, 1);
        let result = sampler.tick(&mut table, start + Duration::from_secs(1)).unwrap();
        assert!((result.cpu_percent - 25.0).abs() < 1e-9);
        assert_eq!(result.cpu_tier, Tier::High);
        assert_eq!(table.lookups.last().unwrap().1, Some(Pid::from_u32(7)));
    }

    #[test]
    fn lifetime_mode_ignores_baseline() {
        let mut table = FakeTable::with("app", 7, 1_000, 10, 1);
        let mut sampler = Sampler::new(Duration::from_secs(1), CpuMode::Lifetime);
        sampler.set_target("app");
        let start = Instant::now();
        sampler.sample_at(&mut table, start).unwrap();

        table.put("app", 7, 1_900, 11, 1);
        let result = sampler.tick(&mut table, start + Duration::from_secs(1)).unwrap();
        let expected = 1_900.0 / 11_000.0 * 100.0;
        assert!((result.cpu_percent - expected).abs() < 1e-9);
    }

    #[test]
    fn restarted_process_drops_baseline() {
        let mut table = FakeTable::with("app", 7, 50_000, 100, 1);
        let mut sampler = sampler();
        sampler.set_target("app");
        let start = Instant::now();
        sampler.sample_at(&mut table, start).unwrap();

        table.put("app", 8, 100, 1, 1);
        let result = sampler.tick(&mut table, start + Duration::from_secs(1)).unwrap();
        assert!((result.cpu_percent - 10.0).abs() < 1e-9);
        assert_eq!(result.cpu_tier, Tier::Normal);
    }

    #[test]
    fn tick_waits_for_period() {
        let mut table = FakeTable::with("app", 7, 0, 1, 1);
        let mut sampler = sampler();
        sampler.set_target("app");
        let start = Instant::now();

        assert_eq!(sampler.tick(&mut table, start + Duration::from_secs(5)), None);

        sampler.sample_at(&mut table, start).unwrap();
        assert_eq!(sampler.tick(&mut table, start + Duration::from_millis(500)), None);
        assert!(sampler.tick(&mut table, start + Duration::from_secs(1)).is_some());
        assert_eq!(sampler.tick(&mut table, start + Duration::from_millis(1500)), None);
    }

    #[test]
    fn exited_process_goes_idle_on_tick() {
        let mut table = FakeTable::with("app", 7, 0, 1, 1);
        let mut sampler = sampler();
        sampler.set_target("app");
        let start = Instant::now();
        sampler.sample_at(&mut table, start).unwrap();

        table.processes.clear();
        let result = sampler.tick(&mut table, start + Duration::from_secs(1)).unwrap();
        assert!(!result.found);
        assert!(!sampler.is_tracking());
        assert_eq!(sampler.tick(&mut table, start + Duration::from_secs(2)), None);
    }

    #[test]
    fn stop_keeps_target() {
        let mut table = FakeTable::with("app", 7, 0, 1, 1);
        let mut sampler = sampler();
        sampler.set_target("app");
        sampler.sample_once(&mut table).unwrap();
        sampler.stop();
        assert_eq!(sampler.state(), SamplerState::Idle);
        assert!(!sampler.ticker().is_armed());
        assert_eq!(sampler.target(), Some("app"));
    }

    #[test]
    fn clearing_target_while_tracking_goes_idle() {
        let mut table = FakeTable::with("app", 7, 0, 1, 1);
        let mut sampler = sampler();
        sampler.set_target("app");
        let start = Instant::now();
        sampler.sample_at(&mut table, start).unwrap();
        assert!(sampler.is_tracking());

        sampler.set_target("");
        assert_eq!(sampler.target(), None);
        assert_eq!(sampler.state(), SamplerState::Idle);
        assert!(!sampler.ticker().is_armed());
        assert_eq!(sampler.tick(&mut table, start + Duration::from_secs(1)), None);

        sampler.set_target("app");
        assert!(sampler.sample_at(&mut table, start + Duration::from_secs(2)).is_some());
        assert!(sampler.is_tracking());
    }

    #[test]
    fn error_messages() {
        assert_eq!(SampleError::EmptyTarget.to_string(), "no target process selected");
        assert_eq!(
            SampleError::TargetNotFound("foo".into()).to_string(),
            "no running process named \"foo\""
        );
    }
}
