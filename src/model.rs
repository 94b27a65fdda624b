use crate::components::settings::Settings;
use crate::metrics::{SampleResult, Sampler, SamplerState, Tier};
use crate::notify::{ChangeNotifier, Property};
use crate::process::{ProcessDirectory, ProcessSource, SysinfoSource};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

/// State behind the usage widget: the process picker, the sampler and the values
/// shown for the current target.
///
/// All methods are meant to be called from one loop. Every observable value that
/// changes is announced through [`UsageModel::subscribe`].
pub struct UsageModel {
    source: Box<dyn ProcessSource>,
    directory: ProcessDirectory,
    sampler: Sampler,
    notifier: ChangeNotifier,
    filter: String,
    filtered: Vec<String>,
    sample: Option<SampleResult>,
}

impl Default for UsageModel {
    fn default() -> Self {
        Self::new(Box::new(SysinfoSource::new()), &Settings::default())
    }
}

impl UsageModel {
    /// Takes the one-time process snapshot from `source`.
    pub fn new(mut source: Box<dyn ProcessSource>, settings: &Settings) -> Self {
        let directory = ProcessDirectory::capture(source.as_mut());
        let filtered = directory.filter(None);
        Self {
            source,
            directory,
            sampler: Sampler::new(settings.update_interval(), settings.cpu_mode),
            notifier: ChangeNotifier::default(),
            filter: String::new(),
            filtered,
            sample: None,
        }
    }

    pub fn subscribe(&mut self) -> Receiver<Property> {
        self.notifier.subscribe()
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sampler.set_period(settings.update_interval());
        self.sampler.set_cpu_mode(settings.cpu_mode);
    }

    pub fn directory(&self) -> &ProcessDirectory {
        &self.directory
    }

    pub fn filtered_names(&self) -> &[String] {
        &self.filtered
    }

    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.to_owned();
        let filtered = self.directory.filter(Some(text));
        if filtered != self.filtered {
            self.filtered = filtered;
            self.notifier.notify(Property::FilteredNames);
        }
    }

    /// Re-enumerates running processes for the picker.
    pub fn reload_processes(&mut self) {
        self.directory.refresh(self.source.as_mut());
        let filtered = self.directory.filter(Some(&self.filter));
        if filtered != self.filtered {
            self.filtered = filtered;
            self.notifier.notify(Property::FilteredNames);
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.sampler.target()
    }

    /// An empty name clears the target and stops sampling.
    pub fn select(&mut self, name: &str) {
        let before = self.sampler.target().map(str::to_owned);
        let state = self.sampler.state();
        self.sampler.set_target(name);
        if self.sampler.target() != before.as_deref() {
            self.notifier.notify(Property::Target);
        }
        self.publish(state, None);
    }

    /// Samples right away; a found target starts the periodic updates.
    pub fn start(&mut self, now: Instant) {
        let before = self.sampler.state();
        let sample = self.sampler.sample_at(self.source.as_mut(), now);
        self.publish(before, sample);
    }

    /// Runs a sample if one is due. Returns whether it did.
    pub fn poll(&mut self, now: Instant) -> bool {
        let before = self.sampler.state();
        let sample = self.sampler.tick(self.source.as_mut(), now);
        let sampled = sample.is_some();
        self.publish(before, sample);
        sampled
    }

    pub fn stop(&mut self) {
        let before = self.sampler.state();
        self.sampler.stop();
        self.publish(before, None);
    }

    fn publish(&mut self, before: SamplerState, sample: Option<SampleResult>) {
        if let Some(sample) = sample {
            let prev = self.sample.replace(sample);
            for property in changed_properties(prev.as_ref(), &sample) {
                self.notifier.notify(property);
            }
        }
        if self.sampler.state() != before {
            self.notifier.notify(Property::State);
        }
    }

    pub fn sample(&self) -> Option<&SampleResult> {
        self.sample.as_ref()
    }

    pub fn state(&self) -> SamplerState {
        self.sampler.state()
    }

    pub fn is_tracking(&self) -> bool {
        self.sampler.is_tracking()
    }

    /// The picker and start button are offered whenever nothing is being tracked.
    pub fn show_selector(&self) -> bool {
        !self.sampler.is_tracking()
    }

    pub fn cpu_text(&self) -> String {
        self.sample.map(|s| s.cpu_text()).unwrap_or_default()
    }

    pub fn memory_text(&self) -> String {
        self.sample.map(|s| s.memory_text()).unwrap_or_default()
    }

    /// Tiers of the last found sample.
    pub fn tiers(&self) -> Option<(Tier, Tier)> {
        self.sample
            .filter(|s| s.found)
            .map(|s| (s.cpu_tier, s.memory_tier))
    }

    pub fn period(&self) -> Duration {
        self.sampler.ticker().period()
    }

    pub fn time_until_next_sample(&self, now: Instant) -> Option<Duration> {
        self.sampler.ticker().time_until_due(now)
    }
}

fn changed_properties(prev: Option<&SampleResult>, next: &SampleResult) -> Vec<Property> {
    let Some(prev) = prev else {
        return vec![
            Property::CpuPercent,
            Property::CpuTier,
            Property::MemoryMb,
            Property::MemoryTier,
            Property::Found,
        ];
    };
    let found_changed = prev.found != next.found;
    [
        (found_changed || prev.cpu_percent != next.cpu_percent, Property::CpuPercent),
        (prev.cpu_tier != next.cpu_tier, Property::CpuTier),
        (found_changed || prev.memory_mb != next.memory_mb, Property::MemoryMb),
        (prev.memory_tier != next.memory_tier, Property::MemoryTier),
        (found_changed, Property::Found),
    ]
    .into_iter()
    .filter_map(|(changed, property)| changed.then_some(property))
    .collect()
}
