use super::{ProcessReading, ProcessSource};
use log::{debug, trace};
use sysinfo::{Pid, Process, ProcessesToUpdate, System};

/// [`ProcessSource`] backed by the live OS process table.
pub struct SysinfoSource {
    system: System,
    cpus: usize,
}

impl std::fmt::Debug for SysinfoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SysinfoSource")
            .field("processes", &self.system.processes().len())
            .field("cpus", &self.cpus)
            .finish()
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();
        let cpus = match system.cpus().len() {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        };
        debug!("Process source ready with {} logical CPUs", cpus);
        Self { system, cpus }
    }

    fn refresh_all(&mut self) {
        let updated = self.system.refresh_processes(ProcessesToUpdate::All, true);
        trace!("Refreshed {} processes", updated);
    }

    /// Linux lists userland threads next to processes; those are never a target.
    fn is_thread(process: &Process) -> bool {
        process.thread_kind().is_some()
    }

    fn name_of(process: &Process) -> String {
        process.name().to_string_lossy().into_owned()
    }

    fn reading(process: &Process) -> ProcessReading {
        ProcessReading {
            pid: process.pid(),
            cpu_time_ms: process.accumulated_cpu_time(),
            run_time_secs: process.run_time(),
            memory_bytes: process.memory(),
        }
    }

    /// Refreshes only `pid` and returns it if it still carries `name`.
    fn refresh_tracked(&mut self, pid: Pid, name: &str) -> Option<ProcessReading> {
        self.system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        self.system
            .process(pid)
            .filter(|p| !Self::is_thread(p) && Self::name_of(p) == name)
            .map(Self::reading)
    }
}

impl ProcessSource for SysinfoSource {
    fn process_names(&mut self) -> Vec<String> {
        self.refresh_all();
        self.system
            .processes()
            .values()
            .filter(|p| !Self::is_thread(p))
            .filter_map(|p| {
                let name = Self::name_of(p);
                if name.is_empty() {
                    trace!("Skipping process {} without a readable name", p.pid());
                    None
                } else {
                    Some(name)
                }
            })
            .collect()
    }

    fn find_by_name(&mut self, name: &str, hint: Option<Pid>) -> Option<ProcessReading> {
        if let Some(pid) = hint {
            if let Some(reading) = self.refresh_tracked(pid, name) {
                return Some(reading);
            }
            debug!("Process {} is gone, looking up {:?} again", pid, name);
        }

        self.refresh_all();
        self.system
            .processes()
            .values()
            .find(|p| !Self::is_thread(p) && Self::name_of(p) == name)
            .map(Self::reading)
    }

    fn logical_cpus(&self) -> usize {
        self.cpus.max(1)
    }
}
