mod directory;
mod source;

pub use directory::*;
pub use source::*;

use sysinfo::Pid;

/// What the process table reports about one live process at refresh time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessReading {
    pub pid: Pid,
    /// Processor time consumed since the process started, in milliseconds.
    pub cpu_time_ms: u64,
    /// Seconds since the process started.
    pub run_time_secs: u64,
    /// Resident memory in bytes.
    pub memory_bytes: u64,
}

/// Access to the OS process table.
///
/// The directory and the sampler only ever talk to the table through this trait so
/// both can be driven from a fixed table in tests.
pub trait ProcessSource {
    /// Refreshes the table and returns the name of every process it holds, in
    /// enumeration order. Processes whose name cannot be read are left out.
    fn process_names(&mut self) -> Vec<String>;

    /// Finds the first enumerated process named exactly `name`.
    ///
    /// `hint` is the pid the previous lookup resolved to. A source may use it to
    /// refresh only that process while it is still alive under the same name.
    fn find_by_name(&mut self, name: &str, hint: Option<Pid>) -> Option<ProcessReading>;

    /// Number of logical CPUs, never less than one.
    fn logical_cpus(&self) -> usize;
}
