use super::ProcessSource;
use log::debug;

/// Snapshot of running process names, taken once and filtered on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessDirectory {
    names: Vec<String>,
}

impl ProcessDirectory {
    /// Enumerates the process table once. The snapshot is not kept up to date.
    pub fn capture<S: ProcessSource + ?Sized>(source: &mut S) -> Self {
        Self::from_names(source.process_names())
    }

    /// Builds a snapshot from raw names: sorted ordinally, duplicates removed.
    pub fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|n| !n.is_empty())
            .collect();
        names.sort();
        names.dedup();
        debug!("Captured {} distinct process names", names.len());
        Self { names }
    }

    /// Replaces the snapshot with a fresh enumeration.
    pub fn refresh<S: ProcessSource + ?Sized>(&mut self, source: &mut S) {
        *self = Self::capture(source);
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names that start with `prefix`, ignoring case, in snapshot order.
    /// `None` and the empty prefix both yield the whole snapshot.
    pub fn filter(&self, prefix: Option<&str>) -> Vec<String> {
        match prefix {
            None | Some("") => self.names.clone(),
            Some(prefix) => self
                .names
                .iter()
                .filter(|name| starts_with_ignore_case(name, prefix))
                .cloned()
                .collect(),
        }
    }
}

/// Compares char by char on the uppercase mapping, so `Ü` matches `ü`.
fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    let mut name = name.chars();
    prefix
        .chars()
        .all(|p| name.next().is_some_and(|n| n == p || n.to_uppercase().eq(p.to_uppercase())))
}
