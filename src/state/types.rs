// Resource Model Types
use serde::{Deserialize, Serialize};
use std::fmt;

/// Units of a resource type. Signed so that negative caller input can be
/// rejected by validation instead of wrapping.
pub type Units = i64;

/// One row per process, one column per resource type.
pub type Matrix = Vec<Vec<Units>>;

/// One entry per resource type.
pub type ResourceVector = Vec<Units>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub usize);

impl ProcessId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ProcessId {
    fn from(index: usize) -> Self {
        ProcessId(index)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Joins process ids the way reports print them, e.g. `P0, P2`.
pub fn join_processes(ids: &[ProcessId], separator: &str) -> String {
    ids.iter()
        .map(ProcessId::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

pub(crate) fn format_vector(values: &[Units]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}
