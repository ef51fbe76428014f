// Deadlock Detection
//
// Same work/finish iteration as the safety checker, but only the final
// finish vector matters: every process left unfinished is deadlocked.
use super::fixed_point;
use crate::state::{join_processes, ProcessId, ValidState};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlockReport {
    /// Ascending process indices that can never finish.
    pub deadlocked: Vec<ProcessId>,
    pub processes_checked: usize,
    pub resources_analyzed: usize,
}

impl DeadlockReport {
    pub fn is_deadlocked(&self) -> bool {
        !self.deadlocked.is_empty()
    }

    pub fn deadlocked_count(&self) -> usize {
        self.deadlocked.len()
    }
}

impl fmt::Display for DeadlockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.deadlocked.is_empty() {
            write!(f, "No deadlock detected. System is in a safe state.")
        } else {
            write!(
                f,
                "Deadlock detected! Deadlocked processes: {}",
                join_processes(&self.deadlocked, ", ")
            )
        }
    }
}

pub fn detect_deadlock(state: ValidState<'_>) -> DeadlockReport {
    let result = fixed_point::run(state);

    DeadlockReport {
        deadlocked: result.unfinished(),
        processes_checked: state.process_count(),
        resources_analyzed: state.resource_count(),
    }
}
