//! Safety Checker (Banker's algorithm)
//!
//! Searches for an order in which every process can acquire its remaining
//! need and then release everything it holds. The search prefers lower
//! process indices, so the returned sequence is one valid witness among
//! possibly many; use [`is_safe_sequence`] to check any other candidate.

use super::fixed_point::{self, StepTrace};
use crate::state::{join_processes, ProcessId, ValidState};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum SafetyReport {
    Safe {
        sequence: Vec<ProcessId>,
        trace: StepTrace,
    },
    /// The trace covers only the processes that could finish before the
    /// search stalled and has `complete == false`.
    Unsafe {
        unfinished: Vec<ProcessId>,
        trace: StepTrace,
    },
}

impl SafetyReport {
    pub fn is_safe(&self) -> bool {
        matches!(self, SafetyReport::Safe { .. })
    }

    pub fn sequence(&self) -> Option<&[ProcessId]> {
        match self {
            SafetyReport::Safe { sequence, .. } => Some(sequence),
            SafetyReport::Unsafe { .. } => None,
        }
    }

    pub fn unfinished(&self) -> &[ProcessId] {
        match self {
            SafetyReport::Safe { .. } => &[],
            SafetyReport::Unsafe { unfinished, .. } => unfinished,
        }
    }

    pub fn trace(&self) -> &StepTrace {
        match self {
            SafetyReport::Safe { trace, .. } | SafetyReport::Unsafe { trace, .. } => trace,
        }
    }
}

impl fmt::Display for SafetyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyReport::Safe { sequence, .. } => write!(
                f,
                "System is in a safe state! Safe sequence: {}",
                join_processes(sequence, " → ")
            ),
            SafetyReport::Unsafe { unfinished, .. } => write!(
                f,
                "System is not in a safe state. No safe sequence exists (unfinished: {})",
                join_processes(unfinished, ", ")
            ),
        }
    }
}

/// Runs the Banker's safety search on a validated state.
pub fn check_safety(state: ValidState<'_>) -> SafetyReport {
    let result = fixed_point::run(state);

    if result.trace.complete {
        SafetyReport::Safe {
            sequence: result.order,
            trace: result.trace,
        }
    } else {
        SafetyReport::Unsafe {
            unfinished: result.unfinished(),
            trace: result.trace,
        }
    }
}

/// Returns true if `sequence` names every process exactly once and each
/// process's need fits in the work vector accumulated before its turn.
pub fn is_safe_sequence(state: ValidState<'_>, sequence: &[ProcessId]) -> bool {
    let processes = state.process_count();
    if sequence.len() != processes {
        return false;
    }

    let mut seen = vec![false; processes];
    let mut work = state.available().clone();

    for process in sequence {
        let i = process.index();
        if i >= processes || seen[i] {
            return false;
        }
        let need = state.need_row(i);
        if need.iter().zip(work.iter()).any(|(n, w)| n > w) {
            return false;
        }
        for (w, held) in work.iter_mut().zip(state.allocation()[i].iter()) {
            *w += held;
        }
        seen[i] = true;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use crate::state::ResourceState;

    fn ids(indices: &[usize]) -> Vec<ProcessId> {
        indices.iter().copied().map(ProcessId).collect()
    }

    fn classic() -> ResourceState {
        ResourceState::from_matrices(
            vec![vec![0, 1, 0], vec![2, 0, 0], vec![3, 0, 2], vec![2, 1, 1], vec![0, 0, 2]],
            vec![vec![7, 5, 3], vec![3, 2, 2], vec![9, 0, 2], vec![2, 2, 2], vec![4, 3, 3]],
            vec![3, 3, 2],
        )
    }

    #[test]
    fn test_classic_state_is_safe() {
        let state = classic();
        let valid = state.validate(&Limits::default()).unwrap();
        let report = check_safety(valid);

        assert!(report.is_safe());
        // Lowest-index-first within each pass.
        assert_eq!(report.sequence().unwrap(), ids(&[1, 3, 4, 0, 2]).as_slice());
        assert!(is_safe_sequence(valid, report.sequence().unwrap()));

        let trace = report.trace();
        assert!(trace.complete);
        assert_eq!(trace.len(), 5);
        assert_eq!(trace.steps[0].work_before, vec![3, 3, 2]);
        assert_eq!(trace.steps[0].need, vec![1, 2, 2]);
        assert_eq!(trace.steps[0].allocation, vec![2, 0, 0]);
        assert_eq!(trace.steps[0].work_after, vec![5, 3, 2]);
        assert_eq!(trace.steps[4].work_after, vec![10, 5, 7]);
    }

    #[test]
    fn test_other_orders_can_also_be_safe() {
        let state = classic();
        let valid = state.validate(&Limits::default()).unwrap();
        assert!(is_safe_sequence(valid, &ids(&[1, 3, 0, 2, 4])));
        assert!(!is_safe_sequence(valid, &ids(&[0, 1, 2, 3, 4])));
        assert!(!is_safe_sequence(valid, &ids(&[1, 3, 4, 0])));
        assert!(!is_safe_sequence(valid, &ids(&[1, 1, 3, 4, 0])));
    }

    #[test]
    fn test_sequence_check_with_supply_at_the_limit() {
        // P1 needs four units; only P0's release brings work up to that.
        let state = ResourceState::from_matrices(
            vec![vec![3], vec![i64::MAX - 5]],
            vec![vec![3], vec![i64::MAX - 1]],
            vec![2],
        );
        let valid = state.validate(&Limits::default()).unwrap();
        assert_eq!(valid.total_resources(), Some(vec![i64::MAX]));

        assert!(is_safe_sequence(valid, &ids(&[0, 1])));
        assert!(!is_safe_sequence(valid, &ids(&[1, 0])));

        let report = check_safety(valid);
        assert_eq!(report.sequence(), Some(ids(&[0, 1]).as_slice()));
        assert_eq!(report.trace().steps[1].work_after, vec![i64::MAX]);
    }

    #[test]
    fn test_mutual_hold_is_unsafe() {
        let state = ResourceState::from_matrices(
            vec![vec![1, 0], vec![0, 1]],
            vec![vec![1, 1], vec![1, 1]],
            vec![0, 0],
        );
        let report = check_safety(state.validate(&Limits::default()).unwrap());

        assert!(!report.is_safe());
        assert!(report.sequence().is_none());
        assert_eq!(report.unfinished(), ids(&[0, 1]).as_slice());
        assert!(report.trace().is_empty());
        assert!(!report.trace().complete);
    }

    #[test]
    fn test_partial_trace_is_kept() {
        // P2 can finish but its release does not unblock P0 or P1.
        let state = ResourceState::from_matrices(
            vec![vec![1, 0], vec![0, 1], vec![0, 0]],
            vec![vec![1, 1], vec![1, 1], vec![0, 0]],
            vec![0, 0],
        );
        let report = check_safety(state.validate(&Limits::default()).unwrap());

        assert_eq!(report.unfinished(), ids(&[0, 1]).as_slice());
        assert_eq!(report.trace().len(), 1);
        assert_eq!(report.trace().steps[0].process, ProcessId(2));
        assert!(report.to_string().contains("unfinished: P0, P1"));
    }

    #[test]
    fn test_display_safe_sequence() {
        let state = classic();
        let report = check_safety(state.validate(&Limits::default()).unwrap());
        assert_eq!(
            report.to_string(),
            "System is in a safe state! Safe sequence: P1 → P3 → P4 → P0 → P2"
        );
    }
}
