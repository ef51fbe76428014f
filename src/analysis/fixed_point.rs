//! Work/finish iteration shared by the safety checker and the detector.
//!
//! Starting from `work = available`, processes are scanned in ascending
//! index order; any unfinished process whose whole need row fits in `work`
//! finishes and returns its allocation to `work`. A pass that finishes
//! nobody ends the search. Lower indices win ties, which makes the result
//! deterministic; any other order that passes the same eligibility test is
//! an equally valid safe sequence.

use crate::state::types::format_vector;
use crate::state::{ProcessId, ResourceVector, Units, ValidState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One process completion recorded by the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub process: ProcessId,
    pub work_before: ResourceVector,
    pub need: ResourceVector,
    pub allocation: ResourceVector,
    pub work_after: ResourceVector,
}

/// Ordered completions. `complete` is false when the search stalled before
/// every process finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTrace {
    pub steps: Vec<TraceStep>,
    pub complete: bool,
}

impl StepTrace {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceStep> {
        self.steps.iter()
    }
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Execute {}: work {} need {} after {}",
            self.process,
            format_vector(&self.work_before),
            format_vector(&self.need),
            format_vector(&self.work_after)
        )
    }
}

impl fmt::Display for StepTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(f, "[Step {}] {}", index + 1, step)?;
        }
        if !self.complete {
            writeln!(f, "(incomplete: search stalled)")?;
        }
        Ok(())
    }
}

pub(crate) struct FixedPoint {
    pub finish: Vec<bool>,
    pub order: Vec<ProcessId>,
    pub trace: StepTrace,
}

impl FixedPoint {
    pub fn unfinished(&self) -> Vec<ProcessId> {
        self.finish
            .iter()
            .enumerate()
            .filter(|(_, done)| !**done)
            .map(|(i, _)| ProcessId(i))
            .collect()
    }
}

fn fits(need: &[Units], work: &[Units]) -> bool {
    need.iter().zip(work.iter()).all(|(n, w)| n <= w)
}

pub(crate) fn run(state: ValidState<'_>) -> FixedPoint {
    let processes = state.process_count();
    let mut work = state.available().clone();
    let mut finish = vec![false; processes];
    let mut order = Vec::with_capacity(processes);
    let mut steps = Vec::with_capacity(processes);

    loop {
        let mut progressed = false;

        for i in 0..processes {
            if finish[i] {
                continue;
            }
            let need = state.need_row(i);
            if !fits(&need, &work) {
                continue;
            }

            let allocation = state.allocation()[i].clone();
            let work_before = work.clone();
            for (w, held) in work.iter_mut().zip(allocation.iter()) {
                *w += held;
            }

            steps.push(TraceStep {
                process: ProcessId(i),
                work_before,
                need,
                allocation,
                work_after: work.clone(),
            });
            finish[i] = true;
            order.push(ProcessId(i));
            progressed = true;
        }

        if !progressed || order.len() == processes {
            break;
        }
    }

    let complete = order.len() == processes;
    FixedPoint {
        finish,
        order,
        trace: StepTrace { steps, complete },
    }
}
