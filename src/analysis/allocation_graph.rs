// Resource-Allocation Graph
//
// Bipartite view of a state for renderers: assignment edges go from a
// resource to each process holding units of it, request edges go from a
// process to each resource it still needs but holds none of.
use crate::state::{ProcessId, Units, ValidState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub resource: usize,
    pub process: ProcessId,
    pub units: Units,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub process: ProcessId,
    pub resource: usize,
    pub units: Units,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationGraph {
    pub assignments: Vec<Assignment>,
    pub requests: Vec<Request>,
}

impl AllocationGraph {
    pub fn build(state: ValidState<'_>) -> Self {
        let mut graph = AllocationGraph::default();

        for (i, held_row) in state.allocation().iter().enumerate() {
            let need = state.need_row(i);
            for (j, (&held, &wanted)) in held_row.iter().zip(need.iter()).enumerate() {
                if held > 0 {
                    graph.assignments.push(Assignment {
                        resource: j,
                        process: ProcessId(i),
                        units: held,
                    });
                }
                if wanted > 0 && held == 0 {
                    graph.requests.push(Request {
                        process: ProcessId(i),
                        resource: j,
                        units: wanted,
                    });
                }
            }
        }

        graph
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use crate::state::ResourceState;

    #[test]
    fn test_assignment_and_request_edges() {
        let state = ResourceState::from_matrices(
            vec![vec![2, 0], vec![1, 1]],
            vec![vec![3, 1], vec![1, 1]],
            vec![0, 0],
        );
        let graph = AllocationGraph::build(state.validate(&Limits::default()).unwrap());

        assert_eq!(
            graph.assignments,
            vec![
                Assignment { resource: 0, process: ProcessId(0), units: 2 },
                Assignment { resource: 0, process: ProcessId(1), units: 1 },
                Assignment { resource: 1, process: ProcessId(1), units: 1 },
            ]
        );
        // P0 still needs one R0 but already holds some, so only R1 is a request.
        assert_eq!(
            graph.requests,
            vec![Request { process: ProcessId(0), resource: 1, units: 1 }]
        );
    }

    #[test]
    fn test_idle_state_has_no_edges() {
        let state = ResourceState::zeroed(3, 2);
        assert!(AllocationGraph::build(state.validate(&Limits::default()).unwrap()).is_empty());
    }

    #[test]
    fn test_large_holdings_keep_exact_units() {
        let state = ResourceState::from_matrices(
            vec![vec![i64::MAX - 1, 0]],
            vec![vec![i64::MAX - 1, i64::MAX]],
            vec![1, 0],
        );
        let graph = AllocationGraph::build(state.validate(&Limits::default()).unwrap());

        assert_eq!(
            graph.assignments,
            vec![Assignment { resource: 0, process: ProcessId(0), units: i64::MAX - 1 }]
        );
        assert_eq!(
            graph.requests,
            vec![Request { process: ProcessId(0), resource: 1, units: i64::MAX }]
        );
    }
}
