//! Wait-For Graph Builder + Cycle Detector
//!
//! Edge `i -> j` means process `i` still needs some resource type that
//! process `j` currently holds units of. The graph is rebuilt from the
//! state on every call and never has self-edges.

use crate::state::{join_processes, ProcessId, ValidState};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitForGraph {
    // Sorted, duplicate-free successor lists indexed by process.
    adjacency: Vec<Vec<usize>>,
}

impl WaitForGraph {
    pub fn build(state: ValidState<'_>) -> Self {
        let processes = state.process_count();
        let resources = state.resource_count();
        let need = state.need();
        let allocation = state.allocation();

        let adjacency = (0..processes)
            .map(|i| {
                (0..processes)
                    .filter(|&j| {
                        i != j && (0..resources).any(|k| need[i][k] > 0 && allocation[j][k] > 0)
                    })
                    .collect()
            })
            .collect();

        WaitForGraph { adjacency }
    }

    pub fn process_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn successors(&self, process: ProcessId) -> &[usize] {
        self.adjacency
            .get(process.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_edge(&self, from: ProcessId, to: ProcessId) -> bool {
        self.successors(from).binary_search(&to.index()).is_ok()
    }

    pub fn edges(&self) -> Vec<(ProcessId, ProcessId)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, targets)| targets.iter().map(move |&j| (ProcessId(i), ProcessId(j))))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Depth-first search from `start` with fresh visited/on-stack state.
    /// Returns the first cycle met, in path order starting at the node
    /// where the back edge lands.
    pub fn detect_cycle(&self, start: ProcessId) -> Option<Vec<ProcessId>> {
        let n = self.adjacency.len();
        if start.index() >= n {
            return None;
        }

        let mut visited = vec![false; n];
        let mut rec_stack = Vec::new();

        self.dfs(start.index(), &mut visited, &mut rec_stack)
            .map(|cycle| cycle.into_iter().map(ProcessId).collect())
    }

    fn dfs(&self, node: usize, visited: &mut [bool], rec_stack: &mut Vec<usize>) -> Option<Vec<usize>> {
        visited[node] = true;
        rec_stack.push(node);

        for &neighbor in &self.adjacency[node] {
            if !visited[neighbor] {
                if let Some(cycle) = self.dfs(neighbor, visited, rec_stack) {
                    return Some(cycle);
                }
            } else if let Some(pos) = rec_stack.iter().position(|&p| p == neighbor) {
                return Some(rec_stack[pos..].to_vec());
            }
        }

        rec_stack.pop();
        None
    }

    /// True if `process` can reach itself through at least one edge.
    pub fn on_cycle(&self, process: ProcessId) -> bool {
        let start = process.index();
        if start >= self.adjacency.len() {
            return false;
        }

        let mut visited = vec![false; self.adjacency.len()];
        let mut stack: Vec<usize> = self.adjacency[start].clone();

        while let Some(node) = stack.pop() {
            if node == start {
                return true;
            }
            if visited[node] {
                continue;
            }
            visited[node] = true;
            stack.extend(self.adjacency[node].iter().copied().filter(|&next| !visited[next]));
        }

        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitForReport {
    pub has_cycle: bool,
    /// Processes from which a cycle is reachable, ascending, each listed once.
    pub involved_processes: Vec<ProcessId>,
    /// Processes lying on some cycle, ascending. A subset of `involved_processes`.
    pub cycle_members: Vec<ProcessId>,
    /// One concrete cycle, found from the lowest-index origin.
    pub cycle: Option<Vec<ProcessId>>,
    pub edges: Vec<(ProcessId, ProcessId)>,
}

impl fmt::Display for WaitForReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_cycle {
            write!(
                f,
                "Cycle detected in wait-for graph. Processes: {}",
                join_processes(&self.involved_processes, ", ")
            )?;
            if let Some(cycle) = &self.cycle {
                if let Some(first) = cycle.first() {
                    write!(f, " (cycle: {} → {})", join_processes(cycle, " → "), first)?;
                }
            }
            Ok(())
        } else {
            write!(f, "No cycle detected in wait-for graph. System is safe.")
        }
    }
}

/// Builds the wait-for graph and runs cycle detection from every process.
pub fn analyze_wait_for(state: ValidState<'_>) -> WaitForReport {
    let graph = WaitForGraph::build(state);
    let mut involved_processes = Vec::new();
    let mut cycle = None;

    for origin in (0..graph.process_count()).map(ProcessId) {
        if let Some(found) = graph.detect_cycle(origin) {
            involved_processes.push(origin);
            cycle.get_or_insert(found);
        }
    }

    let cycle_members = (0..graph.process_count())
        .map(ProcessId)
        .filter(|&p| graph.on_cycle(p))
        .collect();

    WaitForReport {
        has_cycle: !involved_processes.is_empty(),
        involved_processes,
        cycle_members,
        cycle,
        edges: graph.edges(),
    }
}
