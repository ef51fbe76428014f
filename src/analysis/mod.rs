// Deadlock Analyses
// Banker's safety search, deadlock detection, wait-for graph cycles

pub mod allocation_graph;
pub mod detection;
pub mod fixed_point;
pub mod safety;
pub mod wait_for;

pub use allocation_graph::*;
pub use detection::*;
pub use fixed_point::{StepTrace, TraceStep};
pub use safety::*;
pub use wait_for::*;
