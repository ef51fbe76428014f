//! Deadlock Analysis Core
//!
//! Algorithms over a resource-allocation model (processes, resource types,
//! allocation/max/need matrices):
//! - Banker's safety check with a step-by-step trace
//! - Deadlock detection over the current allocation
//! - Wait-for graph construction and cycle detection
//!
//! Every analysis is a pure function of a validated [`ResourceState`].

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod scenario;
pub mod state;

pub use analysis::{
    analyze_wait_for, check_safety, detect_deadlock, is_safe_sequence, AllocationGraph,
    DeadlockReport, SafetyReport, StepTrace, TraceStep, WaitForGraph, WaitForReport,
};
pub use config::{ConfigBuilder, EngineConfig, Environment, Limits};
pub use engine::{Algorithm, AnalysisOutcome, AnalysisRun, DeadlockAnalyzer};
pub use error::{Error, Result};
pub use metrics::{MetricsCollector, PerformanceMetrics};
pub use scenario::Scenario;
pub use state::{ErrorKind, ProcessId, ResourceState, ValidState, ValidationError};
