//! Deadlock Analyzer
//!
//! Entry points for embedding code: each call validates the state against
//! the configured limits, runs one analysis on its own local copies of the
//! work/finish/visited arrays, and times the call. Analyzers hold no
//! per-run state, so one instance can serve many threads.

use crate::analysis::{
    analyze_wait_for, check_safety, detect_deadlock, DeadlockReport, SafetyReport, WaitForReport,
};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::metrics::{MetricsCollector, PerformanceMetrics};
use crate::state::{ResourceState, ValidState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Banker,
    Detection,
    WaitFor,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Banker => "banker",
            Algorithm::Detection => "detection",
            Algorithm::WaitFor => "wait-for",
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Banker
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "banker" | "bankers" => Ok(Algorithm::Banker),
            "detection" | "detect" => Ok(Algorithm::Detection),
            "wait-for" | "waitfor" | "wait_for" => Ok(Algorithm::WaitFor),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Result of [`DeadlockAnalyzer::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", content = "report", rename_all = "kebab-case")]
pub enum AnalysisOutcome {
    Banker(SafetyReport),
    Detection(DeadlockReport),
    WaitFor(WaitForReport),
}

impl AnalysisOutcome {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            AnalysisOutcome::Banker(_) => Algorithm::Banker,
            AnalysisOutcome::Detection(_) => Algorithm::Detection,
            AnalysisOutcome::WaitFor(_) => Algorithm::WaitFor,
        }
    }

    /// True when the analysis found nothing wrong.
    pub fn is_healthy(&self) -> bool {
        match self {
            AnalysisOutcome::Banker(report) => report.is_safe(),
            AnalysisOutcome::Detection(report) => !report.is_deadlocked(),
            AnalysisOutcome::WaitFor(report) => !report.has_cycle,
        }
    }
}

impl fmt::Display for AnalysisOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisOutcome::Banker(report) => fmt::Display::fmt(report, f),
            AnalysisOutcome::Detection(report) => fmt::Display::fmt(report, f),
            AnalysisOutcome::WaitFor(report) => fmt::Display::fmt(report, f),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRun {
    pub outcome: AnalysisOutcome,
    pub metrics: PerformanceMetrics,
}

/// What the analyzer needs from a report to log and count it.
trait Verdict: fmt::Display {
    fn problem_count(&self) -> usize;
}

impl Verdict for SafetyReport {
    fn problem_count(&self) -> usize {
        self.unfinished().len()
    }
}

impl Verdict for DeadlockReport {
    fn problem_count(&self) -> usize {
        self.deadlocked_count()
    }
}

impl Verdict for WaitForReport {
    fn problem_count(&self) -> usize {
        self.cycle_members.len()
    }
}

#[derive(Debug, Clone)]
pub struct DeadlockAnalyzer {
    config: EngineConfig,
    metrics: MetricsCollector,
}

impl DeadlockAnalyzer {
    pub fn new(config: EngineConfig) -> Self {
        let metrics = MetricsCollector::new(config.history_size);
        Self { config, metrics }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Validates `state` against the configured limits without analyzing it.
    pub fn validate<'a>(&self, state: &'a ResourceState) -> Result<ValidState<'a>> {
        state.validate(&self.config.limits).map_err(|err| {
            warn!(kind = ?err.kind(), error = %err, "rejected resource state");
            self.metrics.record_rejection();
            Error::from(err)
        })
    }

    pub fn check_safety(&self, state: &ResourceState) -> Result<SafetyReport> {
        self.execute(Algorithm::Banker, state, check_safety)
            .map(|(report, _)| report)
    }

    pub fn detect_deadlock(&self, state: &ResourceState) -> Result<DeadlockReport> {
        self.execute(Algorithm::Detection, state, detect_deadlock)
            .map(|(report, _)| report)
    }

    pub fn analyze_wait_for(&self, state: &ResourceState) -> Result<WaitForReport> {
        self.execute(Algorithm::WaitFor, state, analyze_wait_for)
            .map(|(report, _)| report)
    }

    /// Runs the selected analysis and returns its report with timing.
    pub fn run(&self, algorithm: Algorithm, state: &ResourceState) -> Result<AnalysisRun> {
        let (outcome, metrics) = match algorithm {
            Algorithm::Banker => {
                let (report, metrics) = self.execute(algorithm, state, check_safety)?;
                (AnalysisOutcome::Banker(report), metrics)
            }
            Algorithm::Detection => {
                let (report, metrics) = self.execute(algorithm, state, detect_deadlock)?;
                (AnalysisOutcome::Detection(report), metrics)
            }
            Algorithm::WaitFor => {
                let (report, metrics) = self.execute(algorithm, state, analyze_wait_for)?;
                (AnalysisOutcome::WaitFor(report), metrics)
            }
        };

        Ok(AnalysisRun { outcome, metrics })
    }

    fn execute<T, F>(
        &self,
        algorithm: Algorithm,
        state: &ResourceState,
        analyze: F,
    ) -> Result<(T, PerformanceMetrics)>
    where
        T: Verdict,
        F: FnOnce(ValidState<'_>) -> T,
    {
        let valid = self.validate(state)?;

        debug!(
            %algorithm,
            processes = valid.process_count(),
            resources = valid.resource_count(),
            "running analysis"
        );

        let start = Instant::now();
        let report = analyze(valid);
        let metrics = PerformanceMetrics {
            execution_time: start.elapsed(),
            processes_checked: valid.process_count(),
            resources_analyzed: valid.resource_count(),
            deadlocked_count: report.problem_count(),
        };

        let summary = report.to_string();
        if metrics.deadlocked_count == 0 {
            info!(%algorithm, elapsed_us = metrics.execution_time.as_micros() as u64, "{}", summary);
        } else {
            warn!(
                %algorithm,
                affected = metrics.deadlocked_count,
                elapsed_us = metrics.execution_time.as_micros() as u64,
                "{}",
                summary
            );
        }

        self.metrics.record_run(algorithm, summary, metrics);
        Ok((report, metrics))
    }
}

impl Default for DeadlockAnalyzer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigBuilder, Environment};
    use crate::state::{ProcessId, ValidationError};

    fn deadlocked_pair() -> ResourceState {
        ResourceState::from_matrices(
            vec![vec![1, 0], vec![0, 1]],
            vec![vec![1, 1], vec![1, 1]],
            vec![0, 0],
        )
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("banker".parse::<Algorithm>().unwrap(), Algorithm::Banker);
        assert_eq!("Detection".parse::<Algorithm>().unwrap(), Algorithm::Detection);
        assert_eq!("wait-for".parse::<Algorithm>().unwrap(), Algorithm::WaitFor);
        assert!(matches!(
            "ostrich".parse::<Algorithm>(),
            Err(Error::UnknownAlgorithm(_))
        ));
        assert_eq!(Algorithm::WaitFor.to_string(), "wait-for");
    }

    #[test]
    fn test_run_dispatches_by_algorithm() {
        let analyzer = DeadlockAnalyzer::default();
        let state = deadlocked_pair();

        for algorithm in [Algorithm::Banker, Algorithm::Detection, Algorithm::WaitFor] {
            let run = analyzer.run(algorithm, &state).unwrap();
            assert_eq!(run.outcome.algorithm(), algorithm);
            assert!(!run.outcome.is_healthy());
            assert_eq!(run.metrics.processes_checked, 2);
            assert_eq!(run.metrics.resources_analyzed, 2);
            assert_eq!(run.metrics.deadlocked_count, 2);
        }

        let snapshot = analyzer.metrics().snapshot();
        assert_eq!(snapshot.total_runs(), 3);
        assert_eq!(snapshot.deadlocks_found, 3);
    }

    #[test]
    fn test_invalid_state_is_rejected_before_analysis() {
        let analyzer = DeadlockAnalyzer::default();
        let state = ResourceState::from_matrices(vec![vec![2]], vec![vec![1]], vec![0]);

        let err = analyzer.detect_deadlock(&state).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::AllocationExceedsMax { process: 0, resource: 0 })
        ));

        let snapshot = analyzer.metrics().snapshot();
        assert_eq!(snapshot.rejected_inputs, 1);
        assert_eq!(snapshot.total_runs(), 0);
        assert!(analyzer.metrics().recent_runs().is_empty());
    }

    #[test]
    fn test_limits_come_from_config() {
        let config = ConfigBuilder::new(Environment::Development)
            .with_max_processes(1)
            .build()
            .unwrap();
        let analyzer = DeadlockAnalyzer::new(config);

        let err = analyzer.check_safety(&deadlocked_pair()).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::Configuration { .. })));
    }

    #[test]
    fn test_typed_entry_points() {
        let analyzer = DeadlockAnalyzer::default();
        let state = deadlocked_pair();

        assert!(!analyzer.check_safety(&state).unwrap().is_safe());
        assert_eq!(
            analyzer.detect_deadlock(&state).unwrap().deadlocked,
            vec![ProcessId(0), ProcessId(1)]
        );
        assert!(analyzer.analyze_wait_for(&state).unwrap().has_cycle);
        assert_eq!(analyzer.metrics().recent_runs()[0].algorithm, Algorithm::WaitFor);
    }

    #[test]
    fn test_outcome_serializes_with_algorithm_tag() {
        let analyzer = DeadlockAnalyzer::default();
        let run = analyzer.run(Algorithm::Detection, &deadlocked_pair()).unwrap();
        let json = serde_json::to_value(&run.outcome).unwrap();

        assert_eq!(json["algorithm"], "detection");
        assert_eq!(json["report"]["deadlocked"], serde_json::json!([0, 1]));
        assert_eq!(json["report"]["processes_checked"], 2);
    }
}
