//! Analysis Metrics
//!
//! Timing and counters collected around analyzer calls, plus a bounded log
//! of recent runs. Kept in memory only.

use crate::engine::Algorithm;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Per-run figures shown next to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerformanceMetrics {
    pub execution_time: Duration,
    pub processes_checked: usize,
    pub resources_analyzed: usize,
    pub deadlocked_count: usize,
}

impl PerformanceMetrics {
    pub fn execution_time_ms(&self) -> f64 {
        self.execution_time.as_secs_f64() * 1000.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub algorithm: Algorithm,
    pub summary: String,
    pub metrics: PerformanceMetrics,
    pub timestamp: SystemTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub banker_runs: u64,
    pub detection_runs: u64,
    pub wait_for_runs: u64,
    pub rejected_inputs: u64,
    pub deadlocks_found: u64,
    pub total_time: Duration,
}

impl MetricsSnapshot {
    pub fn total_runs(&self) -> u64 {
        self.banker_runs + self.detection_runs + self.wait_for_runs
    }
}

/// Thread-safe collector shared by clones of an analyzer.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    inner: Arc<RwLock<CollectorInner>>,
}

#[derive(Debug)]
struct CollectorInner {
    totals: MetricsSnapshot,
    recent: VecDeque<RunRecord>,
    max_recent: usize,
}

impl MetricsCollector {
    pub fn new(max_recent: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CollectorInner {
                totals: MetricsSnapshot::default(),
                recent: VecDeque::with_capacity(max_recent),
                max_recent,
            })),
        }
    }

    pub fn record_run(&self, algorithm: Algorithm, summary: String, metrics: PerformanceMetrics) {
        let mut inner = self.inner.write();

        match algorithm {
            Algorithm::Banker => inner.totals.banker_runs += 1,
            Algorithm::Detection => inner.totals.detection_runs += 1,
            Algorithm::WaitFor => inner.totals.wait_for_runs += 1,
        }
        if metrics.deadlocked_count > 0 {
            inner.totals.deadlocks_found += 1;
        }
        inner.totals.total_time += metrics.execution_time;

        if inner.max_recent == 0 {
            return;
        }
        if inner.recent.len() >= inner.max_recent {
            inner.recent.pop_front();
        }
        inner.recent.push_back(RunRecord {
            algorithm,
            summary,
            metrics,
            timestamp: SystemTime::now(),
        });
    }

    pub fn record_rejection(&self) {
        self.inner.write().totals.rejected_inputs += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.read().totals.clone()
    }

    /// Recent runs, newest first.
    pub fn recent_runs(&self) -> Vec<RunRecord> {
        self.inner.read().recent.iter().rev().cloned().collect()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.totals = MetricsSnapshot::default();
        inner.recent.clear();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(50)
    }
}
