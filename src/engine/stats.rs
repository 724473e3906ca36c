//! Process-wide running statistics over completed DP solves.
//!
//! Raw sums never leave this module; callers see averages through
//! [`StatisticsSnapshot`].

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::tsp::SolveResult;

#[derive(Debug, Default)]
struct Counters {
    total_runs: u64,
    sum_quantum_calls: u64,
    sum_classical_calls: u64,
    runs_by_algorithm: BTreeMap<&'static str, u64>,
    /// City count → (total seconds, runs).
    time_by_size: BTreeMap<usize, (f64, u64)>,
}

/// Averages derived from the running counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    /// Solves recorded since start-up.
    pub total_runs: u64,
    /// Mean simulated oracle queries per solve.
    pub avg_quantum_calls: f64,
    /// Mean linear-scan comparisons per solve.
    pub avg_classical_calls: f64,
    /// Solves per algorithm.
    pub algorithms: BTreeMap<String, u64>,
    /// Mean wall-clock seconds per city count.
    pub avg_time_by_size: BTreeMap<usize, f64>,
}

/// Mutex-guarded accumulator shared by every solve in the process.
#[derive(Debug, Default)]
pub struct StatisticsAggregator {
    inner: Mutex<Counters>,
}

impl StatisticsAggregator {
    /// Empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed solve into the counters.
    ///
    /// The whole update happens under a single lock acquisition.
    pub fn record(&self, result: &SolveResult) {
        let mut counters = self.lock();
        counters.total_runs += 1;
        counters.sum_quantum_calls = counters.sum_quantum_calls.saturating_add(result.quantum_calls);
        counters.sum_classical_calls = counters
            .sum_classical_calls
            .saturating_add(result.classical_calls);
        *counters
            .runs_by_algorithm
            .entry(result.algorithm.name())
            .or_insert(0) += 1;
        let slot = counters.time_by_size.entry(result.n).or_insert((0.0, 0));
        slot.0 += result.elapsed.as_secs_f64();
        slot.1 += 1;
    }

    /// Current averages. All averages are 0.0 before the first record.
    #[must_use]
    pub fn snapshot(&self) -> StatisticsSnapshot {
        let counters = self.lock();
        let average = |sum: u64| {
            if counters.total_runs == 0 {
                0.0
            } else {
                sum as f64 / counters.total_runs as f64
            }
        };

        StatisticsSnapshot {
            total_runs: counters.total_runs,
            avg_quantum_calls: average(counters.sum_quantum_calls),
            avg_classical_calls: average(counters.sum_classical_calls),
            algorithms: counters
                .runs_by_algorithm
                .iter()
                .map(|(name, runs)| ((*name).to_string(), *runs))
                .collect(),
            avg_time_by_size: counters
                .time_by_size
                .iter()
                .map(|(&n, &(secs, runs))| (n, secs / runs as f64))
                .collect(),
        }
    }

    // A panic inside `record` cannot leave the counters half-written in a way
    // that matters for averages, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
