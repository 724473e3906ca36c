//! Engine facade.
//!
//! Owns the configuration and the shared statistics aggregator. Every DP
//! result produced through the engine, by a single solve or by a
//! comparison, is recorded exactly once.

pub mod rng;
pub mod stats;

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

pub use rng::SolverRng;
pub use stats::{StatisticsAggregator, StatisticsSnapshot};

use crate::compare::{Comparator, ComparisonReport};
use crate::config::EngineConfig;
use crate::dataset::{evaluate_rows, DatasetReport, DatasetRow};
use crate::error::TspResult;
use crate::tsp::{Algorithm, BruteForce, HeldKarpSolver, SolveResult, TspInstance};

/// Configured solvers plus process-wide statistics.
///
/// Cloning is cheap and clones share statistics.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    comparator: Comparator,
    stats: Arc<StatisticsAggregator>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Engine with fresh statistics.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_statistics(config, Arc::new(StatisticsAggregator::new()))
    }

    /// Engine recording into an existing aggregator.
    #[must_use]
    pub fn with_statistics(config: EngineConfig, stats: Arc<StatisticsAggregator>) -> Self {
        let comparator = Comparator::new(
            HeldKarpSolver::new(config.limits.max_dp_cities),
            BruteForce::new(config.limits.max_brute_force_cities, config.brute_force_budget()),
            config.noise_model(),
        )
        .with_search(config.genetic_search(), config.annealing());
        debug!(
            max_dp_cities = config.limits.max_dp_cities,
            max_brute_force_cities = config.limits.max_brute_force_cities,
            default_threshold = config.quantum.default_threshold,
            noisy = config.quantum.noise.enabled,
            "engine configured"
        );
        Self {
            config,
            comparator,
            stats,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Configured default threshold.
    #[must_use]
    pub const fn default_threshold(&self) -> usize {
        self.config.quantum.default_threshold
    }

    /// Run one DP solver and record the result.
    ///
    /// # Errors
    ///
    /// `Validation` for a zero threshold, `ResourceLimitExceeded` above the
    /// DP ceiling, `UnknownAlgorithm` for a non-DP algorithm.
    pub fn solve(
        &self,
        instance: &TspInstance,
        algorithm: Algorithm,
        threshold: usize,
    ) -> TspResult<SolveResult> {
        let result = self.comparator.solve_dp(instance, algorithm, threshold)?;
        self.stats.record(&result);
        Ok(result)
    }

    /// Compare `algorithms` on `instance`, recording the DP results.
    ///
    /// # Errors
    ///
    /// `Validation` for a zero threshold.
    pub fn compare(
        &self,
        instance: &TspInstance,
        threshold: usize,
        algorithms: &BTreeSet<Algorithm>,
    ) -> TspResult<ComparisonReport> {
        self.comparator
            .compare(instance, threshold, algorithms, |result| self.stats.record(result))
    }

    /// Compare every algorithm with the default threshold.
    ///
    /// # Errors
    ///
    /// See [`Engine::compare`].
    pub fn evaluate(&self, instance: &TspInstance) -> TspResult<ComparisonReport> {
        let all: BTreeSet<_> = Algorithm::ALL.into_iter().collect();
        self.compare(instance, self.default_threshold(), &all)
    }

    /// Time both DP solvers over a dataset.
    ///
    /// # Errors
    ///
    /// See [`evaluate_rows`].
    pub fn evaluate_dataset(&self, rows: &[DatasetRow], threshold: usize) -> TspResult<DatasetReport> {
        evaluate_rows(self, rows, threshold)
    }

    /// Current statistics.
    #[must_use]
    pub fn statistics(&self) -> StatisticsSnapshot {
        self.stats.snapshot()
    }

    /// Shared aggregator handle.
    #[must_use]
    pub fn statistics_handle(&self) -> Arc<StatisticsAggregator> {
        Arc::clone(&self.stats)
    }
}
