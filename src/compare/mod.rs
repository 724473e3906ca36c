//! Side-by-side runs of several algorithms on one instance.
//!
//! Algorithms run sequentially in canonical [`Algorithm`] order. An algorithm
//! that hits a resource limit or runs out of time is reported as skipped
//! instead of aborting the comparison.

use std::collections::BTreeSet;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{TspError, TspResult, ValidationError};
use crate::tsp::{
    nearest_neighbor, two_opt, Algorithm, BruteForce, GeneticSearch, HeldKarpSolver, NoiseModel,
    SimulatedAnnealing, SolveResult, Tour, TspInstance,
};

/// One row of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmMetric {
    /// Algorithm this row describes.
    pub algorithm: Algorithm,
    /// Tour cost, `None` when skipped.
    pub cost: Option<u64>,
    /// Wall-clock time, `None` when skipped.
    pub elapsed: Option<Duration>,
    /// Tour found, `None` when skipped.
    pub path: Option<Vec<usize>>,
    /// Oracle queries (DP solvers only).
    pub quantum_calls: Option<u64>,
    /// Linear-scan comparisons (DP solvers only).
    pub classical_calls: Option<u64>,
    /// Why the algorithm did not run.
    pub skip_reason: Option<String>,
}

impl AlgorithmMetric {
    fn from_solve(result: &SolveResult) -> Self {
        Self {
            algorithm: result.algorithm,
            cost: Some(result.cost),
            elapsed: Some(result.elapsed),
            path: Some(result.path.clone()),
            quantum_calls: Some(result.quantum_calls),
            classical_calls: Some(result.classical_calls),
            skip_reason: None,
        }
    }

    fn from_tour(tour: Tour) -> Self {
        Self {
            algorithm: tour.algorithm,
            cost: Some(tour.cost),
            elapsed: Some(tour.elapsed),
            path: Some(tour.path),
            quantum_calls: None,
            classical_calls: None,
            skip_reason: None,
        }
    }

    fn skipped(algorithm: Algorithm, error: &TspError) -> Self {
        Self {
            algorithm,
            cost: None,
            elapsed: None,
            path: None,
            quantum_calls: None,
            classical_calls: None,
            skip_reason: Some(error.to_string()),
        }
    }

    /// Whether the algorithm was skipped.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        self.skip_reason.is_some()
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.algorithm.label()
    }

    /// One-line description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.algorithm.description()
    }

    /// Complexity label.
    #[must_use]
    pub const fn complexity(&self) -> &'static str {
        self.algorithm.complexity()
    }
}

/// Outcome of [`Comparator::compare`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    /// City count of the compared instance.
    pub n: usize,
    /// One row per requested algorithm, in canonical order.
    pub metrics: Vec<AlgorithmMetric>,
    /// Classical DP time over quantum DP time.
    pub speedup: Option<f64>,
    /// Classical DP comparisons over quantum DP oracle queries.
    pub call_speedup: Option<f64>,
    /// `2ⁿ / 2^(n/2)`.
    pub theoretical_speedup: f64,
    /// Cheapest cost among the algorithms that ran.
    pub best_cost: Option<u64>,
    /// First algorithm (canonical order) reaching `best_cost`.
    pub best_algorithm: Option<Algorithm>,
}

impl ComparisonReport {
    /// Row for `algorithm`, if it was requested.
    #[must_use]
    pub fn metric(&self, algorithm: Algorithm) -> Option<&AlgorithmMetric> {
        self.metrics.iter().find(|m| m.algorithm == algorithm)
    }
}

/// `2ⁿ / 2^(n/2)`, the idealized quadratic speedup of amplitude
/// amplification over exhaustive subset enumeration.
#[must_use]
pub fn theoretical_speedup(n: usize) -> f64 {
    2f64.powf(n as f64 / 2.0)
}

/// Runs a set of algorithms against one instance with shared limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    dp: HeldKarpSolver,
    brute_force: BruteForce,
    noise: Option<NoiseModel>,
    genetic: GeneticSearch,
    annealing: SimulatedAnnealing,
}

impl Comparator {
    /// Comparator using the given solvers and optional noise model.
    #[must_use]
    pub fn new(dp: HeldKarpSolver, brute_force: BruteForce, noise: Option<NoiseModel>) -> Self {
        Self {
            dp,
            brute_force,
            noise,
            genetic: GeneticSearch::default(),
            annealing: SimulatedAnnealing::default(),
        }
    }

    /// Replace the stochastic baselines.
    #[must_use]
    pub const fn with_search(mut self, genetic: GeneticSearch, annealing: SimulatedAnnealing) -> Self {
        self.genetic = genetic;
        self.annealing = annealing;
        self
    }

    /// Run one DP solver.
    ///
    /// # Errors
    ///
    /// Whatever the solver returns; `UnknownAlgorithm` for a non-DP choice.
    pub fn solve_dp(
        &self,
        instance: &TspInstance,
        algorithm: Algorithm,
        threshold: usize,
    ) -> TspResult<SolveResult> {
        match algorithm {
            Algorithm::ClassicalDp => self.dp.solve_classical(instance),
            Algorithm::QuantumDp => self.dp.solve_quantum(instance, threshold, self.noise),
            other => Err(TspError::UnknownAlgorithm(format!(
                "{other} is not a dynamic-programming solver"
            ))),
        }
    }

    /// Run every algorithm in `algorithms` and summarize.
    ///
    /// `observe` sees each DP result as soon as it is produced.
    ///
    /// # Errors
    ///
    /// `Validation` when `threshold < 1`. Resource-limit and timeout failures
    /// of individual algorithms are reported as skipped rows; any other
    /// failure aborts the comparison.
    pub fn compare<F>(
        &self,
        instance: &TspInstance,
        threshold: usize,
        algorithms: &BTreeSet<Algorithm>,
        mut observe: F,
    ) -> TspResult<ComparisonReport>
    where
        F: FnMut(&SolveResult),
    {
        if threshold < 1 {
            return Err(ValidationError::InvalidThreshold { threshold: 0 }.into());
        }

        let mut metrics = Vec::with_capacity(algorithms.len());
        let mut quantum = None;
        let mut classical = None;

        for &algorithm in algorithms {
            let outcome = if algorithm.is_dp() {
                self.solve_dp(instance, algorithm, threshold).map(|result| {
                    observe(&result);
                    let metric = AlgorithmMetric::from_solve(&result);
                    if algorithm == Algorithm::QuantumDp {
                        quantum = Some(result);
                    } else {
                        classical = Some(result);
                    }
                    metric
                })
            } else {
                self.run_reference(instance, algorithm)
                    .map(AlgorithmMetric::from_tour)
            };

            let metric = match outcome {
                Ok(metric) => metric,
                Err(e) if !e.is_skippable() => return Err(e),
                Err(e) => {
                    warn!(
                        algorithm = algorithm.name(),
                        n = instance.n(),
                        error = %e,
                        "algorithm skipped"
                    );
                    AlgorithmMetric::skipped(algorithm, &e)
                }
            };
            metrics.push(metric);
        }

        let (speedup, call_speedup) = match (&classical, &quantum) {
            (Some(c), Some(q)) => (time_ratio(c.elapsed, q.elapsed), call_ratio(c, q)),
            _ => (None, None),
        };

        let mut best: Option<(u64, Algorithm)> = None;
        for metric in &metrics {
            if let Some(cost) = metric.cost {
                if best.map_or(true, |(b, _)| cost < b) {
                    best = Some((cost, metric.algorithm));
                }
            }
        }

        debug!(
            n = instance.n(),
            ran = metrics.iter().filter(|m| !m.is_skipped()).count(),
            ?speedup,
            "comparison finished"
        );
        Ok(ComparisonReport {
            n: instance.n(),
            metrics,
            speedup,
            call_speedup,
            theoretical_speedup: theoretical_speedup(instance.n()),
            best_cost: best.map(|(cost, _)| cost),
            best_algorithm: best.map(|(_, algorithm)| algorithm),
        })
    }

    fn run_reference(&self, instance: &TspInstance, algorithm: Algorithm) -> TspResult<Tour> {
        match algorithm {
            Algorithm::BruteForce => self.brute_force.solve(instance),
            Algorithm::NearestNeighbor => Ok(nearest_neighbor(instance)),
            Algorithm::TwoOpt => Ok(two_opt(instance)),
            Algorithm::Genetic => Ok(self.genetic.solve(instance)),
            Algorithm::SimulatedAnnealing => Ok(self.annealing.solve(instance)),
            other => Err(TspError::UnknownAlgorithm(other.to_string())),
        }
    }
}

fn time_ratio(classical: Duration, quantum: Duration) -> Option<f64> {
    let q = quantum.as_secs_f64();
    (q > 0.0).then(|| classical.as_secs_f64() / q)
}

fn call_ratio(classical: &SolveResult, quantum: &SolveResult) -> Option<f64> {
    (quantum.quantum_calls > 0)
        .then(|| classical.classical_calls as f64 / quantum.quantum_calls as f64)
}
