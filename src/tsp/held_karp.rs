//! Held-Karp bitmask dynamic program.
//!
//! City 0 is the fixed start and end of every tour. The table is indexed by
//! the visited set without city 0 (bit `c - 1` for city `c`) and by the last
//! city, giving `n · 2ⁿ⁻¹` slots of which `(n-1) · 2ⁿ⁻²` are real states.
//!
//! Both solvers run the same recurrence; they differ only in the
//! [`MinimumSearch`] used to charge each predecessor minimization.

use std::time::Instant;

use tracing::debug;

use super::amplification::{Amplifier, NoiseModel};
use super::instance::TspInstance;
use super::{Algorithm, AmplificationSummary, SolveResult};
use crate::error::{TspError, TspResult, ValidationError};

/// Default ceiling on city count for the DP solvers.
pub const DEFAULT_MAX_DP_CITIES: usize = 15;

/// Highest ceiling a solver accepts. Tables for 20 cities already hold
/// `20 · 2¹⁹` slots.
pub const MAX_DP_CITIES: usize = 20;

/// A predecessor candidate: city index and the cost of arriving through it.
pub type Candidate = (usize, u64);

/// Number of `(visited, last)` states the recurrence computes for `n` cities.
#[must_use]
pub const fn held_karp_state_count(n: usize) -> u64 {
    if n < 2 {
        return 0;
    }
    (n as u64 - 1) << (n - 2)
}

/// Linear scan for the cheapest candidate.
///
/// Candidates arrive in ascending city order and only a strictly smaller cost
/// replaces the incumbent, so ties go to the smaller city index.
#[must_use]
pub fn scan_minimum(candidates: &[Candidate]) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for &(city, cost) in candidates {
        match best {
            Some((_, best_cost)) if cost >= best_cost => {}
            _ => best = Some((city, cost)),
        }
    }
    best
}

/// Call-count bookkeeping for one solve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Linear-scan comparisons.
    pub classical_calls: u64,
    /// Simulated oracle queries.
    pub quantum_calls: u64,
    /// Steps resolved through amplification.
    pub amplified_steps: u64,
    /// Extra amplification rounds after failed measurements.
    pub retries: u64,
    /// Amplified steps that gave up and scanned.
    pub fallbacks: u64,
    probability_sum: f64,
    probability_min: Option<f64>,
}

impl SearchStats {
    fn record_probability(&mut self, p: f64) {
        self.probability_sum += p;
        self.probability_min = Some(self.probability_min.map_or(p, |m| m.min(p)));
    }

    /// Summary of the amplified steps.
    #[must_use]
    pub fn summary(&self) -> AmplificationSummary {
        AmplificationSummary {
            amplified_steps: self.amplified_steps,
            mean_success_probability: (self.amplified_steps > 0)
                .then(|| self.probability_sum / self.amplified_steps as f64),
            min_success_probability: self.probability_min,
            retries: self.retries,
            fallbacks: self.fallbacks,
        }
    }
}

/// Strategy for resolving a predecessor minimization and charging its cost.
pub trait MinimumSearch {
    /// Return the cheapest candidate, recording the calls it took.
    fn search(&mut self, candidates: &[Candidate], stats: &mut SearchStats) -> Option<Candidate>;
}

/// Plain linear scan: `N` comparisons for `N` candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl MinimumSearch for LinearScan {
    fn search(&mut self, candidates: &[Candidate], stats: &mut SearchStats) -> Option<Candidate> {
        stats.classical_calls += candidates.len() as u64;
        scan_minimum(candidates)
    }
}

/// Amplitude-amplified search above a candidate-count threshold.
#[derive(Debug, Clone)]
pub struct AmplifiedSearch {
    threshold: usize,
    amplifier: Amplifier,
}

impl AmplifiedSearch {
    /// Amplify every step with more than `threshold` candidates.
    #[must_use]
    pub const fn new(threshold: usize, amplifier: Amplifier) -> Self {
        Self {
            threshold,
            amplifier,
        }
    }
}

impl MinimumSearch for AmplifiedSearch {
    fn search(&mut self, candidates: &[Candidate], stats: &mut SearchStats) -> Option<Candidate> {
        let n = candidates.len();
        if n > self.threshold {
            if let Some(outcome) = self.amplifier.amplify(n) {
                stats.quantum_calls += outcome.oracle_calls;
                stats.amplified_steps += 1;
                stats.retries += u64::from(outcome.retries);
                stats.record_probability(outcome.success_probability);
                if outcome.fell_back {
                    stats.fallbacks += 1;
                    stats.classical_calls += n as u64;
                }
                return scan_minimum(candidates);
            }
        }
        LinearScan.search(candidates, stats)
    }
}

/// Exact DP solver with a configurable city ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldKarpSolver {
    max_cities: usize,
}

impl Default for HeldKarpSolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DP_CITIES)
    }
}

impl HeldKarpSolver {
    /// Solver refusing instances with more than `max_cities` cities.
    ///
    /// Ceilings above [`MAX_DP_CITIES`] are lowered to it.
    #[must_use]
    pub const fn new(max_cities: usize) -> Self {
        let max_cities = if max_cities > MAX_DP_CITIES {
            MAX_DP_CITIES
        } else {
            max_cities
        };
        Self { max_cities }
    }

    /// Configured ceiling.
    #[must_use]
    pub const fn max_cities(&self) -> usize {
        self.max_cities
    }

    /// Classical Held-Karp.
    ///
    /// # Errors
    ///
    /// `ResourceLimitExceeded` when the instance is above the ceiling.
    pub fn solve_classical(&self, instance: &TspInstance) -> TspResult<SolveResult> {
        self.check_limit(Algorithm::ClassicalDp, instance)?;
        Ok(run(instance, Algorithm::ClassicalDp, &mut LinearScan))
    }

    /// Held-Karp with amplified predecessor search above `threshold`.
    ///
    /// # Errors
    ///
    /// `Validation` when `threshold < 1`; `ResourceLimitExceeded` when the
    /// instance is above the ceiling.
    pub fn solve_quantum(
        &self,
        instance: &TspInstance,
        threshold: usize,
        noise: Option<NoiseModel>,
    ) -> TspResult<SolveResult> {
        if threshold < 1 {
            return Err(ValidationError::InvalidThreshold { threshold: 0 }.into());
        }
        self.check_limit(Algorithm::QuantumDp, instance)?;
        let amplifier = noise.map_or_else(Amplifier::deterministic, Amplifier::noisy);
        let mut search = AmplifiedSearch::new(threshold, amplifier);
        Ok(run(instance, Algorithm::QuantumDp, &mut search))
    }

    fn check_limit(&self, algorithm: Algorithm, instance: &TspInstance) -> TspResult<()> {
        if instance.n() > self.max_cities {
            return Err(TspError::ResourceLimitExceeded {
                algorithm: algorithm.name(),
                n: instance.n(),
                limit: self.max_cities,
            });
        }
        Ok(())
    }
}

/// Classical Held-Karp with the default ceiling.
///
/// # Errors
///
/// See [`HeldKarpSolver::solve_classical`].
pub fn solve_classical(instance: &TspInstance) -> TspResult<SolveResult> {
    HeldKarpSolver::default().solve_classical(instance)
}

/// Deterministic quantum-amplified Held-Karp with the default ceiling.
///
/// # Errors
///
/// See [`HeldKarpSolver::solve_quantum`].
pub fn solve_quantum(instance: &TspInstance, threshold: usize) -> TspResult<SolveResult> {
    HeldKarpSolver::default().solve_quantum(instance, threshold, None)
}

const UNSET: u64 = u64::MAX;

fn run<S: MinimumSearch>(instance: &TspInstance, algorithm: Algorithm, search: &mut S) -> SolveResult {
    let start = Instant::now();
    let n = instance.n();
    let subsets = 1usize << (n - 1);
    let full = subsets - 1;
    let slot = |subset: usize, last: usize| subset * n + last;
    let bit = |city: usize| 1usize << (city - 1);

    let mut dp = vec![UNSET; subsets * n];
    let mut parent = vec![0usize; subsets * n];
    let mut stats = SearchStats::default();
    let mut states = 0u64;
    let mut candidates: Vec<Candidate> = Vec::with_capacity(n);

    // Numeric order visits every subset after all of its proper subsets.
    for subset in 1..subsets {
        for last in 1..n {
            if subset & bit(last) == 0 {
                continue;
            }
            let previous = subset & !bit(last);

            candidates.clear();
            if previous == 0 {
                candidates.push((0, instance.cost(0, last)));
            } else {
                for prev in 1..n {
                    if previous & bit(prev) != 0 {
                        let via = dp[slot(previous, prev)].saturating_add(instance.cost(prev, last));
                        candidates.push((prev, via));
                    }
                }
            }

            if let Some((prev, cost)) = search.search(&candidates, &mut stats) {
                dp[slot(subset, last)] = cost;
                parent[slot(subset, last)] = prev;
            }
            states += 1;
        }
    }

    candidates.clear();
    for last in 1..n {
        candidates.push((last, dp[slot(full, last)].saturating_add(instance.cost(last, 0))));
    }
    let (last, cost) = search.search(&candidates, &mut stats).unwrap_or((1, UNSET));

    let mut path = Vec::with_capacity(n + 1);
    path.push(0);
    let mut subset = full;
    let mut city = last;
    while city != 0 {
        path.push(city);
        let prev = parent[slot(subset, city)];
        subset &= !bit(city);
        city = prev;
    }
    path.push(0);
    path.reverse();

    let elapsed = start.elapsed();
    debug!(
        algorithm = algorithm.name(),
        n,
        cost,
        states,
        quantum_calls = stats.quantum_calls,
        classical_calls = stats.classical_calls,
        ?elapsed,
        "held-karp solve finished"
    );

    SolveResult {
        algorithm,
        n,
        path,
        cost,
        dp_states_explored: states,
        quantum_calls: stats.quantum_calls,
        classical_calls: stats.classical_calls,
        elapsed,
        amplification: stats.summary(),
    }
}
