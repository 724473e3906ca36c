//! Analytic model of Grover-style minimum finding.
//!
//! No state vector is simulated. For a search over `N` candidates with a
//! single marked item the model uses the closed forms
//!
//! ```text
//! k = ⌈(π/4)·√N⌉          oracle queries
//! θ = asin(1/√N)
//! p = sin²((2k+1)·θ)      probability of measuring the marked item
//! ```
//!
//! The minimizer itself is always computed exactly by the caller; this module
//! only decides how many oracle calls the step is charged and how confident
//! the model is in it.

use std::f64::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::engine::rng::SolverRng;

/// Smallest candidate count for which amplification is defined.
///
/// With `N = 1` the marked item is found with certainty and `asin(1)` sits on
/// the edge of its domain; with `N = 0` there is nothing to search.
pub const MIN_AMPLIFIABLE: usize = 2;

/// Grover iteration count `⌈(π/4)·√N⌉`, or `None` when `N < 2`.
#[must_use]
pub fn grover_iterations(candidates: usize) -> Option<u64> {
    if candidates < MIN_AMPLIFIABLE {
        return None;
    }
    let k = (FRAC_PI_4 * (candidates as f64).sqrt()).ceil();
    Some(k as u64)
}

/// Success probability `sin²((2k+1)·asin(1/√N))`, or `None` when `N < 2`.
#[must_use]
pub fn success_probability(candidates: usize, iterations: u64) -> Option<f64> {
    if candidates < MIN_AMPLIFIABLE {
        return None;
    }
    let theta = (1.0 / (candidates as f64).sqrt()).asin();
    let angle = (2.0 * iterations as f64 + 1.0) * theta;
    Some(angle.sin().powi(2))
}

/// Parameters of the optional noisy measurement model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Seed for the Bernoulli trials.
    pub seed: u64,
    /// Extra amplification rounds after a failed measurement.
    pub max_retries: u32,
}

/// Accounting for one amplified resolution step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmplificationOutcome {
    /// Oracle queries charged, summed over every attempt.
    pub oracle_calls: u64,
    /// Analytic success probability of the first attempt.
    pub success_probability: f64,
    /// Attempts after the first one.
    pub retries: u32,
    /// Every attempt failed and the step must be resolved by a linear scan.
    pub fell_back: bool,
}

/// Charges oracle calls for amplified steps, optionally drawing noisy
/// measurements.
#[derive(Debug, Clone)]
pub struct Amplifier {
    noise: Option<(SolverRng, u32)>,
}

impl Amplifier {
    /// Model where every measurement succeeds.
    #[must_use]
    pub const fn deterministic() -> Self {
        Self { noise: None }
    }

    /// Model where each measurement succeeds with probability `p`.
    #[must_use]
    pub fn noisy(model: NoiseModel) -> Self {
        Self {
            noise: Some((SolverRng::new(model.seed), model.max_retries)),
        }
    }

    /// Amplify over `candidates` items. `None` when `candidates < 2`.
    pub fn amplify(&mut self, candidates: usize) -> Option<AmplificationOutcome> {
        let first_k = grover_iterations(candidates)?;
        let first_p = success_probability(candidates, first_k)?;

        let Some((rng, max_retries)) = self.noise.as_mut() else {
            return Some(AmplificationOutcome {
                oracle_calls: first_k,
                success_probability: first_p,
                retries: 0,
                fell_back: false,
            });
        };

        let mut oracle_calls = 0u64;
        let mut k = first_k;
        for attempt in 0..=*max_retries {
            oracle_calls += k;
            let p = success_probability(candidates, k).unwrap_or(0.0);
            if rng.bernoulli(p) {
                return Some(AmplificationOutcome {
                    oracle_calls,
                    success_probability: first_p,
                    retries: attempt,
                    fell_back: false,
                });
            }
            k += 1;
        }

        Some(AmplificationOutcome {
            oracle_calls,
            success_probability: first_p,
            retries: *max_retries,
            fell_back: true,
        })
    }
}

impl Default for Amplifier {
    fn default() -> Self {
        Self::deterministic()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_iterations_closed_form() {
        assert_eq!(grover_iterations(0), None);
        assert_eq!(grover_iterations(1), None);
        // ⌈0.785·√2⌉ = ⌈1.11⌉
        assert_eq!(grover_iterations(2), Some(2));
        assert_eq!(grover_iterations(4), Some(2));
        // ⌈0.785·√7⌉ = ⌈2.078⌉
        assert_eq!(grover_iterations(7), Some(3));
        assert_eq!(grover_iterations(100), Some(8));
    }

    #[test]
    fn test_success_probability_closed_form() {
        assert_eq!(success_probability(1, 1), None);
        // N = 4: θ = π/6, k = 1 gives sin²(π/2) = 1
        let p = success_probability(4, 1).expect("defined");
        assert!((p - 1.0).abs() < 1e-12);
        // N = 4, k = 2: sin²(5π/6) = 0.25
        let p = success_probability(4, 2).expect("defined");
        assert!((p - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_probability_in_unit_interval() {
        for n in 2..200 {
            let k = grover_iterations(n).expect("defined");
            let p = success_probability(n, k).expect("defined");
            assert!((0.0..=1.0).contains(&p), "p = {p} for N = {n}");
        }
    }

    #[test]
    fn test_deterministic_charges_k() {
        let mut amp = Amplifier::deterministic();
        let outcome = amp.amplify(9).expect("amplifiable");
        assert_eq!(outcome.oracle_calls, 3);
        assert_eq!(outcome.retries, 0);
        assert!(!outcome.fell_back);
        assert!(amp.amplify(1).is_none());
    }

    #[test]
    fn test_noisy_never_charges_less_than_first_round() {
        let mut amp = Amplifier::noisy(NoiseModel {
            seed: 42,
            max_retries: 3,
        });
        for n in 2..50 {
            let k = grover_iterations(n).expect("defined");
            let outcome = amp.amplify(n).expect("amplifiable");
            assert!(outcome.oracle_calls >= k);
            assert!(outcome.retries <= 3);
        }
    }

    #[test]
    fn test_noisy_zero_retries_falls_back_on_failure() {
        // N = 4 with k = 2 succeeds a quarter of the time; over many steps
        // some must fall back when no retry is allowed.
        let mut amp = Amplifier::noisy(NoiseModel {
            seed: 1,
            max_retries: 0,
        });
        let outcomes: Vec<_> = (0..200).filter_map(|_| amp.amplify(4)).collect();
        assert!(outcomes.iter().any(|o| o.fell_back));
        assert!(outcomes.iter().all(|o| o.oracle_calls == 2));
    }
}
