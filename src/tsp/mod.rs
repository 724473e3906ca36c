//! Exact TSP solving engine.
//!
//! # Architecture
//!
//! ```text
//! cost matrix → validate → TspInstance
//!                              ↓
//!          ┌───────────┬───────┴──────┬──────────────┬────────────────┐
//!     classical DP  quantum DP   brute force   nearest neighbor   genetic /
//!                                              / 2-opt            annealing
//!          └──── SolveResult ───┘      └──────────────── Tour ───────────┘
//! ```
//!
//! The two DP solvers share one recurrence ([`held_karp`]); the quantum one
//! charges predecessor minimizations above a threshold with the analytic
//! Grover model of [`amplification`] instead of a linear scan.

pub mod amplification;
pub mod held_karp;
pub mod heuristics;
pub mod instance;
pub mod search;
pub mod yaml;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TspError;

pub use amplification::{grover_iterations, success_probability, Amplifier, NoiseModel};
pub use held_karp::{
    held_karp_state_count, solve_classical, solve_quantum, HeldKarpSolver, DEFAULT_MAX_DP_CITIES,
    MAX_DP_CITIES,
};
pub use heuristics::{
    brute_force, nearest_neighbor, two_opt, BruteForce, DEFAULT_MAX_BRUTE_FORCE_CITIES,
};
pub use instance::{validate, TspInstance};
pub use search::{GeneticSearch, SimulatedAnnealing};
pub use yaml::TspInstanceYaml;

/// Algorithms the engine can run, in canonical comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Held-Karp with simulated amplitude amplification.
    QuantumDp,
    /// Classical Held-Karp.
    ClassicalDp,
    /// Exhaustive permutation search.
    BruteForce,
    /// Greedy nearest-neighbor construction.
    NearestNeighbor,
    /// Nearest neighbor followed by 2-opt local search.
    TwoOpt,
    /// Seeded genetic algorithm.
    Genetic,
    /// Seeded simulated annealing from the nearest-neighbor tour.
    SimulatedAnnealing,
}

impl Algorithm {
    /// Every algorithm, in canonical order.
    pub const ALL: [Self; 7] = [
        Self::QuantumDp,
        Self::ClassicalDp,
        Self::BruteForce,
        Self::NearestNeighbor,
        Self::TwoOpt,
        Self::Genetic,
        Self::SimulatedAnnealing,
    ];

    /// Stable identifier (`snake_case`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::QuantumDp => "quantum_dp",
            Self::ClassicalDp => "classical_dp",
            Self::BruteForce => "brute_force",
            Self::NearestNeighbor => "nearest_neighbor",
            Self::TwoOpt => "two_opt",
            Self::Genetic => "genetic",
            Self::SimulatedAnnealing => "simulated_annealing",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::QuantumDp => "Quantum DP (Grover)",
            Self::ClassicalDp => "Classical DP (Held-Karp)",
            Self::BruteForce => "Brute Force",
            Self::NearestNeighbor => "Nearest Neighbor",
            Self::TwoOpt => "2-Opt Local Search",
            Self::Genetic => "Genetic Algorithm",
            Self::SimulatedAnnealing => "Simulated Annealing",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::QuantumDp => "Quantum-enhanced DP with simulated amplitude amplification",
            Self::ClassicalDp => "Exact classical solution",
            Self::BruteForce => "Exhaustive search over all tours",
            Self::NearestNeighbor => "Fast greedy heuristic",
            Self::TwoOpt => "Iterative improvement of the greedy tour",
            Self::Genetic => "Evolutionary optimization",
            Self::SimulatedAnnealing => "Probabilistic optimization",
        }
    }

    /// Complexity label for display.
    ///
    /// The quantum bound is a reporting convention; nothing enforces it.
    #[must_use]
    pub const fn complexity(self) -> &'static str {
        match self {
            Self::QuantumDp => "O(⌈c⌉⁴·√2ⁿ)",
            Self::ClassicalDp => "O(n²·2ⁿ)",
            Self::BruteForce => "O(n!)",
            Self::NearestNeighbor | Self::TwoOpt => "O(n²)",
            Self::Genetic => "O(g·p·n)",
            Self::SimulatedAnnealing => "O(i·n)",
        }
    }

    /// Whether this is one of the two DP solvers.
    #[must_use]
    pub const fn is_dp(self) -> bool {
        matches!(self, Self::QuantumDp | Self::ClassicalDp)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = TspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "quantum" | "quantum_dp" => Ok(Self::QuantumDp),
            "classical" | "classical_dp" | "held_karp" => Ok(Self::ClassicalDp),
            "brute_force" | "bruteforce" => Ok(Self::BruteForce),
            "nearest_neighbor" | "nn" => Ok(Self::NearestNeighbor),
            "two_opt" | "2opt" | "2_opt" => Ok(Self::TwoOpt),
            "genetic" | "genetic_algorithm" | "ga" => Ok(Self::Genetic),
            "simulated_annealing" | "annealing" | "sa" => Ok(Self::SimulatedAnnealing),
            _ => Err(TspError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Quality metrics of the amplified steps in one quantum solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AmplificationSummary {
    /// Resolution steps charged through amplification.
    pub amplified_steps: u64,
    /// Mean analytic success probability over amplified steps.
    pub mean_success_probability: Option<f64>,
    /// Lowest analytic success probability over amplified steps.
    pub min_success_probability: Option<f64>,
    /// Extra rounds after failed noisy measurements.
    pub retries: u64,
    /// Steps that exhausted their retries and scanned classically.
    pub fallbacks: u64,
}

/// Output of one DP solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    /// Solver that produced this result.
    pub algorithm: Algorithm,
    /// City count of the instance.
    pub n: usize,
    /// Hamiltonian cycle starting and ending at city 0.
    pub path: Vec<usize>,
    /// Total cycle weight.
    pub cost: u64,
    /// `(visited, last)` states computed.
    pub dp_states_explored: u64,
    /// Simulated oracle queries (0 for the classical solver).
    pub quantum_calls: u64,
    /// Linear-scan comparisons.
    pub classical_calls: u64,
    /// Wall-clock time of the solve.
    pub elapsed: Duration,
    /// Amplification quality metrics.
    pub amplification: AmplificationSummary,
}

/// Output of a reference algorithm (no call counters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    /// Algorithm that produced this tour.
    pub algorithm: Algorithm,
    /// Hamiltonian cycle starting and ending at city 0.
    pub path: Vec<usize>,
    /// Total cycle weight.
    pub cost: u64,
    /// Wall-clock time.
    pub elapsed: Duration,
}
