//! Seeded stochastic baselines: a genetic algorithm and simulated annealing.
//!
//! Both work on the visiting order of cities `1..n`, with city 0 as the fixed
//! start, and are reproducible for a given seed.

use std::time::Instant;

use tracing::debug;

use super::heuristics::{anchored, cycle_cost, nearest_neighbor_order};
use super::instance::TspInstance;
use super::{Algorithm, Tour};
use crate::engine::rng::SolverRng;

/// Default population of the genetic algorithm.
pub const DEFAULT_POPULATION_SIZE: usize = 50;

/// Default generation count of the genetic algorithm.
pub const DEFAULT_GENERATIONS: usize = 100;

/// Default proposal count of simulated annealing.
pub const DEFAULT_ANNEALING_ITERATIONS: usize = 1000;

/// Default seed of both searches.
pub const DEFAULT_SEARCH_SEED: u64 = 42;

const MUTATION_RATE: f64 = 0.3;
const TOURNAMENT_SIZE: usize = 3;
const INITIAL_TEMPERATURE: f64 = 1000.0;
const COOLING_RATE: f64 = 0.95;

/// Truncation-selection genetic algorithm with order crossover and swap
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneticSearch {
    population_size: usize,
    generations: usize,
    seed: u64,
}

impl Default for GeneticSearch {
    fn default() -> Self {
        Self::new(DEFAULT_POPULATION_SIZE, DEFAULT_GENERATIONS, DEFAULT_SEARCH_SEED)
    }
}

impl GeneticSearch {
    /// Search with `population_size` individuals (at least 2) over
    /// `generations` rounds.
    #[must_use]
    pub fn new(population_size: usize, generations: usize, seed: u64) -> Self {
        Self {
            population_size: population_size.max(2),
            generations,
            seed,
        }
    }

    /// Evolve a population and return its fittest tour.
    ///
    /// Each generation keeps the cheaper half and refills the rest with
    /// children of tournament-selected survivors, so the best cost never
    /// gets worse from one generation to the next.
    #[must_use]
    pub fn solve(&self, instance: &TspInstance) -> Tour {
        let start = Instant::now();
        let n = instance.n();
        let mut rng = SolverRng::new(self.seed);

        let mut population: Vec<(u64, Vec<usize>)> = (0..self.population_size)
            .map(|_| {
                let mut order: Vec<usize> = (1..n).collect();
                rng.shuffle(&mut order);
                (cycle_cost(instance, &order), order)
            })
            .collect();
        population.sort_by_key(|(cost, _)| *cost);

        let survivors = self.population_size / 2;
        for _ in 0..self.generations {
            population.truncate(survivors);
            while population.len() < self.population_size {
                let first = tournament(&population[..survivors], &mut rng);
                let second = tournament(&population[..survivors], &mut rng);
                let mut child = order_crossover(first, second, n, &mut rng);
                if rng.bernoulli(MUTATION_RATE) {
                    let i = rng.gen_index(child.len());
                    let j = rng.gen_index(child.len());
                    child.swap(i, j);
                }
                population.push((cycle_cost(instance, &child), child));
            }
            population.sort_by_key(|(cost, _)| *cost);
        }

        let (cost, order) = &population[0];
        debug!(n, cost, generations = self.generations, "genetic search finished");
        Tour {
            algorithm: Algorithm::Genetic,
            path: anchored(order),
            cost: *cost,
            elapsed: start.elapsed(),
        }
    }
}

/// Cheapest of `TOURNAMENT_SIZE` random picks.
fn tournament<'a>(pool: &'a [(u64, Vec<usize>)], rng: &mut SolverRng) -> &'a [usize] {
    let pick = (0..TOURNAMENT_SIZE)
        .map(|_| &pool[rng.gen_index(pool.len())])
        .min_by_key(|(cost, _)| *cost)
        .unwrap_or(&pool[0]);
    &pick.1
}

/// Copy a random slice of `first`, then fill the remaining positions with the
/// missing cities in the order they appear in `second`, starting after the
/// slice and wrapping around.
fn order_crossover(first: &[usize], second: &[usize], n: usize, rng: &mut SolverRng) -> Vec<usize> {
    let len = first.len();
    let (mut a, mut b) = (rng.gen_index(len), rng.gen_index(len));
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }

    let mut child = vec![0; len];
    let mut used = vec![false; n];
    for i in a..=b {
        child[i] = first[i];
        used[first[i]] = true;
    }

    let mut pos = (b + 1) % len;
    let mut from = (b + 1) % len;
    for _ in 0..len - (b - a + 1) {
        while used[second[from]] {
            from = (from + 1) % len;
        }
        child[pos] = second[from];
        used[second[from]] = true;
        pos = (pos + 1) % len;
        from = (from + 1) % len;
    }
    child
}

/// Simulated annealing over city swaps, started from the nearest-neighbor
/// tour with geometric cooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedAnnealing {
    iterations: usize,
    seed: u64,
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        Self::new(DEFAULT_ANNEALING_ITERATIONS, DEFAULT_SEARCH_SEED)
    }
}

impl SimulatedAnnealing {
    /// Annealing with `iterations` swap proposals.
    #[must_use]
    pub const fn new(iterations: usize, seed: u64) -> Self {
        Self { iterations, seed }
    }

    /// Anneal and return the best tour seen.
    ///
    /// Never worse than [`nearest_neighbor`](super::nearest_neighbor).
    #[must_use]
    pub fn solve(&self, instance: &TspInstance) -> Tour {
        let start = Instant::now();
        let mut rng = SolverRng::new(self.seed);

        let mut order = nearest_neighbor_order(instance);
        let mut cost = cycle_cost(instance, &order);
        let mut best = (cost, order.clone());
        let mut temperature = INITIAL_TEMPERATURE;
        let mut accepted = 0u64;

        for _ in 0..self.iterations {
            let i = rng.gen_index(order.len());
            let j = rng.gen_index(order.len());
            order.swap(i, j);
            let candidate = cycle_cost(instance, &order);
            let delta = candidate as f64 - cost as f64;

            if delta < 0.0 || rng.bernoulli((-delta / temperature).exp()) {
                cost = candidate;
                accepted += 1;
                if cost < best.0 {
                    best = (cost, order.clone());
                }
            } else {
                order.swap(i, j);
            }
            temperature *= COOLING_RATE;
        }

        let (cost, order) = best;
        debug!(n = instance.n(), cost, accepted, "simulated annealing finished");
        Tour {
            algorithm: Algorithm::SimulatedAnnealing,
            path: anchored(&order),
            cost,
            elapsed: start.elapsed(),
        }
    }
}
