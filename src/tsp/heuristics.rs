//! Reference algorithms used as comparison baselines.
//!
//! - Brute force: exact, `(n-1)!` permutations, small `n` only.
//! - Nearest neighbor: greedy O(n²) construction.
//! - 2-opt: nearest-neighbor tour improved by segment reversals.

use std::time::{Duration, Instant};

use tracing::debug;

use super::instance::TspInstance;
use super::{Algorithm, Tour};
use crate::error::{TspError, TspResult};

/// Default ceiling on city count for brute force.
pub const DEFAULT_MAX_BRUTE_FORCE_CITIES: usize = 9;

/// Permutations between two clock reads.
const TIMEOUT_CHECK_INTERVAL: u64 = 1024;

/// Improvement passes allowed before 2-opt stops.
const MAX_TWO_OPT_PASSES: usize = 100;

/// Exhaustive permutation search with a city ceiling and optional budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BruteForce {
    max_cities: usize,
    budget: Option<Duration>,
}

impl Default for BruteForce {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BRUTE_FORCE_CITIES, None)
    }
}

impl BruteForce {
    /// Brute force refusing more than `max_cities` cities and aborting after
    /// `budget` if one is given.
    #[must_use]
    pub const fn new(max_cities: usize, budget: Option<Duration>) -> Self {
        Self { max_cities, budget }
    }

    /// Enumerate every tour anchored at city 0 and return the cheapest.
    ///
    /// Permutations of `{1..n-1}` are visited in lexicographic order and only
    /// a strictly cheaper tour replaces the incumbent, so the result is the
    /// lexicographically smallest optimal tour.
    ///
    /// # Errors
    ///
    /// `ResourceLimitExceeded` before any work when `n` is above the ceiling;
    /// `TimeoutExceeded` when the budget runs out (partial results are
    /// discarded).
    pub fn solve(&self, instance: &TspInstance) -> TspResult<Tour> {
        let n = instance.n();
        if n > self.max_cities {
            return Err(TspError::ResourceLimitExceeded {
                algorithm: Algorithm::BruteForce.name(),
                n,
                limit: self.max_cities,
            });
        }

        let start = Instant::now();
        let mut order: Vec<usize> = (1..n).collect();
        let mut best_order = order.clone();
        let mut best_cost = cycle_cost(instance, &order);
        let mut visited = 1u64;

        while next_permutation(&mut order) {
            visited += 1;
            if visited % TIMEOUT_CHECK_INTERVAL == 0 {
                self.check_budget(start)?;
            }
            let cost = cycle_cost(instance, &order);
            if cost < best_cost {
                best_cost = cost;
                best_order.clone_from(&order);
            }
        }

        let elapsed = start.elapsed();
        debug!(n, cost = best_cost, permutations = visited, ?elapsed, "brute force finished");
        Ok(Tour {
            algorithm: Algorithm::BruteForce,
            path: anchored(&best_order),
            cost: best_cost,
            elapsed,
        })
    }

    fn check_budget(&self, start: Instant) -> TspResult<()> {
        if let Some(budget) = self.budget {
            let elapsed = start.elapsed();
            if elapsed > budget {
                return Err(TspError::TimeoutExceeded {
                    algorithm: Algorithm::BruteForce.name(),
                    budget,
                    elapsed,
                });
            }
        }
        Ok(())
    }
}

/// Brute force with the default ceiling and no budget.
///
/// # Errors
///
/// See [`BruteForce::solve`].
pub fn brute_force(instance: &TspInstance) -> TspResult<Tour> {
    BruteForce::default().solve(instance)
}

/// Greedy tour: from city 0 always move to the nearest unvisited city.
///
/// Ties go to the smaller city index.
#[must_use]
pub fn nearest_neighbor(instance: &TspInstance) -> Tour {
    let start = Instant::now();
    let order = nearest_neighbor_order(instance);
    let cost = cycle_cost(instance, &order);
    Tour {
        algorithm: Algorithm::NearestNeighbor,
        path: anchored(&order),
        cost,
        elapsed: start.elapsed(),
    }
}

/// Nearest-neighbor tour improved by 2-opt segment reversals until no move
/// helps (at most 100 passes).
#[must_use]
pub fn two_opt(instance: &TspInstance) -> Tour {
    let start = Instant::now();
    let n = instance.n();
    let mut tour = vec![0];
    tour.extend(nearest_neighbor_order(instance));

    let mut passes = 0;
    let mut improved = true;
    while improved && passes < MAX_TWO_OPT_PASSES {
        improved = false;
        passes += 1;
        for i in 0..n - 1 {
            for j in i + 2..n {
                // Edges (i, i+1) and (j, j+1) share a city when they wrap.
                if i == 0 && j == n - 1 {
                    continue;
                }
                let a = tour[i];
                let b = tour[i + 1];
                let c = tour[j];
                let d = tour[(j + 1) % n];
                let current = instance.cost(a, b) + instance.cost(c, d);
                let swapped = instance.cost(a, c) + instance.cost(b, d);
                if swapped < current {
                    tour[i + 1..=j].reverse();
                    improved = true;
                }
            }
        }
    }

    let order = &tour[1..];
    let cost = cycle_cost(instance, order);
    debug!(n, cost, passes, "2-opt finished");
    Tour {
        algorithm: Algorithm::TwoOpt,
        path: anchored(order),
        cost,
        elapsed: start.elapsed(),
    }
}

/// Visiting order of cities `1..n` chosen greedily from city 0.
pub(super) fn nearest_neighbor_order(instance: &TspInstance) -> Vec<usize> {
    let n = instance.n();
    let mut visited = vec![false; n];
    visited[0] = true;
    let mut order = Vec::with_capacity(n - 1);
    let mut current = 0;

    while order.len() < n - 1 {
        let mut best_next = None;
        let mut best_dist = u64::MAX;
        for (city, seen) in visited.iter().enumerate() {
            if !seen && instance.cost(current, city) < best_dist {
                best_dist = instance.cost(current, city);
                best_next = Some(city);
            }
        }
        let Some(next) = best_next else {
            break;
        };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Cost of `0 → order[0] → … → order[last] → 0`.
pub(super) fn cycle_cost(instance: &TspInstance, order: &[usize]) -> u64 {
    let mut total = 0u64;
    let mut current = 0;
    for &city in order {
        total = total.saturating_add(instance.cost(current, city));
        current = city;
    }
    total.saturating_add(instance.cost(current, 0))
}

/// `[0, order…, 0]`.
pub(super) fn anchored(order: &[usize]) -> Vec<usize> {
    let mut path = Vec::with_capacity(order.len() + 2);
    path.push(0);
    path.extend_from_slice(order);
    path.push(0);
    path
}

/// Advance `items` to the next lexicographic permutation.
///
/// Returns `false` (leaving `items` untouched) when it is already the last one.
fn next_permutation(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }
    let mut i = items.len() - 1;
    while i > 0 && items[i - 1] >= items[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = items.len() - 1;
    while items[j] <= items[i - 1] {
        j -= 1;
    }
    items.swap(i - 1, j);
    items[i..].reverse();
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::rng::SolverRng;
    use crate::tsp::instance::validate;

    fn four_city() -> TspInstance {
        validate(&[
            vec![0, 10, 15, 20],
            vec![10, 0, 35, 25],
            vec![15, 35, 0, 30],
            vec![20, 25, 30, 0],
        ])
        .expect("valid")
    }

    #[test]
    fn test_next_permutation_enumerates_factorial() {
        let mut items = vec![1, 2, 3, 4];
        let mut count = 1;
        while next_permutation(&mut items) {
            count += 1;
        }
        assert_eq!(count, 24);
        assert_eq!(items, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_brute_force_four_city() {
        let instance = four_city();
        let tour = brute_force(&instance).expect("solve");
        assert_eq!(tour.cost, 80);
        // 0→1→3→2→0 comes before its reverse 0→2→3→1→0.
        assert_eq!(tour.path, vec![0, 1, 3, 2, 0]);
        assert_eq!(instance.path_cost(&tour.path), 80);
    }

    #[test]
    fn test_brute_force_limit() {
        let instance = TspInstance::random(10, 20, &mut SolverRng::new(3));
        let err = brute_force(&instance).expect_err("too large");
        assert!(matches!(
            err,
            TspError::ResourceLimitExceeded { n: 10, limit: 9, .. }
        ));
    }

    #[test]
    fn test_brute_force_timeout() {
        let instance = TspInstance::random(11, 20, &mut SolverRng::new(3));
        let solver = BruteForce::new(12, Some(Duration::ZERO));
        let err = solver.solve(&instance).expect_err("zero budget");
        assert!(matches!(err, TspError::TimeoutExceeded { .. }));
    }

    #[test]
    fn test_nearest_neighbor_is_greedy() {
        let instance = four_city();
        let tour = nearest_neighbor(&instance);
        // 0 →(10) 1 →(25) 3 →(30) 2 →(15) 0
        assert_eq!(tour.path, vec![0, 1, 3, 2, 0]);
        assert_eq!(tour.cost, 80);
        assert!(instance.is_tour(&tour.path));
    }

    #[test]
    fn test_two_opt_never_worse_than_nearest_neighbor() {
        for seed in 0..20 {
            let instance = TspInstance::random(9, 100, &mut SolverRng::new(seed));
            let nn = nearest_neighbor(&instance);
            let opt = two_opt(&instance);
            assert!(instance.is_tour(&opt.path));
            assert_eq!(instance.path_cost(&opt.path), opt.cost);
            assert!(opt.cost <= nn.cost, "seed {seed}: {} > {}", opt.cost, nn.cost);
        }
    }

    #[test]
    fn test_heuristics_bounded_by_optimum() {
        for seed in 0..10 {
            let instance = TspInstance::random(7, 50, &mut SolverRng::new(seed));
            let exact = brute_force(&instance).expect("solve");
            assert!(nearest_neighbor(&instance).cost >= exact.cost);
            assert!(two_opt(&instance).cost >= exact.cost);
        }
    }
}
