//! Cost matrix validation and the immutable `TspInstance`.

use serde::Serialize;

use crate::engine::rng::SolverRng;
use crate::error::ValidationError;

/// Validated TSP instance: square, symmetric, zero-diagonal, non-negative.
///
/// Cannot be constructed except through [`validate`] (or the random
/// generator, which produces valid matrices by construction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TspInstance {
    n: usize,
    cost: Vec<Vec<u64>>,
}

/// Validate a raw cost matrix and build an instance.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, checking in this order:
/// city count, squareness, diagonal, sign, symmetry.
pub fn validate(matrix: &[Vec<i64>]) -> Result<TspInstance, ValidationError> {
    let n = matrix.len();
    if n < 3 {
        return Err(ValidationError::TooFewCities { n });
    }

    for (row, cols) in matrix.iter().enumerate() {
        if cols.len() != n {
            return Err(ValidationError::NotSquare {
                row,
                expected: n,
                got: cols.len(),
            });
        }
    }

    for (i, row) in matrix.iter().enumerate() {
        if row[i] != 0 {
            return Err(ValidationError::NonZeroDiagonal { i, value: row[i] });
        }
    }

    for (i, row) in matrix.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            if value < 0 {
                return Err(ValidationError::NegativeWeight { i, j, value });
            }
        }
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let forward = matrix[i][j];
            let backward = matrix[j][i];
            if forward != backward {
                return Err(ValidationError::Asymmetric {
                    i,
                    j,
                    forward,
                    backward,
                });
            }
        }
    }

    let cost = matrix
        .iter()
        .map(|row| row.iter().map(|&v| v.unsigned_abs()).collect())
        .collect();

    Ok(TspInstance { n, cost })
}

impl TspInstance {
    /// Number of cities.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.n
    }

    /// Edge weight between two cities.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> u64 {
        self.cost[from][to]
    }

    /// Full cost matrix.
    #[must_use]
    pub fn matrix(&self) -> &[Vec<u64>] {
        &self.cost
    }

    /// Largest edge weight, the `c` of the quantum complexity label.
    #[must_use]
    pub fn max_edge_weight(&self) -> u64 {
        self.cost
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Total weight of a closed path (`path` lists consecutive cities,
    /// typically starting and ending at 0).
    #[must_use]
    pub fn path_cost(&self, path: &[usize]) -> u64 {
        path.windows(2)
            .map(|w| self.cost[w[0]][w[1]])
            .fold(0u64, u64::saturating_add)
    }

    /// Whether `path` is a Hamiltonian cycle anchored at city 0.
    #[must_use]
    pub fn is_tour(&self, path: &[usize]) -> bool {
        if path.len() != self.n + 1 || path.first() != Some(&0) || path.last() != Some(&0) {
            return false;
        }
        let mut seen = vec![false; self.n];
        for &city in &path[..self.n] {
            if city >= self.n || seen[city] {
                return false;
            }
            seen[city] = true;
        }
        true
    }

    /// Random symmetric instance with weights in `[1, max_weight]`.
    ///
    /// `n` is raised to 3 if smaller.
    #[must_use]
    pub fn random(n: usize, max_weight: u64, rng: &mut SolverRng) -> Self {
        let n = n.max(3);
        let max_weight = max_weight.max(1);
        let mut cost = vec![vec![0u64; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let w = rng.gen_range_inclusive(1, max_weight);
                cost[i][j] = w;
                cost[j][i] = w;
            }
        }
        Self { n, cost }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn four_city() -> Vec<Vec<i64>> {
        vec![
            vec![0, 10, 15, 20],
            vec![10, 0, 35, 25],
            vec![15, 35, 0, 30],
            vec![20, 25, 30, 0],
        ]
    }

    #[test]
    fn test_validate_accepts_valid_matrix() {
        let instance = validate(&four_city()).expect("valid");
        assert_eq!(instance.n(), 4);
        assert_eq!(instance.cost(1, 3), 25);
        assert_eq!(instance.max_edge_weight(), 35);
    }

    #[test]
    fn test_validate_too_few_cities() {
        let m = vec![vec![0, 1], vec![1, 0]];
        assert_eq!(validate(&m), Err(ValidationError::TooFewCities { n: 2 }));
        assert_eq!(validate(&[]), Err(ValidationError::TooFewCities { n: 0 }));
    }

    #[test]
    fn test_validate_not_square() {
        let mut m = four_city();
        m[2].pop();
        assert_eq!(
            validate(&m),
            Err(ValidationError::NotSquare {
                row: 2,
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn test_validate_nonzero_diagonal() {
        let mut m = four_city();
        m[3][3] = 1;
        assert_eq!(
            validate(&m),
            Err(ValidationError::NonZeroDiagonal { i: 3, value: 1 })
        );
    }

    #[test]
    fn test_validate_negative_weight() {
        let mut m = four_city();
        m[0][1] = -10;
        m[1][0] = -10;
        assert_eq!(
            validate(&m),
            Err(ValidationError::NegativeWeight {
                i: 0,
                j: 1,
                value: -10
            })
        );
    }

    #[test]
    fn test_validate_asymmetric() {
        let mut m = four_city();
        m[2][1] = 36;
        assert_eq!(
            validate(&m),
            Err(ValidationError::Asymmetric {
                i: 1,
                j: 2,
                forward: 35,
                backward: 36
            })
        );
    }

    #[test]
    fn test_path_cost_and_tour_check() {
        let instance = validate(&four_city()).expect("valid");
        let path = [0, 1, 3, 2, 0];
        assert_eq!(instance.path_cost(&path), 80);
        assert!(instance.is_tour(&path));
        assert!(!instance.is_tour(&[0, 1, 1, 2, 0]));
        assert!(!instance.is_tour(&[1, 0, 3, 2, 1]));
        assert!(!instance.is_tour(&[0, 1, 2, 0]));
    }

    #[test]
    fn test_random_is_valid_and_reproducible() {
        let a = TspInstance::random(7, 50, &mut SolverRng::new(9));
        let b = TspInstance::random(7, 50, &mut SolverRng::new(9));
        assert_eq!(a, b);

        let raw: Vec<Vec<i64>> = a
            .matrix()
            .iter()
            .map(|row| row.iter().map(|&v| v as i64).collect())
            .collect();
        assert_eq!(validate(&raw), Ok(a.clone()));
        assert!(a.max_edge_weight() <= 50);
    }
}
