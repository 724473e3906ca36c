//! Exactness and query-count properties of the DP solvers.

use proptest::prelude::*;
use qtsp::engine::SolverRng;
use qtsp::tsp::{
    brute_force, held_karp_state_count, solve_classical, solve_quantum, validate, HeldKarpSolver,
    NoiseModel, TspInstance,
};

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
fn four_city_scenario() {
    let instance = four_city();
    let classical = solve_classical(&instance).expect("classical");
    let quantum = solve_quantum(&instance, 2).expect("quantum");
    let brute = brute_force(&instance).expect("brute force");
    assert_eq!(classical.cost, 80);
    assert_eq!(quantum.cost, 80);
    assert_eq!(brute.cost, 80);
    assert_eq!(instance.path_cost(&classical.path), 80);
}

#[test]
fn state_count_matches_formula() {
    for n in 3..=10 {
        let instance = TspInstance::random(n, 50, &mut SolverRng::stream(7, n as u64));
        let result = solve_classical(&instance).expect("solve");
        let expected = (n as u64 - 1) * (1 << (n - 2));
        assert_eq!(result.dp_states_explored, expected, "n = {n}");
        assert_eq!(held_karp_state_count(n), expected);
    }
}

#[test]
fn amplified_share_of_calls_shrinks_with_n() {
    let threshold = 2;
    let mut previous = f64::INFINITY;
    for n in threshold + 1..=threshold + 6 {
        let instance = TspInstance::random(n, 100, &mut SolverRng::stream(11, n as u64));
        let classical = solve_classical(&instance).expect("classical");
        let quantum = solve_quantum(&instance, threshold).expect("quantum");
        let ratio = (quantum.quantum_calls + quantum.classical_calls) as f64
            / classical.classical_calls as f64;
        assert!(ratio < previous, "n = {n}: {ratio} >= {previous}");
        previous = ratio;
    }
}

#[test]
fn threshold_one_amplifies_every_multi_candidate_step() {
    let n = 6;
    let m = (n - 1) as u64;
    let instance = TspInstance::random(n, 100, &mut SolverRng::new(2024));
    let quantum = solve_quantum(&instance, 1).expect("quantum");

    // Only single-candidate steps scan: the m base states and both
    // orderings of every two-city subset.
    let single_candidate_steps = m + m * (m - 1);
    assert_eq!(quantum.classical_calls, single_candidate_steps);
    assert_eq!(quantum.quantum_calls, 112);
    assert_eq!(quantum.amplification.fallbacks, 0);
}

#[test]
fn noisy_amplification_keeps_the_optimum() {
    let solver = HeldKarpSolver::default();
    for seed in 0..5 {
        let instance = TspInstance::random(8, 100, &mut SolverRng::new(seed));
        let classical = solver.solve_classical(&instance).expect("classical");
        let noisy = solver
            .solve_quantum(
                &instance,
                1,
                Some(NoiseModel {
                    seed,
                    max_retries: 0,
                }),
            )
            .expect("noisy");
        assert_eq!(noisy.cost, classical.cost);
        assert_eq!(noisy.path, classical.path);
    }
}

fn symmetric_matrix(max_n: usize) -> impl Strategy<Value = Vec<Vec<i64>>> {
    (3..=max_n).prop_flat_map(|n| {
        prop::collection::vec(0i64..1000, n * (n - 1) / 2).prop_map(move |upper| {
            let mut matrix = vec![vec![0i64; n]; n];
            let mut k = 0;
            for i in 0..n {
                for j in i + 1..n {
                    matrix[i][j] = upper[k];
                    matrix[j][i] = upper[k];
                    k += 1;
                }
            }
            matrix
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn dp_matches_brute_force(matrix in symmetric_matrix(8)) {
        let instance = validate(&matrix).expect("symmetric matrix is valid");
        let dp = solve_classical(&instance).expect("dp");
        let exhaustive = brute_force(&instance).expect("brute force");
        prop_assert_eq!(dp.cost, exhaustive.cost);
        prop_assert!(instance.is_tour(&dp.path));
        prop_assert_eq!(instance.path_cost(&dp.path), dp.cost);
    }

    #[test]
    fn quantum_matches_classical(matrix in symmetric_matrix(9), threshold in 1usize..6) {
        let instance = validate(&matrix).expect("symmetric matrix is valid");
        let classical = solve_classical(&instance).expect("classical");
        let quantum = solve_quantum(&instance, threshold).expect("quantum");
        prop_assert_eq!(quantum.cost, classical.cost);
        prop_assert_eq!(&quantum.path, &classical.path);
        prop_assert_eq!(quantum.dp_states_explored, classical.dp_states_explored);
        prop_assert_eq!(classical.quantum_calls, 0);
    }
}
