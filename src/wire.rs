//! JSON request and response bodies shared by the HTTP API and `--json`
//! CLI output, plus the request handlers that drive the [`Engine`].
//!
//! Handlers here are synchronous and CPU-bound; the HTTP layer moves them
//! off the async runtime.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::compare::{AlgorithmMetric, ComparisonReport};
use crate::dataset::{DatasetReport, DatasetRow};
use crate::engine::Engine;
use crate::error::{TspError, TspResult, ValidationError};
use crate::tsp::{validate, Algorithm, AmplificationSummary, SolveResult};

/// Threshold from a request, falling back to `default`.
///
/// # Errors
///
/// `InvalidThreshold` for values below 1.
pub fn resolve_threshold(requested: Option<i64>, default: usize) -> Result<usize, ValidationError> {
    match requested {
        None => Ok(default),
        Some(threshold) if threshold < 1 => Err(ValidationError::InvalidThreshold { threshold }),
        Some(threshold) => {
            usize::try_from(threshold).map_err(|_| ValidationError::InvalidThreshold { threshold })
        }
    }
}

/// Algorithm set from a list of names; absent or empty means all of them.
///
/// # Errors
///
/// `UnknownAlgorithm` for an unrecognised name.
pub fn parse_algorithms(names: Option<&[String]>) -> TspResult<BTreeSet<Algorithm>> {
    match names {
        Some(names) if !names.is_empty() => names.iter().map(|n| n.parse()).collect(),
        _ => Ok(Algorithm::ALL.into_iter().collect()),
    }
}

fn default_algorithm() -> String {
    "quantum".to_string()
}

/// `POST /api/solve` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Square symmetric cost matrix.
    pub cost_matrix: Vec<Vec<i64>>,
    /// Amplification threshold; engine default when absent.
    #[serde(default)]
    pub quantum_threshold: Option<i64>,
    /// `quantum` or `classical`.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

/// One DP solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    /// Solver id.
    pub algorithm: Algorithm,
    /// Cycle starting and ending at city 0.
    pub path: Vec<usize>,
    /// Cycle cost.
    pub cost: u64,
    /// DP states computed.
    pub dp_states: u64,
    /// Simulated oracle queries.
    pub quantum_calls: u64,
    /// Linear-scan comparisons.
    pub classical_calls: u64,
    /// Seconds.
    pub time: f64,
    /// Amplification quality metrics.
    #[serde(skip_deserializing)]
    pub amplification: AmplificationSummary,
}

impl From<&SolveResult> for SolveResponse {
    fn from(result: &SolveResult) -> Self {
        Self {
            algorithm: result.algorithm,
            path: result.path.clone(),
            cost: result.cost,
            dp_states: result.dp_states_explored,
            quantum_calls: result.quantum_calls,
            classical_calls: result.classical_calls,
            time: result.elapsed.as_secs_f64(),
            amplification: result.amplification.clone(),
        }
    }
}

/// `POST /api/compare` and `POST /api/compare-all` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareRequest {
    /// Square symmetric cost matrix.
    pub cost_matrix: Vec<Vec<i64>>,
    /// Amplification threshold; engine default when absent.
    #[serde(default)]
    pub quantum_threshold: Option<i64>,
    /// Algorithm ids to run (compare-all only); all when absent.
    #[serde(default)]
    pub algorithms: Option<Vec<String>>,
}

/// Classical against quantum DP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCompareResponse {
    /// Classical DP result.
    pub classical: SolveResponse,
    /// Quantum DP result.
    pub quantum: SolveResponse,
    /// `2ⁿ / 2^(n/2)`.
    pub speedup: f64,
    /// Measured classical time over quantum time.
    pub measured_speedup: Option<f64>,
    /// Classical comparisons over oracle queries.
    pub call_speedup: Option<f64>,
    /// Whether any step was amplified.
    pub quantum_advantage: bool,
}

/// One row of a compare-all response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResponse {
    /// Display name.
    pub name: String,
    /// Algorithm id.
    pub algorithm: Algorithm,
    /// One-line description.
    pub description: String,
    /// Tour cost.
    pub cost: Option<u64>,
    /// Seconds.
    pub time: Option<f64>,
    /// Complexity label.
    pub complexity: String,
    /// Tour found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<usize>>,
    /// DP solvers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum_calls: Option<u64>,
    /// DP solvers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classical_calls: Option<u64>,
    /// Whether the algorithm did not run.
    pub skipped: bool,
    /// Why it did not run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&AlgorithmMetric> for MetricResponse {
    fn from(metric: &AlgorithmMetric) -> Self {
        Self {
            name: metric.name().to_string(),
            algorithm: metric.algorithm,
            description: metric.description().to_string(),
            cost: metric.cost,
            time: metric.elapsed.map(|d| d.as_secs_f64()),
            complexity: metric.complexity().to_string(),
            path: metric.path.clone(),
            quantum_calls: metric.quantum_calls,
            classical_calls: metric.classical_calls,
            skipped: metric.is_skipped(),
            reason: metric.skip_reason.clone(),
        }
    }
}

/// Every requested algorithm side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareAllResponse {
    /// Rows in canonical order.
    pub algorithms: Vec<MetricResponse>,
    /// Classical DP time over quantum DP time.
    pub speedup: Option<f64>,
    /// Classical DP comparisons over quantum DP oracle queries.
    pub call_speedup: Option<f64>,
    /// `2ⁿ / 2^(n/2)`.
    pub theoretical_speedup: f64,
    /// Cheapest tour found.
    pub best_cost: Option<u64>,
    /// Display name of the first algorithm reaching `best_cost`.
    pub best_algorithm: Option<String>,
}

impl From<&ComparisonReport> for CompareAllResponse {
    fn from(report: &ComparisonReport) -> Self {
        Self {
            algorithms: report.metrics.iter().map(MetricResponse::from).collect(),
            speedup: report.speedup,
            call_speedup: report.call_speedup,
            theoretical_speedup: report.theoretical_speedup,
            best_cost: report.best_cost,
            best_algorithm: report.best_algorithm.map(|a| a.label().to_string()),
        }
    }
}

/// `POST /api/dataset/evaluate` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRequest {
    /// Rows to evaluate.
    pub rows: Vec<DatasetRow>,
    /// Amplification threshold; engine default when absent.
    #[serde(default)]
    pub quantum_threshold: Option<i64>,
}

/// Error body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Stable machine-readable category.
    pub kind: String,
}

impl From<&TspError> for ErrorResponse {
    fn from(error: &TspError) -> Self {
        Self {
            error: error.to_string(),
            kind: error.kind().to_string(),
        }
    }
}

/// Handle a single solve.
///
/// # Errors
///
/// Validation, unknown algorithm, or resource limit.
pub fn solve(engine: &Engine, request: &SolveRequest) -> TspResult<SolveResponse> {
    let instance = validate(&request.cost_matrix)?;
    let threshold = resolve_threshold(request.quantum_threshold, engine.default_threshold())?;
    let algorithm: Algorithm = request.algorithm.parse()?;
    let result = engine.solve(&instance, algorithm, threshold)?;
    Ok(SolveResponse::from(&result))
}

/// Handle a classical-against-quantum comparison. Both solves are fatal on
/// failure.
///
/// # Errors
///
/// Validation or resource limit.
pub fn compare_pair(engine: &Engine, request: &CompareRequest) -> TspResult<PairCompareResponse> {
    let instance = validate(&request.cost_matrix)?;
    let threshold = resolve_threshold(request.quantum_threshold, engine.default_threshold())?;
    let classical = engine.solve(&instance, Algorithm::ClassicalDp, threshold)?;
    let quantum = engine.solve(&instance, Algorithm::QuantumDp, threshold)?;

    let q_secs = quantum.elapsed.as_secs_f64();
    Ok(PairCompareResponse {
        speedup: crate::compare::theoretical_speedup(instance.n()),
        measured_speedup: (q_secs > 0.0).then(|| classical.elapsed.as_secs_f64() / q_secs),
        call_speedup: (quantum.quantum_calls > 0)
            .then(|| classical.classical_calls as f64 / quantum.quantum_calls as f64),
        quantum_advantage: quantum.quantum_calls > 0,
        classical: SolveResponse::from(&classical),
        quantum: SolveResponse::from(&quantum),
    })
}

/// Handle a multi-algorithm comparison.
///
/// # Errors
///
/// Validation or unknown algorithm; individual solver failures are skipped
/// rows instead.
pub fn compare_all(engine: &Engine, request: &CompareRequest) -> TspResult<CompareAllResponse> {
    let instance = validate(&request.cost_matrix)?;
    let threshold = resolve_threshold(request.quantum_threshold, engine.default_threshold())?;
    let algorithms = parse_algorithms(request.algorithms.as_deref())?;
    let report = engine.compare(&instance, threshold, &algorithms)?;
    Ok(CompareAllResponse::from(&report))
}

/// Handle a dataset evaluation.
///
/// # Errors
///
/// See [`Engine::evaluate_dataset`].
pub fn evaluate_dataset(engine: &Engine, request: &DatasetRequest) -> TspResult<DatasetReport> {
    let threshold = resolve_threshold(request.quantum_threshold, engine.default_threshold())?;
    engine.evaluate_dataset(&request.rows, threshold)
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
    fn test_resolve_threshold() {
        assert_eq!(resolve_threshold(None, 3), Ok(3));
        assert_eq!(resolve_threshold(Some(1), 3), Ok(1));
        assert_eq!(
            resolve_threshold(Some(0), 3),
            Err(ValidationError::InvalidThreshold { threshold: 0 })
        );
        assert_eq!(
            resolve_threshold(Some(-4), 3),
            Err(ValidationError::InvalidThreshold { threshold: -4 })
        );
    }

    #[test]
    fn test_parse_algorithms() {
        assert_eq!(parse_algorithms(None).expect("all").len(), Algorithm::ALL.len());
        assert_eq!(parse_algorithms(Some(&[])).expect("all").len(), Algorithm::ALL.len());
        let names = vec!["two_opt".to_string(), "classical".to_string()];
        let set = parse_algorithms(Some(&names)).expect("parse");
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec![Algorithm::ClassicalDp, Algorithm::TwoOpt]
        );
        let bad = vec!["annealing".to_string()];
        assert!(matches!(
            parse_algorithms(Some(&bad)),
            Err(TspError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_solve_request_defaults() {
        let request: SolveRequest =
            serde_json::from_str(r#"{"cost_matrix":[[0,1,2],[1,0,3],[2,3,0]]}"#).expect("parse");
        assert_eq!(request.algorithm, "quantum");
        assert_eq!(request.quantum_threshold, None);
        let response = solve(&Engine::default(), &request).expect("solve");
        assert_eq!(response.cost, 6);
        assert_eq!(response.algorithm, Algorithm::QuantumDp);
    }

    #[test]
    fn test_solve_response_fields() {
        let request = SolveRequest {
            cost_matrix: four_city(),
            quantum_threshold: Some(2),
            algorithm: "classical".to_string(),
        };
        let response = solve(&Engine::default(), &request).expect("solve");
        assert_eq!(response.cost, 80);
        assert_eq!(response.dp_states, 12);
        assert_eq!(response.quantum_calls, 0);
        let json = serde_json::to_value(&response).expect("json");
        for key in ["path", "cost", "dp_states", "quantum_calls", "classical_calls", "time"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_compare_pair() {
        let request = CompareRequest {
            cost_matrix: four_city(),
            quantum_threshold: Some(1),
            algorithms: None,
        };
        let engine = Engine::default();
        let response = compare_pair(&engine, &request).expect("compare");
        assert_eq!(response.classical.cost, response.quantum.cost);
        assert_eq!(response.classical.path, response.quantum.path);
        assert!(response.quantum_advantage);
        assert_eq!(response.speedup, 4.0);
        assert_eq!(engine.statistics().total_runs, 2);
    }

    #[test]
    fn test_compare_all_shape() {
        let request = CompareRequest {
            cost_matrix: four_city(),
            quantum_threshold: None,
            algorithms: None,
        };
        let response = compare_all(&Engine::default(), &request).expect("compare");
        assert_eq!(response.algorithms.len(), Algorithm::ALL.len());
        assert_eq!(response.algorithms[0].name, "Quantum DP (Grover)");
        assert_eq!(response.best_cost, Some(80));
        assert_eq!(response.best_algorithm.as_deref(), Some("Quantum DP (Grover)"));
        let nn = serde_json::to_value(&response.algorithms[3]).expect("json");
        assert!(nn.get("quantum_calls").is_none());
        assert!(nn.get("reason").is_none());
        assert_eq!(nn["skipped"], serde_json::Value::Bool(false));
    }

    #[test]
    fn test_invalid_matrix_rejected_before_solving() {
        let request = SolveRequest {
            cost_matrix: vec![vec![0, 1], vec![1, 0]],
            quantum_threshold: None,
            algorithm: "quantum".to_string(),
        };
        let engine = Engine::default();
        let err = solve(&engine, &request).expect_err("too few cities");
        assert_eq!(ErrorResponse::from(&err).kind, "validation");
        assert_eq!(engine.statistics().total_runs, 0);
    }
}
