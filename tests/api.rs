//! HTTP API tests driven through the router without a socket.

#![cfg(feature = "web")]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use qtsp::api::build_router;
use qtsp::config::EngineConfig;
use qtsp::engine::Engine;
use serde_json::{json, Value};
use tower::ServiceExt;

const BODY_LIMIT: usize = 1 << 20;

fn four_city() -> Value {
    json!([[0, 10, 15, 20], [10, 0, 35, 25], [15, 35, 0, 30], [20, 25, 30, 0]])
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_and_index() {
    let app = build_router(Engine::default());
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"]
        .as_array()
        .expect("endpoints")
        .contains(&json!("/api/compare-all")));
}

#[tokio::test]
async fn solve_defaults_to_quantum() {
    let app = build_router(Engine::default());
    let (status, body) = call(&app, "POST", "/api/solve", Some(json!({"cost_matrix": four_city()}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost"], 80);
    assert_eq!(body["algorithm"], "quantum_dp");
    assert_eq!(body["dp_states"], 12);
    assert_eq!(body["path"][0], 0);
    assert!(body["time"].is_number());
}

#[tokio::test]
async fn solve_classical_reports_no_oracle_calls() {
    let app = build_router(Engine::default());
    let request = json!({"cost_matrix": four_city(), "algorithm": "classical"});
    let (status, body) = call(&app, "POST", "/api/solve", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantum_calls"], 0);
    assert_eq!(body["classical_calls"], 18);
}

#[tokio::test]
async fn invalid_matrix_is_bad_request() {
    let app = build_router(Engine::default());
    let request = json!({"cost_matrix": [[0, 1, 2], [5, 0, 3], [2, 3, 0]]});
    let (status, body) = call(&app, "POST", "/api/solve", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
    assert!(body["error"].as_str().expect("message").contains("asymmetric"));
}

#[tokio::test]
async fn zero_threshold_is_bad_request() {
    let app = build_router(Engine::default());
    let request = json!({"cost_matrix": four_city(), "quantum_threshold": 0});
    let (status, _) = call(&app, "POST", "/api/compare-all", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_instance_is_unprocessable() {
    let config = EngineConfig::builder()
        .max_dp_cities(4)
        .max_brute_force_cities(4)
        .build()
        .expect("config");
    let app = build_router(Engine::new(config));
    let five = json!([
        [0, 1, 2, 3, 4],
        [1, 0, 5, 6, 7],
        [2, 5, 0, 8, 9],
        [3, 6, 8, 0, 1],
        [4, 7, 9, 1, 0]
    ]);
    let (status, body) = call(&app, "POST", "/api/solve", Some(json!({"cost_matrix": five}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "resource_limit_exceeded");
}

#[tokio::test]
async fn compare_pair() {
    let app = build_router(Engine::default());
    let request = json!({"cost_matrix": four_city(), "quantum_threshold": 1});
    let (status, body) = call(&app, "POST", "/api/compare", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classical"]["cost"], body["quantum"]["cost"]);
    assert_eq!(body["quantum_advantage"], true);
    assert_eq!(body["speedup"], 4.0);
}

#[tokio::test]
async fn compare_all_skips_and_ranks() {
    let app = build_router(Engine::default());
    let request = json!({
        "cost_matrix": four_city(),
        "algorithms": ["nearest_neighbor", "classical_dp", "quantum_dp"]
    });
    let (status, body) = call(&app, "POST", "/api/compare-all", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["algorithms"].as_array().expect("rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["name"], "Quantum DP (Grover)");
    assert_eq!(rows[2]["name"], "Nearest Neighbor");
    assert_eq!(body["best_cost"], 80);
    assert_eq!(body["best_algorithm"], "Quantum DP (Grover)");
    assert_eq!(body["theoretical_speedup"], 4.0);
}

#[tokio::test]
async fn unknown_algorithm_is_bad_request() {
    let app = build_router(Engine::default());
    let request = json!({"cost_matrix": four_city(), "algorithms": ["genetic"]});
    let (status, body) = call(&app, "POST", "/api/compare-all", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn statistics_accumulate_across_requests() {
    let app = build_router(Engine::default());
    let (_, empty) = call(&app, "GET", "/api/statistics", None).await;
    assert_eq!(empty["total_runs"], 0);
    assert_eq!(empty["avg_quantum_calls"], 0.0);

    call(&app, "POST", "/api/solve", Some(json!({"cost_matrix": four_city()}))).await;
    call(&app, "POST", "/api/compare-all", Some(json!({"cost_matrix": four_city()}))).await;

    let (status, stats) = call(&app, "GET", "/api/statistics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_runs"], 3);
    assert_eq!(stats["algorithms"]["quantum_dp"], 2);
    assert_eq!(stats["algorithms"]["classical_dp"], 1);
    assert!(stats["avg_time_by_size"]["4"].is_number());
}

#[tokio::test]
async fn dataset_evaluation() {
    let app = build_router(Engine::default());
    let request = json!({
        "rows": [
            {"name": "four", "num_cities": 4, "total_distance": 80, "cost_matrix": four_city()},
            {"name": "generated", "num_cities": 6, "total_distance": 300, "best_route_category": "approx"}
        ],
        "quantum_threshold": 2
    });
    let (status, body) = call(&app, "POST", "/api/dataset/evaluate", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"][0]["best_route_category"], "optimal");
    assert_eq!(body["records"][1]["best_route_category"], "approx");
    assert_eq!(body["records"][1]["total_distance"], 300);
    assert_eq!(body["summary"]["total_instances"], 2);
    assert_eq!(body["summary"]["optimal_routes"], 1);
}

#[tokio::test]
async fn dataset_row_too_large_to_generate_is_skipped() {
    let app = build_router(Engine::default());
    let request = json!({
        "rows": [{"name": "huge", "num_cities": 1_u64 << 40}]
    });
    let (status, body) = call(&app, "POST", "/api/dataset/evaluate", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["records"][0]["total_distance"].is_null());
    assert!(body["records"][0]["quantum_time"].is_null());
    assert!(body["records"][0]["speedup"].is_null());

    let (status, _) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
