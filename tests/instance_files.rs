//! The instance files shipped in `instances/` load, validate, and solve to
//! their recorded optimum.

use std::collections::BTreeSet;

use qtsp::config::EngineConfig;
use qtsp::engine::Engine;
use qtsp::tsp::{Algorithm, TspInstanceYaml};

const FOUR_CITY: &str = include_str!("../instances/four_city.yaml");
const BAY_AREA: &str = include_str!("../instances/bay_area.yaml");
const ENGINE_CONFIG: &str = include_str!("../instances/engine.yaml");

#[test]
fn shipped_instances_reach_known_optimum() {
    let engine = Engine::default();
    for yaml in [FOUR_CITY, BAY_AREA] {
        let file = TspInstanceYaml::from_yaml(yaml).expect("parse");
        let instance = file.to_instance().expect("valid");
        let known = file.meta.optimal_known.expect("optimum recorded");
        let report = engine.evaluate(&instance).expect("evaluate");
        for metric in &report.metrics {
            if let Some(cost) = metric.cost {
                assert!(cost >= known, "{}: {} beat the optimum", file.meta.id, metric.name());
            }
        }
        for algorithm in [Algorithm::QuantumDp, Algorithm::ClassicalDp, Algorithm::BruteForce] {
            let metric = report.metric(algorithm).expect("row");
            assert_eq!(metric.cost, Some(known), "{} {}", file.meta.id, algorithm);
        }
    }
}

#[test]
fn bay_area_tour_reads_with_city_names() {
    let file = TspInstanceYaml::from_yaml(BAY_AREA).expect("parse");
    let instance = file.to_instance().expect("valid");
    let engine = Engine::default();
    let only_dp: BTreeSet<_> = [Algorithm::ClassicalDp].into_iter().collect();
    let report = engine.compare(&instance, 3, &only_dp).expect("compare");
    let path = report.metrics[0].path.as_ref().expect("path");
    let described = file.describe_path(path);
    assert!(described.starts_with("San Francisco → "));
    assert!(described.ends_with(" → San Francisco"));
    assert_eq!(described.matches(" → ").count(), 6);
}

#[test]
fn shipped_engine_config_equals_defaults() {
    let config = EngineConfig::from_yaml(ENGINE_CONFIG).expect("config");
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn edited_instance_is_revalidated() {
    let mut file = TspInstanceYaml::from_yaml(FOUR_CITY).expect("parse");
    file.matrix[1][2] = 36;
    assert!(file.to_instance().is_err());
    file.matrix[2][1] = 36;
    assert!(file.to_instance().is_ok());
}
