//! CLI command handlers.
//!
//! Each handler returns an `ExitCode`; errors are printed, never panicked on.

use std::path::Path;
use std::process::ExitCode;

use tracing::debug;

use crate::compare::theoretical_speedup;
use crate::config::EngineConfig;
use crate::engine::{Engine, SolverRng};
use crate::error::{TspError, TspResult};
use crate::tsp::{Algorithm, TspInstance, TspInstanceYaml};
use crate::wire::{parse_algorithms, resolve_threshold, CompareAllResponse, SolveResponse};

use super::output::{
    print_comparison, print_help, print_scaling_header, print_scaling_row, print_solve_result,
    print_version,
};
use super::{Args, Command};

/// Weight ceiling of instances generated by `scaling`.
const SCALING_MAX_WEIGHT: u64 = 100;

/// Main CLI entry point.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    let config = match load_config(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };

    let outcome = match args.command {
        Command::Solve {
            instance_path,
            algorithm,
            threshold,
            json,
        } => solve_instance(&config, &instance_path, algorithm.as_deref(), threshold, json),
        Command::Compare {
            instance_path,
            threshold,
            algorithms,
            json,
        } => compare_instance(&config, &instance_path, threshold, algorithms.as_deref(), json),
        Command::Scaling {
            threshold,
            max_cities,
            seed,
        } => scaling(&config, threshold, max_cities, seed),
        Command::Serve { addr } => serve(config, addr),
        Command::Help => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }
        Command::Version => {
            print_version();
            Ok(ExitCode::SUCCESS)
        }
    };

    outcome.unwrap_or_else(|e| fail(&e))
}

/// Engine configuration from `path`, or the defaults.
///
/// # Errors
///
/// Returns error if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&Path>) -> TspResult<EngineConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            EngineConfig::load(path)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn fail(error: &TspError) -> ExitCode {
    eprintln!("Error: {error}");
    ExitCode::from(1)
}

fn to_json<T: serde::Serialize>(value: &T) -> TspResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| TspError::serialization(e.to_string()))
}

/// Solve an instance file. Exits non-zero when the file records a known
/// optimum that the solver did not reach.
///
/// # Errors
///
/// Load, validation, or solver errors.
pub fn solve_instance(
    config: &EngineConfig,
    path: &Path,
    algorithm: Option<&str>,
    threshold: Option<i64>,
    json: bool,
) -> TspResult<ExitCode> {
    let file = TspInstanceYaml::from_yaml_file(path)?;
    let instance = file.to_instance()?;
    let algorithm: Algorithm = algorithm.unwrap_or(&file.solver.algorithm).parse()?;
    let threshold = resolve_threshold(
        threshold.or(file.solver.quantum_threshold),
        config.quantum.default_threshold,
    )?;

    let engine = Engine::new(config.clone());
    let result = engine.solve(&instance, algorithm, threshold)?;

    if json {
        println!("{}", to_json(&SolveResponse::from(&result))?);
    } else {
        print_solve_result(&file, &result);
    }

    match file.meta.optimal_known {
        Some(known) if known != result.cost => {
            eprintln!("✗ cost {} differs from the known optimum {known}", result.cost);
            Ok(ExitCode::from(1))
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

/// Compare algorithms on an instance file.
///
/// # Errors
///
/// Load, validation, or unknown-algorithm errors.
pub fn compare_instance(
    config: &EngineConfig,
    path: &Path,
    threshold: Option<i64>,
    algorithms: Option<&[String]>,
    json: bool,
) -> TspResult<ExitCode> {
    let file = TspInstanceYaml::from_yaml_file(path)?;
    let instance = file.to_instance()?;
    let threshold = resolve_threshold(
        threshold.or(file.solver.quantum_threshold),
        config.quantum.default_threshold,
    )?;
    let algorithms = parse_algorithms(algorithms)?;

    let engine = Engine::new(config.clone());
    let report = engine.compare(&instance, threshold, &algorithms)?;

    if json {
        println!("{}", to_json(&CompareAllResponse::from(&report))?);
    } else {
        print_comparison(&file, &report);
    }
    Ok(ExitCode::SUCCESS)
}

/// Both DP solvers on seeded random instances of 3..=`max_cities` cities.
///
/// # Errors
///
/// Validation of the threshold, or `ResourceLimitExceeded` when
/// `max_cities` is above the DP ceiling.
pub fn scaling(
    config: &EngineConfig,
    threshold: Option<i64>,
    max_cities: usize,
    seed: u64,
) -> TspResult<ExitCode> {
    let threshold = resolve_threshold(threshold, config.quantum.default_threshold)?;
    let engine = Engine::new(config.clone());

    print_scaling_header(threshold, seed);
    for n in 3..=max_cities {
        let mut rng = SolverRng::stream(seed, n as u64);
        let instance = TspInstance::random(n, SCALING_MAX_WEIGHT, &mut rng);
        let classical = engine.solve(&instance, Algorithm::ClassicalDp, threshold)?;
        let quantum = engine.solve(&instance, Algorithm::QuantumDp, threshold)?;
        print_scaling_row(&classical, &quantum, theoretical_speedup(n));
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the HTTP server until Ctrl+C.
///
/// # Errors
///
/// `Io` if the runtime cannot start or the address cannot be bound.
#[cfg(feature = "web")]
pub fn serve(config: EngineConfig, addr: Option<String>) -> TspResult<ExitCode> {
    let addr = addr.unwrap_or_else(|| config.server.bind.clone());
    let engine = Engine::new(config);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(crate::api::serve(engine, &addr))?;
    Ok(ExitCode::SUCCESS)
}

/// Without the `web` feature there is nothing to serve.
///
/// # Errors
///
/// Always `Config`.
#[cfg(not(feature = "web"))]
pub fn serve(_config: EngineConfig, _addr: Option<String>) -> TspResult<ExitCode> {
    Err(TspError::config("built without the `web` feature"))
}
