//! qtsp CLI - exact TSP with simulated amplitude amplification.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use qtsp::cli::{load_config, run_cli, Args};

fn main() -> ExitCode {
    let args = Args::parse();

    // RUST_LOG wins over the configured filter.
    let fallback = load_config(args.config_path.as_deref())
        .map(|c| c.server.log_filter)
        .unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run_cli(args)
}
