//! CLI output formatting.

use crate::compare::ComparisonReport;
use crate::tsp::{SolveResult, TspInstanceYaml};

/// Print version information.
pub fn print_version() {
    match option_env!("QTSP_GIT_HASH") {
        Some(hash) => println!("qtsp {} ({hash})", env!("CARGO_PKG_VERSION")),
        None => println!("qtsp {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Print help message.
pub fn print_help() {
    println!(
        r"qtsp - Exact TSP with simulated quantum amplitude amplification

USAGE:
    qtsp <COMMAND> [OPTIONS]

COMMANDS:
    solve <instance.yaml>       Solve an instance with one DP solver
        --algorithm <A>         classical | quantum (default: from file)
        --threshold <N>         Amplify steps with more than N candidates
        --json                  Print JSON

    compare <instance.yaml>     Run several algorithms side by side
        --threshold <N>         Amplification threshold
        --algorithms <A,B,..>   quantum_dp, classical_dp, brute_force,
                                nearest_neighbor, two_opt, genetic,
                                simulated_annealing (default: all)
        --json                  Print JSON

    scaling                     Oracle calls of both DP solvers by city count
        --threshold <N>         Amplification threshold
        --max-cities <N>        Largest instance (default: 10)
        --seed <N>              Instance seed (default: 42)

    serve                       Start the HTTP API
        --addr <HOST:PORT>      Bind address (default: from config)

    help                        Show this help message
    version                     Show version information

GLOBAL OPTIONS:
    --config <file.yaml>        Engine configuration

EXAMPLES:
    qtsp solve instances/four_city.yaml
    qtsp compare instances/bay_area.yaml --algorithms classical_dp,two_opt
    qtsp scaling --threshold 2 --max-cities 12
    RUST_LOG=debug qtsp serve --addr 127.0.0.1:8000
"
    );
}

/// Print one DP solve.
pub fn print_solve_result(file: &TspInstanceYaml, result: &SolveResult) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Instance:  {} ({} cities)", file.meta.id, result.n);
    println!("Algorithm: {}", result.algorithm.label());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    println!("Tour:   {}", file.describe_path(&result.path));
    println!("Cost:   {} {}", result.cost, file.meta.units);
    println!("Time:   {:.6}s", result.elapsed.as_secs_f64());
    println!();
    println!("DP states:       {}", result.dp_states_explored);
    println!("Quantum calls:   {}", result.quantum_calls);
    println!("Classical calls: {}", result.classical_calls);

    let amp = &result.amplification;
    if amp.amplified_steps > 0 {
        println!();
        println!("Amplified steps: {}", amp.amplified_steps);
        if let (Some(mean), Some(min)) = (amp.mean_success_probability, amp.min_success_probability) {
            println!("Success p:       mean {mean:.4}, min {min:.4}");
        }
        if amp.retries > 0 || amp.fallbacks > 0 {
            println!("Retries:         {} ({} fell back)", amp.retries, amp.fallbacks);
        }
    }
}

/// Print a comparison table.
pub fn print_comparison(file: &TspInstanceYaml, report: &ComparisonReport) {
    println!("Instance: {} ({} cities)\n", file.meta.id, report.n);
    println!(
        "{:<26} {:>10} {:>12} {:>12} {:>12}  {}",
        "Algorithm", "Cost", "Time (s)", "Q calls", "C calls", "Complexity"
    );
    println!("{}", "─".repeat(92));

    for metric in &report.metrics {
        if let Some(reason) = &metric.skip_reason {
            println!("{:<26} skipped: {reason}", metric.name());
            continue;
        }
        let cell = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        println!(
            "{:<26} {:>10} {:>12.6} {:>12} {:>12}  {}",
            metric.name(),
            cell(metric.cost),
            metric.elapsed.map_or(0.0, |d| d.as_secs_f64()),
            cell(metric.quantum_calls),
            cell(metric.classical_calls),
            metric.complexity()
        );
    }

    println!();
    if let (Some(cost), Some(best)) = (report.best_cost, report.best_algorithm) {
        println!("Best: {} {} ({})", cost, file.meta.units, best.label());
    }
    if let Some(speedup) = report.speedup {
        println!("Measured speedup:    {speedup:.2}x");
    }
    if let Some(speedup) = report.call_speedup {
        println!("Call speedup:        {speedup:.2}x");
    }
    println!("Theoretical speedup: {:.2}x", report.theoretical_speedup);
}

/// Header of the scaling table.
pub fn print_scaling_header(threshold: usize, seed: u64) {
    println!("Oracle-call scaling (threshold {threshold}, seed {seed})\n");
    println!(
        "{:>3} {:>10} {:>14} {:>14} {:>14} {:>8} {:>12}",
        "n", "DP states", "classical", "quantum", "quantum total", "ratio", "theoretical"
    );
    println!("{}", "─".repeat(80));
}

/// One row of the scaling table.
pub fn print_scaling_row(classical: &SolveResult, quantum: &SolveResult, theoretical: f64) {
    let quantum_total = quantum.quantum_calls + quantum.classical_calls;
    let ratio = quantum_total as f64 / classical.classical_calls.max(1) as f64;
    println!(
        "{:>3} {:>10} {:>14} {:>14} {:>14} {:>8.3} {:>12.2}",
        classical.n,
        classical.dp_states_explored,
        classical.classical_calls,
        quantum.quantum_calls,
        quantum_total,
        ratio,
        theoretical
    );
}
