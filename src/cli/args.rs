//! CLI argument parsing.
//!
//! Hand-rolled so that parsing is a pure function of a string iterator and
//! can be tested without touching the process environment.

use std::path::PathBuf;

/// Largest instance the `scaling` command generates by default.
pub const DEFAULT_SCALING_MAX_CITIES: usize = 10;

/// Seed the `scaling` command uses by default.
pub const DEFAULT_SCALING_SEED: u64 = 42;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
    /// Engine configuration file (`--config`).
    pub config_path: Option<PathBuf>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Solve an instance file with one DP solver
    Solve {
        /// Path to the instance YAML file.
        instance_path: PathBuf,
        /// Solver override (`classical` or `quantum`).
        algorithm: Option<String>,
        /// Threshold override.
        threshold: Option<i64>,
        /// Print JSON instead of a report.
        json: bool,
    },
    /// Compare several algorithms on an instance file
    Compare {
        /// Path to the instance YAML file.
        instance_path: PathBuf,
        /// Threshold override.
        threshold: Option<i64>,
        /// Comma-separated algorithm ids; all when absent.
        algorithms: Option<Vec<String>>,
        /// Print JSON instead of a table.
        json: bool,
    },
    /// Oracle-call scaling of both DP solvers on random instances
    Scaling {
        /// Threshold override.
        threshold: Option<i64>,
        /// Largest city count.
        max_cities: usize,
        /// Instance seed.
        seed: u64,
    },
    /// Start the HTTP server
    Serve {
        /// Bind address override.
        addr: Option<String>,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        let config_path = option_value(args, "--config").map(PathBuf::from);
        if args.len() < 2 {
            return Self {
                command: Command::Help,
                config_path,
            };
        }

        let command = match args[1].as_str() {
            "solve" => Self::parse_solve_command(args),
            "compare" => Self::parse_compare_command(args),
            "scaling" => Self::parse_scaling_command(args),
            "serve" => Command::Serve {
                addr: option_value(args, "--addr"),
            },
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self {
            command,
            config_path,
        }
    }

    fn parse_solve_command(args: &[String]) -> Command {
        let Some(path) = positional(args) else {
            eprintln!("Error: 'solve' command requires an instance path");
            return Command::Help;
        };

        Command::Solve {
            instance_path: PathBuf::from(path),
            algorithm: option_value(args, "--algorithm"),
            threshold: parsed_option(args, "--threshold"),
            json: has_flag(args, "--json"),
        }
    }

    fn parse_compare_command(args: &[String]) -> Command {
        let Some(path) = positional(args) else {
            eprintln!("Error: 'compare' command requires an instance path");
            return Command::Help;
        };

        let algorithms = option_value(args, "--algorithms").map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect()
        });

        Command::Compare {
            instance_path: PathBuf::from(path),
            threshold: parsed_option(args, "--threshold"),
            algorithms,
            json: has_flag(args, "--json"),
        }
    }

    fn parse_scaling_command(args: &[String]) -> Command {
        Command::Scaling {
            threshold: parsed_option(args, "--threshold"),
            max_cities: parsed_option(args, "--max-cities").unwrap_or(DEFAULT_SCALING_MAX_CITIES),
            seed: parsed_option(args, "--seed").unwrap_or(DEFAULT_SCALING_SEED),
        }
    }
}

/// Options that consume the following argument.
const VALUE_OPTIONS: [&str; 7] = [
    "--config",
    "--algorithm",
    "--algorithms",
    "--threshold",
    "--max-cities",
    "--seed",
    "--addr",
];

/// First argument after the command that is neither an option nor an
/// option's value.
fn positional(args: &[String]) -> Option<&String> {
    let mut i = 2;
    while i < args.len() {
        let arg = args[i].as_str();
        if VALUE_OPTIONS.contains(&arg) {
            i += 2;
        } else if arg.starts_with("--") {
            i += 1;
        } else {
            return Some(&args[i]);
        }
    }
    None
}

fn option_value(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Value of `name` parsed as `T`; unparsable values are reported and ignored.
fn parsed_option<T: std::str::FromStr>(args: &[String], name: &str) -> Option<T> {
    let raw = option_value(args, name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("Warning: ignoring invalid value for {name}: {raw}");
            None
        }
    }
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}
