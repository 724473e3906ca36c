//! Command-line interface for qtsp.
//!
//! Parsing, dispatch, and output live in separate modules so each can be
//! tested without spawning the binary.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, DEFAULT_SCALING_MAX_CITIES, DEFAULT_SCALING_SEED};
pub use commands::{compare_instance, load_config, run_cli, scaling, solve_instance};
pub use output::{print_help, print_version};
