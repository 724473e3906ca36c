//! # qtsp
//!
//! Exact travelling-salesman solving with two Held-Karp variants:
//! - classical DP, every predecessor minimization a linear scan
//! - quantum-amplified DP, large minimizations charged with the analytic
//!   Grover iteration count instead
//!
//! Both return the same optimal tour; they differ only in the query counts
//! they report. Brute force, nearest neighbor and 2-opt serve as baselines.
//!
//! ## Example
//!
//! ```rust
//! use qtsp::prelude::*;
//!
//! let instance = validate(&[
//!     vec![0, 10, 15, 20],
//!     vec![10, 0, 35, 25],
//!     vec![15, 35, 0, 30],
//!     vec![20, 25, 30, 0],
//! ])?;
//!
//! let classical = solve_classical(&instance)?;
//! let quantum = solve_quantum(&instance, 2)?;
//! assert_eq!(classical.cost, 80);
//! assert_eq!(quantum.path, classical.path);
//! # Ok::<(), qtsp::TspError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_const_for_fn,
    clippy::needless_range_loop,   // DP indices read clearer as ranges
)]

pub mod cli;
pub mod compare;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod tsp;
pub mod wire;

#[cfg(feature = "web")]
pub mod api;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::compare::{AlgorithmMetric, Comparator, ComparisonReport};
    pub use crate::config::{EngineConfig, EngineConfigBuilder};
    pub use crate::dataset::{DatasetRecord, DatasetReport, DatasetRow, RouteCategory};
    pub use crate::engine::{Engine, SolverRng, StatisticsAggregator, StatisticsSnapshot};
    pub use crate::error::{TspError, TspResult, ValidationError};
    pub use crate::tsp::{
        solve_classical, solve_quantum, validate, Algorithm, SolveResult, Tour, TspInstance,
    };
}

/// Re-export for public API
pub use error::{TspError, TspResult, ValidationError};
