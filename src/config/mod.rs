//! Engine configuration with YAML schema and validation.
//!
//! Loaded from YAML, checked structurally by `validator`, then semantically
//! (cross-field rules) before use.
//!
//! ```yaml
//! limits:
//!   max_dp_cities: 15
//!   max_brute_force_cities: 9
//!   brute_force_timeout_ms: 2000
//! quantum:
//!   default_threshold: 3
//!   noise:
//!     enabled: false
//!     seed: 42
//!     max_retries: 3
//! search:
//!   seed: 42
//!   population_size: 50
//!   generations: 100
//!   annealing_iterations: 1000
//! dataset:
//!   seed: 42
//!   max_weight: 100
//! server:
//!   bind: "0.0.0.0:8000"
//!   log_filter: "info"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{TspError, TspResult};
use crate::tsp::search::{
    DEFAULT_ANNEALING_ITERATIONS, DEFAULT_GENERATIONS, DEFAULT_POPULATION_SIZE, DEFAULT_SEARCH_SEED,
};
use crate::tsp::{
    GeneticSearch, NoiseModel, SimulatedAnnealing, DEFAULT_MAX_BRUTE_FORCE_CITIES,
    DEFAULT_MAX_DP_CITIES,
};

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Per-algorithm resource limits.
    #[validate(nested)]
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Amplification settings.
    #[validate(nested)]
    #[serde(default)]
    pub quantum: QuantumConfig,

    /// Genetic and annealing baselines.
    #[validate(nested)]
    #[serde(default)]
    pub search: SearchConfig,

    /// Dataset evaluation settings.
    #[validate(nested)]
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// HTTP server settings.
    #[validate(nested)]
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            limits: LimitsConfig::default(),
            quantum: QuantumConfig::default(),
            search: SearchConfig::default(),
            dataset: DatasetConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed, or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> TspResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> TspResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn check(&self) -> TspResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    fn validate_semantic(&self) -> TspResult<()> {
        if self.limits.max_brute_force_cities > self.limits.max_dp_cities {
            return Err(TspError::config(format!(
                "max_brute_force_cities ({}) must not exceed max_dp_cities ({})",
                self.limits.max_brute_force_cities, self.limits.max_dp_cities
            )));
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(TspError::config(format!(
                "server.bind is not a socket address: {}",
                self.server.bind
            )));
        }
        Ok(())
    }

    /// Noise model to pass to the quantum solver, if enabled.
    #[must_use]
    pub const fn noise_model(&self) -> Option<NoiseModel> {
        if self.quantum.noise.enabled {
            Some(NoiseModel {
                seed: self.quantum.noise.seed,
                max_retries: self.quantum.noise.max_retries,
            })
        } else {
            None
        }
    }

    /// Brute-force time budget, if configured.
    #[must_use]
    pub fn brute_force_budget(&self) -> Option<Duration> {
        self.limits.brute_force_timeout_ms.map(Duration::from_millis)
    }

    /// Genetic algorithm with the configured parameters.
    #[must_use]
    pub fn genetic_search(&self) -> GeneticSearch {
        GeneticSearch::new(
            self.search.population_size,
            self.search.generations,
            self.search.seed,
        )
    }

    /// Simulated annealing with the configured parameters.
    #[must_use]
    pub const fn annealing(&self) -> SimulatedAnnealing {
        SimulatedAnnealing::new(self.search.annealing_iterations, self.search.seed)
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    max_dp_cities: Option<usize>,
    max_brute_force_cities: Option<usize>,
    brute_force_timeout: Option<Duration>,
    default_threshold: Option<usize>,
    noise: Option<NoiseModel>,
    search_seed: Option<u64>,
    bind: Option<String>,
}

impl EngineConfigBuilder {
    /// Ceiling for both DP solvers.
    #[must_use]
    pub const fn max_dp_cities(mut self, n: usize) -> Self {
        self.max_dp_cities = Some(n);
        self
    }

    /// Ceiling for brute force.
    #[must_use]
    pub const fn max_brute_force_cities(mut self, n: usize) -> Self {
        self.max_brute_force_cities = Some(n);
        self
    }

    /// Time budget for brute force.
    #[must_use]
    pub const fn brute_force_timeout(mut self, budget: Duration) -> Self {
        self.brute_force_timeout = Some(budget);
        self
    }

    /// Threshold used when a request does not give one.
    #[must_use]
    pub const fn default_threshold(mut self, threshold: usize) -> Self {
        self.default_threshold = Some(threshold);
        self
    }

    /// Enable the noisy measurement model.
    #[must_use]
    pub const fn noise(mut self, model: NoiseModel) -> Self {
        self.noise = Some(model);
        self
    }

    /// Seed of the genetic and annealing baselines.
    #[must_use]
    pub const fn search_seed(mut self, seed: u64) -> Self {
        self.search_seed = Some(seed);
        self
    }

    /// Server bind address.
    #[must_use]
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.bind = Some(addr.into());
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the resulting configuration is invalid.
    pub fn build(self) -> TspResult<EngineConfig> {
        let mut config = EngineConfig::default();

        if let Some(n) = self.max_dp_cities {
            config.limits.max_dp_cities = n;
        }
        if let Some(n) = self.max_brute_force_cities {
            config.limits.max_brute_force_cities = n;
        }
        if let Some(budget) = self.brute_force_timeout {
            config.limits.brute_force_timeout_ms =
                Some(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX));
        }
        if let Some(threshold) = self.default_threshold {
            config.quantum.default_threshold = threshold;
        }
        if let Some(model) = self.noise {
            config.quantum.noise = NoiseConfig {
                enabled: true,
                seed: model.seed,
                max_retries: model.max_retries,
            };
        }
        if let Some(seed) = self.search_seed {
            config.search.seed = seed;
        }
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }

        config.check()?;
        Ok(config)
    }
}

/// Resource limits checked before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum cities for the DP solvers (table size `n·2ⁿ⁻¹`).
    #[validate(range(min = 3, max = 20))]
    #[serde(default = "default_max_dp_cities")]
    pub max_dp_cities: usize,

    /// Maximum cities for brute force (`(n-1)!` tours).
    #[validate(range(min = 3, max = 12))]
    #[serde(default = "default_max_brute_force_cities")]
    pub max_brute_force_cities: usize,

    /// Brute-force time budget in milliseconds.
    #[validate(range(min = 1))]
    #[serde(default)]
    pub brute_force_timeout_ms: Option<u64>,
}

fn default_max_dp_cities() -> usize {
    DEFAULT_MAX_DP_CITIES
}

fn default_max_brute_force_cities() -> usize {
    DEFAULT_MAX_BRUTE_FORCE_CITIES
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_dp_cities: default_max_dp_cities(),
            max_brute_force_cities: default_max_brute_force_cities(),
            brute_force_timeout_ms: None,
        }
    }
}

/// Amplification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct QuantumConfig {
    /// Threshold used when a request omits one.
    #[validate(range(min = 1))]
    #[serde(default = "default_threshold")]
    pub default_threshold: usize,

    /// Noisy measurement model.
    #[validate(nested)]
    #[serde(default)]
    pub noise: NoiseConfig,
}

fn default_threshold() -> usize {
    3
}

impl Default for QuantumConfig {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            noise: NoiseConfig::default(),
        }
    }
}

/// Noisy measurement model settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NoiseConfig {
    /// Draw Bernoulli trials instead of assuming success.
    #[serde(default)]
    pub enabled: bool,

    /// RNG seed.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Extra rounds after a failed measurement.
    #[validate(range(max = 16))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_seed() -> u64 {
    42
}

fn default_max_retries() -> u32 {
    3
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            seed: default_seed(),
            max_retries: default_max_retries(),
        }
    }
}

/// Stochastic baseline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Seed shared by both searches.
    #[serde(default = "default_search_seed")]
    pub seed: u64,

    /// Genetic algorithm population.
    #[validate(range(min = 2, max = 10000))]
    #[serde(default = "default_population_size")]
    pub population_size: usize,

    /// Genetic algorithm generations.
    #[validate(range(max = 100000))]
    #[serde(default = "default_generations")]
    pub generations: usize,

    /// Simulated annealing swap proposals.
    #[validate(range(max = 10000000))]
    #[serde(default = "default_annealing_iterations")]
    pub annealing_iterations: usize,
}

fn default_search_seed() -> u64 {
    DEFAULT_SEARCH_SEED
}

fn default_population_size() -> usize {
    DEFAULT_POPULATION_SIZE
}

fn default_generations() -> usize {
    DEFAULT_GENERATIONS
}

fn default_annealing_iterations() -> usize {
    DEFAULT_ANNEALING_ITERATIONS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed: default_search_seed(),
            population_size: default_population_size(),
            generations: default_generations(),
            annealing_iterations: default_annealing_iterations(),
        }
    }
}

/// Dataset evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    /// Seed for instances generated for rows without a matrix.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Largest edge weight of generated instances.
    #[validate(range(min = 1))]
    #[serde(default = "default_max_weight")]
    pub max_weight: u64,
}

fn default_max_weight() -> u64 {
    100
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            max_weight: default_max_weight(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[validate(length(min = 1))]
    #[serde(default = "default_bind")]
    pub bind: String,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[validate(length(min = 1))]
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_filter: default_log_filter(),
        }
    }
}
