//! YAML instance files.
//!
//! Users can keep instances on disk, edit them, and re-run experiments without
//! touching code.
//!
//! # Example YAML
//!
//! ```yaml
//! meta:
//!   id: "TSP-DEMO-004"
//!   description: "4-city textbook instance"
//!   units: "km"
//!   optimal_known: 80
//!
//! cities:
//!   - { id: 0, name: "A" }
//!   - { id: 1, name: "B" }
//!   - { id: 2, name: "C" }
//!   - { id: 3, name: "D" }
//!
//! matrix:
//!   - [0, 10, 15, 20]
//!   - [10, 0, 35, 25]
//!   - [15, 35, 0, 30]
//!   - [20, 25, 30, 0]
//!
//! solver:
//!   algorithm: "quantum"
//!   quantum_threshold: 2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::instance::{validate, TspInstance};
use crate::error::{TspError, TspResult, ValidationError};

/// Metadata about the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceMeta {
    /// Unique instance identifier.
    pub id: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Distance units (e.g., "miles", "km").
    #[serde(default = "default_units")]
    pub units: String,
    /// Known optimal tour cost, checked by `qtsp solve` when present.
    #[serde(default)]
    pub optimal_known: Option<u64>,
}

fn default_units() -> String {
    "units".to_string()
}

/// A named city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceCity {
    /// City index (0-based, matches the matrix row).
    pub id: usize,
    /// Display name.
    pub name: String,
}

/// Solver defaults stored with the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverSection {
    /// `quantum` or `classical`.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Candidate count above which amplification is used.
    #[serde(default)]
    pub quantum_threshold: Option<i64>,
}

fn default_algorithm() -> String {
    "quantum".to_string()
}

impl Default for SolverSection {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            quantum_threshold: None,
        }
    }
}

/// Complete instance file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TspInstanceYaml {
    /// Instance metadata.
    pub meta: InstanceMeta,
    /// Optional city names.
    #[serde(default)]
    pub cities: Vec<InstanceCity>,
    /// Cost matrix (n × n).
    pub matrix: Vec<Vec<i64>>,
    /// Solver defaults.
    #[serde(default)]
    pub solver: SolverSection,
}

impl TspInstanceYaml {
    /// Parse an instance file from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns `YamlParse` if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> TspResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load an instance file from disk.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> TspResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Serialize to a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> TspResult<String> {
        serde_yaml::to_string(self).map_err(|e| TspError::serialization(e.to_string()))
    }

    /// Run the matrix through the validator.
    ///
    /// # Errors
    ///
    /// `Validation` if the city list disagrees with the matrix or the matrix
    /// itself is invalid.
    pub fn to_instance(&self) -> TspResult<TspInstance> {
        if !self.cities.is_empty() && self.cities.len() != self.matrix.len() {
            return Err(ValidationError::CityCountMismatch {
                cities: self.cities.len(),
                rows: self.matrix.len(),
            }
            .into());
        }
        Ok(validate(&self.matrix)?)
    }

    /// Display name of a city, falling back to its index.
    #[must_use]
    pub fn city_name(&self, id: usize) -> String {
        self.cities
            .iter()
            .find(|c| c.id == id)
            .map_or_else(|| id.to_string(), |c| c.name.clone())
    }

    /// Render a path with city names, e.g. `A → B → A`.
    #[must_use]
    pub fn describe_path(&self, path: &[usize]) -> String {
        path.iter()
            .map(|&id| self.city_name(id))
            .collect::<Vec<_>>()
            .join(" → ")
    }
}
