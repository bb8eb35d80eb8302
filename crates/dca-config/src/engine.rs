//! Engine-wide settings: bounds, solver and reporting precision.

use std::path::Path;

use serde::{Deserialize, Serialize};

use dca_math::solvers::{SolverConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

use crate::bounds::SegmentBounds;
use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

// =============================================================================
// SOLVER SETTINGS
// =============================================================================

/// Root-finder settings used by the modified Arps solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Convergence tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Iteration budget.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl SolverSettings {
    /// Converts to the math crate's solver configuration.
    #[must_use]
    pub fn to_solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
    }
}

impl From<SolverSettings> for SolverConfig {
    fn from(settings: SolverSettings) -> Self {
        settings.to_solver_config()
    }
}

impl Validate for SolverSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.tolerance > 0.0 && self.tolerance <= 1e-4) {
            errors.push(ValidationError::with_rule(
                "tolerance",
                "Solver tolerance must be between 0 and 1e-4",
                "valid_tolerance",
            ));
        }

        if self.max_iterations == 0 || self.max_iterations > 10_000 {
            errors.push(ValidationError::with_rule(
                "max_iterations",
                "Max iterations must be between 1 and 10000",
                "valid_iterations",
            ));
        }

        errors
    }
}

// =============================================================================
// ENGINE CONFIGURATION
// =============================================================================

/// Maximum decimal precision accepted for reported values.
const MAX_PRECISION: u32 = 15;

/// Configuration shared by every segment instance.
///
/// Loaded from TOML or JSON; every section and key is optional:
///
/// ```toml
/// rate_precision = 4
///
/// [bounds]
/// numeric_small = 0.0001
/// date_idx_large = 100000
///
/// [solver]
/// tolerance = 1e-10
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rate and index bounds.
    #[serde(default)]
    pub bounds: SegmentBounds,

    /// Root-finder settings.
    #[serde(default)]
    pub solver: SolverSettings,

    /// Decimal places for rates in editor ranges.
    #[serde(default = "default_rate_precision")]
    pub rate_precision: u32,

    /// Decimal places for day indices in editor ranges.
    #[serde(default)]
    pub index_precision: u32,

    /// Decimal places for effective declines in editor ranges.
    #[serde(default = "default_decline_precision")]
    pub decline_precision: u32,
}

fn default_rate_precision() -> u32 {
    4
}

fn default_decline_precision() -> u32 {
    6
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bounds: SegmentBounds::default(),
            solver: SolverSettings::default(),
            rate_precision: default_rate_precision(),
            index_precision: 0,
            decline_precision: default_decline_precision(),
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: SegmentBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the solver settings.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverSettings) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the rate precision.
    #[must_use]
    pub fn with_rate_precision(mut self, decimals: u32) -> Self {
        self.rate_precision = decimals;
        self
    }

    /// Sets the index precision.
    #[must_use]
    pub fn with_index_precision(mut self, decimals: u32) -> Self {
        self.index_precision = decimals;
        self
    }

    /// Sets the effective decline precision.
    #[must_use]
    pub fn with_decline_precision(mut self, decimals: u32) -> Self {
        self.decline_precision = decimals;
        self
    }

    /// Solver configuration for root finding.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        self.solver.to_solver_config()
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(input: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Loads a configuration file, choosing the parser from the extension.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> ConfigResult<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&contents)
    }

    /// Loads a configuration file, falling back to defaults on any error.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("using default engine configuration, {} rejected: {err}", path.display());
                Self::default()
            }
        }
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = self
            .bounds
            .validate()
            .into_iter()
            .map(|e| e.nested("bounds"))
            .collect();
        errors.extend(self.solver.validate().into_iter().map(|e| e.nested("solver")));

        let precisions = [
            ("rate_precision", self.rate_precision),
            ("index_precision", self.index_precision),
            ("decline_precision", self.decline_precision),
        ];
        for (field, decimals) in precisions {
            if decimals > MAX_PRECISION {
                errors.push(ValidationError::with_rule(
                    field,
                    format!("Precision cannot exceed {MAX_PRECISION}"),
                    "max_precision",
                ));
            }
        }

        errors
    }
}
