// crates/fieldset-config/src/config.rs
// ============================================================================
// Module: Fieldset Configuration
// Description: Configuration loading and validation for Fieldset tools.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: fieldset-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, the `FIELDSET_CONFIG` environment variable,
//! or `fieldset.toml` in the working directory, in that order. Invalid
//! configuration fails closed.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use fieldset_core::DEFAULT_MAX_DEPTH;
use fieldset_core::ResolveOptions;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "fieldset.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "FIELDSET_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for the configurable nesting depth.
pub const MAX_MAX_DEPTH: usize = 256;
/// Default limit for schema and value input files.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;
/// Upper bound for the configurable input size limit.
pub const MAX_MAX_INPUT_BYTES: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Root configuration for Fieldset tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsetConfig {
    /// Default resolution policy.
    #[serde(default)]
    pub resolve: ResolveConfig,
    /// Hard limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl FieldsetConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_from(&resolved)
    }

    /// Loads configuration, falling back to defaults when no path was given
    /// explicitly and the default file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an existing or explicit config fails to load.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let implicit = path.is_none() && env::var_os(CONFIG_ENV_VAR).is_none();
        if implicit && !resolved.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&resolved)
    }

    /// Reads, parses, and validates a config file at a resolved path.
    fn load_from(resolved: &Path) -> Result<Self, ConfigError> {
        validate_path(resolved)?;
        let bytes = fs::read(resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::from_toml(content)?;
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()
    }

    /// Builds resolver options from the configured policy and limits.
    #[must_use]
    pub const fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions::new(self.resolve.inject_defaults, self.resolve.include_hidden)
            .with_max_depth(self.limits.max_depth)
    }
}

/// Default resolution policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Emit defaults for absent values (default on).
    #[serde(default = "default_inject_defaults")]
    pub inject_defaults: bool,
    /// Emit fields hidden by visibility rules (default off).
    #[serde(default)]
    pub include_hidden: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            inject_defaults: default_inject_defaults(),
            include_hidden: false,
        }
    }
}

/// Hard limits on nesting and input size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum container nesting depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Maximum size in bytes of a schema or values input.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl LimitsConfig {
    /// Validates limit ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 || self.max_depth > MAX_MAX_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "limits.max_depth must be between 1 and {MAX_MAX_DEPTH}"
            )));
        }
        if self.max_input_bytes == 0 || self.max_input_bytes > MAX_MAX_INPUT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "limits.max_input_bytes must be between 1 and {MAX_MAX_INPUT_BYTES}"
            )));
        }
        Ok(())
    }
}

/// Default for `resolve.inject_defaults`.
const fn default_inject_defaults() -> bool {
    true
}

/// Default for `limits.max_depth`.
const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Default for `limits.max_input_bytes`.
const fn default_max_input_bytes() -> usize {
    DEFAULT_MAX_INPUT_BYTES
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
