// src/config.rs

//! Marker configuration files
//!
//! A TOML file supplying marker variable overrides, so metadata can be
//! evaluated for a platform other than the running one:
//!
//! ```toml
//! platform_dependent = true
//!
//! [variables]
//! "sys.platform" = "linux2"
//! python_version = "2.7"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::marker::{ExecutionContext, VARIABLES};

/// Marker settings loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerConfig {
    /// Evaluate markers when reading fields
    #[serde(default)]
    pub platform_dependent: bool,

    /// Variable overrides, consulted before the built-in table
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl MarkerConfig {
    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!("Loaded marker config from {}", path.display());
        Self::parse(&content)
    }

    /// Parse config from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for name in self.variables.keys() {
            let valid = !name.is_empty()
                && !name.starts_with('.')
                && !name.ends_with('.')
                && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.');
            if !valid {
                return Err(Error::Config(format!("invalid variable name {:?}", name)));
            }
            if !VARIABLES.contains(&name.as_str()) {
                debug!("Config defines non-standard marker variable '{}'", name);
            }
        }
        Ok(())
    }

    /// Override (or add) a single variable
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// The overrides as a marker execution context
    pub fn execution_context(&self) -> ExecutionContext {
        self.variables.clone()
    }
}
