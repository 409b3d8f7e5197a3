//! Analysis configuration
//!
//! Every field has a default, so a YAML document only needs the keys it changes:
//!
//! ```yaml
//! strategy: keyed
//! delta_window: 2
//! drivers: [HAM, VER]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::driver::DEFAULT_DELTA_WINDOW;
use crate::extract::{MarkerConfig, PairingStrategy};
use crate::{AnalysisError, Result};

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How safety-car messages are paired into windows
    pub strategy: PairingStrategy,
    /// Text markers recognised in race-control messages
    pub markers: MarkerConfig,
    /// Laps compared on each side of a safety-car lap
    pub delta_window: u32,
    /// Driver codes to analyse; empty means every driver the provider lists
    pub drivers: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: PairingStrategy::default(),
            markers: MarkerConfig::default(),
            delta_window: DEFAULT_DELTA_WINDOW,
            drivers: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            AnalysisError::parse_error("analysis configuration", e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::file_error(path.to_path_buf(), e))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<()> {
        if self.delta_window == 0 {
            return Err(AnalysisError::config_error("delta_window must be at least 1"));
        }
        if self.drivers.iter().any(|code| code.trim().is_empty()) {
            return Err(AnalysisError::config_error("driver codes must not be blank"));
        }
        let mut seen = HashSet::with_capacity(self.drivers.len());
        if let Some(code) =
            self.drivers.iter().find(|code| !seen.insert(code.trim().to_ascii_uppercase()))
        {
            return Err(AnalysisError::config_error(format!(
                "driver code {code} is listed more than once"
            )));
        }
        self.markers.validate()
    }

    pub fn with_strategy(mut self, strategy: PairingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_delta_window(mut self, delta_window: u32) -> Self {
        self.delta_window = delta_window;
        self
    }

    pub fn with_drivers<I, S>(mut self, drivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drivers = drivers.into_iter().map(Into::into).collect();
        self
    }
}
