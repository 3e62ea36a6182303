//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! rules from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::TaxRegime;

use super::types::{PayrollConfig, RegimeConfig, RulesMetadata, SalaryStructure};

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides access to the salary structure and tax regimes.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/in_payroll/
/// ├── rules.yaml             # Rule set metadata
/// ├── salary_structure.yaml  # CTC decomposition rates
/// └── regimes/
///     ├── old.yaml           # Old regime slabs, rebate and cess
///     └── new.yaml           # New regime slabs, rebate and cess
/// ```
///
/// # Example
///
/// ```no_run
/// use hrms_engine::config::ConfigLoader;
/// use hrms_engine::models::TaxRegime;
///
/// let loader = ConfigLoader::load("./config/in_payroll").unwrap();
/// let old = loader.regime(TaxRegime::Old);
/// println!("{} has {} slabs", old.name, old.slabs.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A regime is missing, duplicated or has an invalid slab table
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hrms_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/in_payroll")?;
    /// # Ok::<(), hrms_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<RulesMetadata>(&path.join("rules.yaml"))?;
        let salary_structure =
            Self::load_yaml::<SalaryStructure>(&path.join("salary_structure.yaml"))?;
        let regimes = Self::load_regimes(&path.join("regimes"))?;

        let config = PayrollConfig::new(metadata, salary_structure, regimes)?;
        debug!(
            rules = %config.rules().code,
            version = %config.rules().version,
            "Payroll configuration loaded"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every regime file from the regimes directory.
    fn load_regimes(regimes_dir: &Path) -> EngineResult<Vec<RegimeConfig>> {
        let regimes_dir_str = regimes_dir.display().to_string();

        let entries = fs::read_dir(regimes_dir).map_err(|_| EngineError::ConfigNotFound {
            path: regimes_dir_str.clone(),
        })?;

        let mut regimes = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: regimes_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                regimes.push(Self::load_yaml::<RegimeConfig>(&path)?);
            }
        }

        if regimes.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no regime files found)", regimes_dir_str),
            });
        }

        Ok(regimes)
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the rule set metadata.
    pub fn rules(&self) -> &RulesMetadata {
        self.config.rules()
    }

    /// Returns the salary structure used for CTC decomposition.
    pub fn salary_structure(&self) -> &SalaryStructure {
        self.config.salary_structure()
    }

    /// Returns the configuration of a tax regime.
    pub fn regime(&self, regime: TaxRegime) -> &RegimeConfig {
        self.config.regime(regime)
    }
}
