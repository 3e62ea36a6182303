//! Configuration loading and management for the HRMS engine.
//!
//! This module provides functionality to load payroll rules from YAML files,
//! including the salary structure used to decompose a CTC and the slab
//! tables of both income-tax regimes.
//!
//! # Example
//!
//! ```no_run
//! use hrms_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/in_payroll").unwrap();
//! println!("Loaded rules: {}", config.rules().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AllowanceRates, HraRates, PayrollConfig, ProfessionalTaxRule, ProvidentFundRates,
    RebateRule, RegimeConfig, RulesMetadata, SalaryStructure, TaxSlab,
};
