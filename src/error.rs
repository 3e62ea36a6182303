//! Error types for the HRMS engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll calculation,
//! attendance tracking and configuration loading.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the HRMS engine.
///
/// All fallible operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use hrms_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rules.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rules.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but its contents are inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the inconsistency.
        message: String,
    },

    /// A required field was not supplied.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// A supplied field failed validation.
    #[error("Invalid field '{field}': {message}")]
    ValidationFailed {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An import file type is not one of the supported spreadsheet formats.
    #[error("Unsupported file type: {file_name}")]
    UnsupportedFileType {
        /// The offending file name.
        file_name: String,
    },

    /// No payroll profile is stored for the employee.
    #[error("Payroll profile not found for employee '{employee_id}'")]
    ProfileNotFound {
        /// The employee that was looked up.
        employee_id: String,
    },

    /// The employee already has an open check-in for the date.
    #[error("Employee '{employee_id}' is already checked in on {date}")]
    AlreadyCheckedIn {
        /// The employee attempting to check in.
        employee_id: String,
        /// The attendance date.
        date: NaiveDate,
    },

    /// The employee has no open check-in to close for the date.
    #[error("No open check-in for employee '{employee_id}' on {date}")]
    NoOpenCheckIn {
        /// The employee attempting to check out.
        employee_id: String,
        /// The attendance date.
        date: NaiveDate,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::ValidationFailed`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
