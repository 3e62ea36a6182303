//! Identity-number and contact validation for payroll profiles.

use regex::Regex;

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollProfile;

/// Compiled patterns for the identifiers a payroll profile may carry.
#[derive(Debug, Clone)]
pub struct ProfileValidator {
    pan: Regex,
    uan: Regex,
    aadhaar: Regex,
    email: Regex,
}

fn compile(pattern: &str) -> EngineResult<Regex> {
    Regex::new(pattern).map_err(|e| EngineError::InvalidConfig {
        message: format!("bad validation pattern '{}': {}", pattern, e),
    })
}

impl ProfileValidator {
    /// Compiles the validation patterns.
    pub fn new() -> EngineResult<Self> {
        Ok(Self {
            pan: compile(r"^[A-Z]{5}[0-9]{4}[A-Z]$")?,
            uan: compile(r"^[0-9]{12}$")?,
            aadhaar: compile(r"^[2-9][0-9]{11}$")?,
            email: compile(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")?,
        })
    }

    /// Validates a profile's salary inputs and any identifiers it carries.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrms_engine::profiles::ProfileValidator;
    ///
    /// let validator = ProfileValidator::new().unwrap();
    /// assert!(validator.check_pan("ABCDE1234F").is_ok());
    /// assert!(validator.check_pan("abcde1234f").is_err());
    /// ```
    pub fn validate(&self, profile: &PayrollProfile) -> EngineResult<()> {
        if profile.employee_id.trim().is_empty() {
            return Err(EngineError::MissingField {
                field: "employee_id".to_string(),
            });
        }
        profile.salary_input().validate()?;

        if let Some(pan) = &profile.pan {
            self.check_pan(pan)?;
        }
        if let Some(uan) = &profile.uan {
            self.check_uan(uan)?;
        }
        if let Some(aadhaar) = &profile.aadhaar {
            self.check_aadhaar(aadhaar)?;
        }
        if let Some(email) = &profile.email {
            self.check_email(email)?;
        }
        Ok(())
    }

    /// Checks a PAN: five capital letters, four digits, one capital letter.
    pub fn check_pan(&self, pan: &str) -> EngineResult<()> {
        check(&self.pan, "pan", pan, "must be 5 letters, 4 digits and a letter")
    }

    /// Checks a UAN: exactly twelve digits.
    pub fn check_uan(&self, uan: &str) -> EngineResult<()> {
        check(&self.uan, "uan", uan, "must be exactly 12 digits")
    }

    /// Checks an Aadhaar number: twelve digits, not starting with 0 or 1.
    pub fn check_aadhaar(&self, aadhaar: &str) -> EngineResult<()> {
        check(
            &self.aadhaar,
            "aadhaar",
            aadhaar,
            "must be 12 digits not starting with 0 or 1",
        )
    }

    /// Checks an email address.
    pub fn check_email(&self, email: &str) -> EngineResult<()> {
        check(&self.email, "email", email, "is not a valid email address")
    }
}

fn check(pattern: &Regex, field: &str, value: &str, message: &str) -> EngineResult<()> {
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(EngineError::validation(field, message))
    }
}
