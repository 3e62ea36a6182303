//! Salary input and breakdown models.
//!
//! A [`SalaryInput`] is built per request; the [`SalaryBreakdown`] derived from
//! it is never stored and is recomputed every time it is needed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The largest amount accepted for any salary input: 10^15 rupees.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// The inputs to a salary decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryInput {
    /// Annual cost to company.
    pub ctc: Decimal,
    /// One-off joining bonus paid in the year.
    #[serde(default)]
    pub joining_bonus: Decimal,
    /// Variable pay for the year.
    #[serde(default)]
    pub variable_salary: Decimal,
    /// City of employment, used to pick the HRA rate.
    #[serde(default)]
    pub city: String,
}

impl SalaryInput {
    /// Creates an input with no bonus or variable pay.
    pub fn new(ctc: Decimal, city: impl Into<String>) -> Self {
        Self {
            ctc,
            joining_bonus: Decimal::ZERO,
            variable_salary: Decimal::ZERO,
            city: city.into(),
        }
    }

    /// Checks the input before it is decomposed.
    ///
    /// The CTC must be positive; bonus and variable pay must not be negative.
    /// No amount may exceed [`MAX_AMOUNT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hrms_engine::models::SalaryInput;
    /// use rust_decimal::Decimal;
    ///
    /// assert!(SalaryInput::new(Decimal::from(600000), "Pune").validate().is_ok());
    /// assert!(SalaryInput::new(Decimal::ZERO, "Pune").validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.ctc <= Decimal::ZERO {
            return Err(EngineError::validation("ctc", "must be greater than zero"));
        }
        if self.joining_bonus < Decimal::ZERO {
            return Err(EngineError::validation("joining_bonus", "must not be negative"));
        }
        if self.variable_salary < Decimal::ZERO {
            return Err(EngineError::validation(
                "variable_salary",
                "must not be negative",
            ));
        }
        for (field, amount) in [
            ("ctc", self.ctc),
            ("joining_bonus", self.joining_bonus),
            ("variable_salary", self.variable_salary),
        ] {
            if amount > MAX_AMOUNT {
                return Err(EngineError::validation(
                    field,
                    format!("must not exceed {}", MAX_AMOUNT),
                ));
            }
        }
        Ok(())
    }
}

/// A CTC split into its salary components. All amounts are annual unless
/// noted otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// Base salary.
    pub base_salary: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Whether the metro HRA rate was applied.
    pub is_metro: bool,
    /// Employee provident fund contribution.
    pub employee_pf: Decimal,
    /// Employer provident fund contribution.
    pub employer_pf: Decimal,
    /// Employee plus employer provident fund.
    pub pf: Decimal,
    /// Professional tax per month.
    pub professional_tax: Decimal,
    /// Professional tax for the year (`professional_tax * 12`).
    pub professional_tax_annual: Decimal,
    /// Medical allowance.
    pub medical_allowance: Decimal,
    /// Newspaper allowance.
    pub newspaper_allowance: Decimal,
    /// Dress allowance.
    pub dress_allowance: Decimal,
    /// Balancing allowance so the fixed components add up to the CTC.
    pub other_allowance: Decimal,
    /// True when the balancing allowance would have been negative.
    pub other_allowance_clamped: bool,
    /// Joining bonus carried from the input.
    pub joining_bonus: Decimal,
    /// Variable pay carried from the input.
    pub variable_salary: Decimal,
    /// Gross salary.
    pub gross_salary: Decimal,
    /// Income on which tax regimes are evaluated.
    pub taxable_income: Decimal,
}
