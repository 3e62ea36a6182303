//! Payroll calculation and profile models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditTrace, RegimeRecommendation, SalaryBreakdown, SalaryInput, TaxRegimeResult};

/// The complete result of a payroll calculation.
///
/// This struct captures the salary breakdown, both regimes' tax, the
/// recommendation and take-home pay, together with an audit trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCalculation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The inputs the calculation was run on.
    pub input: SalaryInput,
    /// The CTC decomposition.
    pub breakdown: SalaryBreakdown,
    /// Tax under the old regime.
    pub old_regime: TaxRegimeResult,
    /// Tax under the new regime.
    pub new_regime: TaxRegimeResult,
    /// The recommended regime.
    pub recommendation: RegimeRecommendation,
    /// `taxable_income - total_tax`.
    pub net_annual_salary: Decimal,
    /// `net_annual_salary / 12`, rounded to two decimal places.
    pub net_monthly_salary: Decimal,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

/// Salary inputs stored for an employee.
///
/// Only inputs are persisted; a [`PayrollCalculation`] is recomputed from
/// them on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollProfile {
    /// The employee the profile belongs to.
    pub employee_id: String,
    /// Display name.
    #[serde(default)]
    pub employee_name: Option<String>,
    /// City of employment.
    pub city: String,
    /// Annual cost to company.
    pub ctc: Decimal,
    /// Joining bonus.
    pub joining_bonus: Decimal,
    /// Variable pay.
    pub variable_salary: Decimal,
    /// Provident fund account number.
    #[serde(default)]
    pub pfno: Option<String>,
    /// Universal account number.
    #[serde(default)]
    pub uan: Option<String>,
    /// Permanent account number.
    #[serde(default)]
    pub pan: Option<String>,
    /// Aadhaar number.
    #[serde(default)]
    pub aadhaar: Option<String>,
    /// Payslip email address.
    #[serde(default)]
    pub email: Option<String>,
    /// When the profile was last written.
    pub updated_at: DateTime<Utc>,
}

impl PayrollProfile {
    /// Returns the salary input stored in this profile.
    pub fn salary_input(&self) -> SalaryInput {
        SalaryInput {
            ctc: self.ctc,
            joining_bonus: self.joining_bonus,
            variable_salary: self.variable_salary,
            city: self.city.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_salary_input_copies_stored_fields() {
        let profile = PayrollProfile {
            employee_id: "EMP001".to_string(),
            employee_name: Some("Asha Rao".to_string()),
            city: "Chennai".to_string(),
            ctc: Decimal::from_str("900000").unwrap(),
            joining_bonus: Decimal::from_str("25000").unwrap(),
            variable_salary: Decimal::from_str("50000").unwrap(),
            pfno: None,
            uan: None,
            pan: None,
            aadhaar: None,
            email: None,
            updated_at: Utc::now(),
        };

        let input = profile.salary_input();
        assert_eq!(input.ctc, profile.ctc);
        assert_eq!(input.joining_bonus, profile.joining_bonus);
        assert_eq!(input.variable_salary, profile.variable_salary);
        assert_eq!(input.city, "Chennai");
    }
}
