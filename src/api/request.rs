//! Request types for the HRMS engine API.
//!
//! Salary calculation takes a [`SalaryInput`](crate::models::SalaryInput)
//! body directly; the types here cover the remaining endpoints.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::attendance::{ImportRow, Punch, parse_clock_time};
use crate::error::{EngineError, EngineResult};
use crate::models::{GeoPoint, PayrollProfile};

/// Request body for `POST /tax/compare`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxCompareRequest {
    /// Annual taxable income to evaluate.
    pub taxable_income: Decimal,
}

/// Request body for `PUT /payroll/{employee_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollProfileRequest {
    /// Display name.
    #[serde(default)]
    pub employee_name: Option<String>,
    /// City of employment.
    #[serde(default)]
    pub city: String,
    /// Annual cost to company.
    pub ctc: Decimal,
    /// Joining bonus.
    #[serde(default)]
    pub joining_bonus: Decimal,
    /// Variable pay.
    #[serde(default)]
    pub variable_salary: Decimal,
    /// Provident fund account number.
    #[serde(default)]
    pub pfno: Option<String>,
    /// Universal account number.
    #[serde(default)]
    pub uan: Option<String>,
    /// Permanent account number. Stored upper-cased.
    #[serde(default)]
    pub pan: Option<String>,
    /// Aadhaar number.
    #[serde(default)]
    pub aadhaar: Option<String>,
    /// Payslip email address.
    #[serde(default)]
    pub email: Option<String>,
}

/// Trims a value and drops it if nothing is left.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl PayrollProfileRequest {
    /// Builds the profile to store for `employee_id`.
    ///
    /// `updated_at` is a placeholder; the store stamps the write time.
    pub fn into_profile(self, employee_id: String) -> PayrollProfile {
        PayrollProfile {
            employee_id,
            employee_name: non_blank(self.employee_name),
            city: self.city.trim().to_string(),
            ctc: self.ctc,
            joining_bonus: self.joining_bonus,
            variable_salary: self.variable_salary,
            pfno: non_blank(self.pfno),
            uan: non_blank(self.uan),
            pan: non_blank(self.pan).map(|pan| pan.to_ascii_uppercase()),
            aadhaar: non_blank(self.aadhaar),
            email: non_blank(self.email),
            updated_at: chrono::Utc::now(),
        }
    }
}

/// Request body for `POST /attendance/check-in` and
/// `POST /attendance/check-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRequest {
    /// The employee punching in or out.
    pub employee_id: String,
    /// Attendance date; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Clock time as `HH:MM` or `HH:MM:SS`; defaults to now.
    #[serde(default)]
    pub time: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl PunchRequest {
    /// Resolves the request into a punch, filling in missing date and time
    /// from `now`.
    pub fn into_punch(self, now: NaiveDateTime) -> EngineResult<Punch> {
        let time = match self.time.as_deref() {
            None => now.time(),
            Some(text) => parse_clock_time(text).ok_or_else(|| {
                EngineError::validation("time", format!("'{}' is not HH:MM or HH:MM:SS", text))
            })?,
        };

        Ok(Punch {
            employee_id: self.employee_id.trim().to_string(),
            date: self.date.unwrap_or_else(|| now.date()),
            time,
            location: GeoPoint {
                latitude: self.latitude,
                longitude: self.longitude,
            },
        })
    }
}

/// Query string for `GET /attendance/{employee_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceQuery {
    /// Restricts the listing to one date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Request body for `POST /attendance/import`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Name of the uploaded file, checked for a spreadsheet extension.
    #[serde(default)]
    pub source_file: Option<String>,
    /// Data rows, excluding the header.
    pub rows: Vec<ImportRow>,
}
