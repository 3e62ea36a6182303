//! Core data models for the HRMS engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod audit;
mod payroll;
mod salary;
mod tax;

pub use attendance::{AttendanceRecord, AttendanceStatus, GeoPoint};
pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use payroll::{PayrollCalculation, PayrollProfile};
pub use salary::{MAX_AMOUNT, SalaryBreakdown, SalaryInput};
pub use tax::{RegimeRecommendation, TaxComparison, TaxRegime, TaxRegimeResult};
