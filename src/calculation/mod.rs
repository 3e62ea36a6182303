//! Calculation logic for the HRMS engine.
//!
//! This module contains the CTC decomposition, slab-based tax evaluation for
//! the old and new regimes, the regime recommendation, the end-to-end payroll
//! calculation built from them, and worked-time arithmetic for attendance.

mod payroll;
mod regime_recommendation;
mod salary_breakdown;
mod tax_regime;
mod worked_time;

pub use payroll::{calculate_payroll, compare_regimes};
pub use regime_recommendation::{RegimeRecommendationResult, recommend_regime, round_two_places};
pub use salary_breakdown::{OTHER_ALLOWANCE_CLAMPED, SalaryBreakdownResult, decompose_salary};
pub use tax_regime::{TaxRegimeEvaluation, evaluate_regime, slab_tax};
pub use worked_time::{WorkedTime, calculate_worked_time};
