//! End-to-end payroll calculation.
//!
//! This is the single entry point every caller uses to turn a CTC into a
//! salary breakdown, both regimes' tax, a recommendation and take-home pay.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditTrace, PayrollCalculation, SalaryInput, TaxComparison, TaxRegime,
};

use super::{decompose_salary, evaluate_regime, recommend_regime, round_two_places};

/// Evaluates both regimes on a taxable income and recommends one.
///
/// Returns the comparison together with its audit steps, numbered from
/// `step_number`.
pub fn compare_regimes(
    taxable_income: Decimal,
    config: &PayrollConfig,
    step_number: u32,
) -> (TaxComparison, Vec<AuditStep>) {
    let mut audit_steps = Vec::new();

    let old = evaluate_regime(taxable_income, config.regime(TaxRegime::Old), step_number);
    let step_number = step_number + old.audit_steps.len() as u32;
    audit_steps.extend(old.audit_steps);

    let new = evaluate_regime(taxable_income, config.regime(TaxRegime::New), step_number);
    let step_number = step_number + new.audit_steps.len() as u32;
    audit_steps.extend(new.audit_steps);

    let recommendation = recommend_regime(&old.result, &new.result, step_number);
    audit_steps.push(recommendation.audit_step);

    (
        TaxComparison {
            taxable_income,
            old_regime: old.result,
            new_regime: new.result,
            recommendation: recommendation.recommendation,
        },
        audit_steps,
    )
}

/// Runs the full payroll calculation for a salary input.
///
/// The input is expected to have passed [`SalaryInput::validate`]; an input
/// that did not may fail with [`crate::error::EngineError::CalculationError`].
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::calculate_payroll;
/// use hrms_engine::config::ConfigLoader;
/// use hrms_engine::models::{SalaryInput, TaxRegime};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/in_payroll").unwrap();
/// let input = SalaryInput::new(Decimal::from(1_000_000), "Mumbai");
///
/// let result = calculate_payroll(&input, loader.config()).unwrap();
/// assert_eq!(result.recommendation.recommended_regime, TaxRegime::New);
/// ```
pub fn calculate_payroll(
    input: &SalaryInput,
    config: &PayrollConfig,
) -> EngineResult<PayrollCalculation> {
    let start_time = Instant::now();
    let mut step_number: u32 = 1;

    let decomposition = decompose_salary(input, config.salary_structure(), step_number)?;
    step_number += decomposition.audit_steps.len() as u32;
    let mut audit_steps = decomposition.audit_steps;
    let breakdown = decomposition.breakdown;

    let (comparison, tax_steps) = compare_regimes(breakdown.taxable_income, config, step_number);
    audit_steps.extend(tax_steps);

    let net_annual_salary = breakdown.taxable_income - comparison.recommendation.total_tax;
    let net_monthly_salary = round_two_places(net_annual_salary / Decimal::from(12));

    let duration_us = start_time.elapsed().as_micros() as u64;

    Ok(PayrollCalculation {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        input: input.clone(),
        breakdown,
        old_regime: comparison.old_regime,
        new_regime: comparison.new_regime,
        recommendation: comparison.recommendation,
        net_annual_salary,
        net_monthly_salary,
        audit_trace: AuditTrace {
            steps: audit_steps,
            warnings: decomposition.warnings,
            duration_us,
        },
    })
}
