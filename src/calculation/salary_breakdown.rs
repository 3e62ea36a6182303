//! CTC decomposition functionality.
//!
//! This module splits an annual CTC into base salary, HRA, provident fund,
//! professional tax, fixed allowances and a balancing "other allowance", and
//! derives gross salary and taxable income from them.

use rust_decimal::Decimal;
use tracing::warn;

use crate::config::SalaryStructure;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, SalaryBreakdown, SalaryInput};

/// Warning code emitted when the balancing allowance is clamped to zero.
pub const OTHER_ALLOWANCE_CLAMPED: &str = "OTHER_ALLOWANCE_CLAMPED";

/// The result of decomposing a CTC, including the breakdown and audit steps.
#[derive(Debug, Clone)]
pub struct SalaryBreakdownResult {
    /// The salary components.
    pub breakdown: SalaryBreakdown,
    /// One audit step per component rule, numbered from the given step.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while decomposing.
    pub warnings: Vec<AuditWarning>,
}

/// Decomposes a CTC into salary components.
///
/// Percentages are taken from the salary structure:
///
/// | Component | Formula |
/// |---|---|
/// | Base | `ctc * base_salary_rate` |
/// | HRA | `base * metro_rate` for metro cities, else `base * non_metro_rate` |
/// | PF | `base * employee_rate + base * employer_rate` |
/// | Professional tax (monthly) | `min(monthly_cap, ctc * rate)` |
/// | Medical, newspaper, dress | `base * <rate>` |
/// | Other | `ctc - (base + hra + pf + pt*12 + medical + newspaper + dress)`, at least 0 |
/// | Gross | `base + hra + medical + newspaper + dress + other + joining_bonus + variable_salary` |
/// | Taxable | `gross - (pf + pt*12)` |
///
/// The input is not validated here; callers run [`SalaryInput::validate`]
/// first. A negative balancing allowance is clamped to zero and reported as
/// an [`AuditWarning`] rather than an error.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if the gross salary does not fit
/// in a `Decimal`, which only happens for inputs that skipped validation.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::decompose_salary;
/// use hrms_engine::config::ConfigLoader;
/// use hrms_engine::models::SalaryInput;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/in_payroll").unwrap();
/// let input = SalaryInput::new(Decimal::from(1_000_000), "Mumbai");
///
/// let result = decompose_salary(&input, loader.salary_structure(), 1).unwrap();
/// assert_eq!(result.breakdown.base_salary, Decimal::from(500_000));
/// assert_eq!(result.breakdown.hra, Decimal::from(250_000));
/// ```
pub fn decompose_salary(
    input: &SalaryInput,
    structure: &SalaryStructure,
    step_number: u32,
) -> EngineResult<SalaryBreakdownResult> {
    let mut steps = Vec::with_capacity(7);
    let mut warnings = Vec::new();
    let mut next_step = step_number;
    let mut push = |rule_id: &str,
                    rule_name: &str,
                    reference: &str,
                    input: serde_json::Value,
                    output: serde_json::Value,
                    reasoning: String| {
        steps.push(AuditStep {
            step_number: next_step,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            reference: reference.to_string(),
            input,
            output,
            reasoning,
        });
        next_step += 1;
    };

    let ctc = input.ctc;

    let base_salary = ctc * structure.base_salary_rate;
    push(
        "base_salary",
        "Base Salary",
        "salary_structure.base_salary_rate",
        serde_json::json!({ "ctc": ctc.normalize().to_string() }),
        serde_json::json!({ "base_salary": base_salary.normalize().to_string() }),
        format!(
            "{} x {} = {}",
            ctc.normalize(),
            structure.base_salary_rate.normalize(),
            base_salary.normalize()
        ),
    );

    let is_metro = structure.is_metro_city(&input.city);
    let hra_rate = if is_metro {
        structure.hra.metro_rate
    } else {
        structure.hra.non_metro_rate
    };
    let hra = base_salary * hra_rate;
    push(
        "hra",
        "House Rent Allowance",
        "10(13A)",
        serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "city": input.city,
        }),
        serde_json::json!({
            "hra": hra.normalize().to_string(),
            "is_metro": is_metro,
            "rate": hra_rate.normalize().to_string(),
        }),
        format!(
            "{} city '{}': {} x {} = {}",
            if is_metro { "Metro" } else { "Non-metro" },
            input.city.trim(),
            base_salary.normalize(),
            hra_rate.normalize(),
            hra.normalize()
        ),
    );

    let employee_pf = base_salary * structure.provident_fund.employee_rate;
    let employer_pf = base_salary * structure.provident_fund.employer_rate;
    let pf = employee_pf + employer_pf;
    push(
        "provident_fund",
        "Provident Fund",
        "EPF Act s.6",
        serde_json::json!({ "base_salary": base_salary.normalize().to_string() }),
        serde_json::json!({
            "employee_pf": employee_pf.normalize().to_string(),
            "employer_pf": employer_pf.normalize().to_string(),
            "pf": pf.normalize().to_string(),
        }),
        format!(
            "{} + {} = {}",
            employee_pf.normalize(),
            employer_pf.normalize(),
            pf.normalize()
        ),
    );

    let uncapped_pt = ctc * structure.professional_tax.rate;
    let cap_applied = uncapped_pt > structure.professional_tax.monthly_cap;
    let professional_tax = uncapped_pt.min(structure.professional_tax.monthly_cap);
    let professional_tax_annual = professional_tax * Decimal::from(12);
    push(
        "professional_tax",
        "Professional Tax",
        "Article 276",
        serde_json::json!({ "ctc": ctc.normalize().to_string() }),
        serde_json::json!({
            "monthly": professional_tax.normalize().to_string(),
            "annual": professional_tax_annual.normalize().to_string(),
            "cap_applied": cap_applied,
        }),
        if cap_applied {
            format!(
                "{} x {} = {} (capped at {} per month)",
                ctc.normalize(),
                structure.professional_tax.rate.normalize(),
                uncapped_pt.normalize(),
                structure.professional_tax.monthly_cap.normalize()
            )
        } else {
            format!(
                "{} x {} = {} per month",
                ctc.normalize(),
                structure.professional_tax.rate.normalize(),
                professional_tax.normalize()
            )
        },
    );

    let allowances = &structure.allowances;
    let medical_allowance = base_salary * allowances.medical_rate;
    let newspaper_allowance = base_salary * allowances.newspaper_rate;
    let dress_allowance = base_salary * allowances.dress_rate;
    push(
        "fixed_allowances",
        "Fixed Allowances",
        "salary_structure.allowances",
        serde_json::json!({ "base_salary": base_salary.normalize().to_string() }),
        serde_json::json!({
            "medical": medical_allowance.normalize().to_string(),
            "newspaper": newspaper_allowance.normalize().to_string(),
            "dress": dress_allowance.normalize().to_string(),
        }),
        format!(
            "medical {} + newspaper {} + dress {}",
            medical_allowance.normalize(),
            newspaper_allowance.normalize(),
            dress_allowance.normalize()
        ),
    );

    let fixed_components = base_salary
        + hra
        + pf
        + professional_tax_annual
        + medical_allowance
        + newspaper_allowance
        + dress_allowance;
    let unclamped_other = ctc - fixed_components;
    let other_allowance_clamped = unclamped_other < Decimal::ZERO;
    let other_allowance = unclamped_other.max(Decimal::ZERO);
    push(
        "other_allowance",
        "Other Allowance",
        "salary_structure",
        serde_json::json!({
            "ctc": ctc.normalize().to_string(),
            "fixed_components": fixed_components.normalize().to_string(),
        }),
        serde_json::json!({
            "other_allowance": other_allowance.normalize().to_string(),
            "clamped": other_allowance_clamped,
        }),
        if other_allowance_clamped {
            format!(
                "{} - {} = {} (clamped to 0)",
                ctc.normalize(),
                fixed_components.normalize(),
                unclamped_other.normalize()
            )
        } else {
            format!(
                "{} - {} = {}",
                ctc.normalize(),
                fixed_components.normalize(),
                other_allowance.normalize()
            )
        },
    );

    if other_allowance_clamped {
        warn!(
            ctc = %ctc,
            fixed_components = %fixed_components,
            "Fixed salary components exceed CTC; other allowance clamped to zero"
        );
        warnings.push(AuditWarning {
            code: OTHER_ALLOWANCE_CLAMPED.to_string(),
            message: format!(
                "Fixed components ({}) exceed CTC ({}); other allowance set to 0",
                fixed_components.normalize(),
                ctc.normalize()
            ),
            severity: "medium".to_string(),
        });
    }

    let gross_salary = checked_sum(
        "gross_salary",
        &[
            base_salary,
            hra,
            medical_allowance,
            newspaper_allowance,
            dress_allowance,
            other_allowance,
            input.joining_bonus,
            input.variable_salary,
        ],
    )?;
    let taxable_income = gross_salary - (pf + professional_tax_annual);
    push(
        "gross_and_taxable",
        "Gross Salary and Taxable Income",
        "salary_structure",
        serde_json::json!({
            "joining_bonus": input.joining_bonus.normalize().to_string(),
            "variable_salary": input.variable_salary.normalize().to_string(),
        }),
        serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "taxable_income": taxable_income.normalize().to_string(),
        }),
        format!(
            "gross {} - (pf {} + professional tax {}) = {}",
            gross_salary.normalize(),
            pf.normalize(),
            professional_tax_annual.normalize(),
            taxable_income.normalize()
        ),
    );

    Ok(SalaryBreakdownResult {
        breakdown: SalaryBreakdown {
            base_salary,
            hra,
            is_metro,
            employee_pf,
            employer_pf,
            pf,
            professional_tax,
            professional_tax_annual,
            medical_allowance,
            newspaper_allowance,
            dress_allowance,
            other_allowance,
            other_allowance_clamped,
            joining_bonus: input.joining_bonus,
            variable_salary: input.variable_salary,
            gross_salary,
            taxable_income,
        },
        audit_steps: steps,
        warnings,
    })
}

/// Adds amounts, failing instead of panicking when the total overflows.
fn checked_sum(label: &str, amounts: &[Decimal]) -> EngineResult<Decimal> {
    amounts
        .iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(*amount))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("{} overflowed", label),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn structure() -> SalaryStructure {
        ConfigLoader::load("./config/in_payroll")
            .expect("Failed to load config")
            .salary_structure()
            .clone()
    }

    /// SB-001: 10 lakh CTC in Mumbai
    #[test]
    fn test_mumbai_ten_lakh_components() {
        let input = SalaryInput::new(dec("1000000"), "Mumbai");
        let b = decompose_salary(&input, &structure(), 1).unwrap().breakdown;

        assert_eq!(b.base_salary, dec("500000"));
        assert_eq!(b.hra, dec("250000"));
        assert!(b.is_metro);
        assert_eq!(b.employee_pf, dec("60000"));
        assert_eq!(b.employer_pf, dec("60000"));
        assert_eq!(b.pf, dec("120000"));
        assert_eq!(b.professional_tax, dec("200"));
        assert_eq!(b.professional_tax_annual, dec("2400"));
        assert_eq!(b.medical_allowance, dec("50000"));
        assert_eq!(b.newspaper_allowance, dec("20000"));
        assert_eq!(b.dress_allowance, dec("20000"));
        assert_eq!(b.other_allowance, dec("37600"));
        assert!(!b.other_allowance_clamped);
        assert_eq!(b.gross_salary, dec("877600"));
        assert_eq!(b.taxable_income, dec("755200"));
    }

    /// SB-002: non-metro city uses the 40% HRA rate
    #[test]
    fn test_non_metro_hra() {
        let input = SalaryInput::new(dec("1000000"), "Pune");
        let b = decompose_salary(&input, &structure(), 1).unwrap().breakdown;

        assert!(!b.is_metro);
        assert_eq!(b.hra, dec("200000"));
        assert_eq!(b.other_allowance, dec("87600"));
    }

    /// SB-003: professional tax below the cap
    #[test]
    fn test_professional_tax_below_cap() {
        let input = SalaryInput::new(dec("60000"), "Delhi");
        let b = decompose_salary(&input, &structure(), 1).unwrap().breakdown;

        assert_eq!(b.professional_tax, dec("120"));
        assert_eq!(b.professional_tax_annual, dec("1440"));
    }

    #[test]
    fn test_bonus_and_variable_added_to_gross_only() {
        let mut input = SalaryInput::new(dec("1000000"), "Mumbai");
        input.joining_bonus = dec("50000");
        input.variable_salary = dec("100000");
        let b = decompose_salary(&input, &structure(), 1).unwrap().breakdown;

        assert_eq!(b.other_allowance, dec("37600"));
        assert_eq!(b.gross_salary, dec("1027600"));
        assert_eq!(b.taxable_income, dec("905200"));
    }

    #[test]
    fn test_fixed_components_balance_to_ctc() {
        let input = SalaryInput::new(dec("1234567.89"), "Kolkata");
        let b = decompose_salary(&input, &structure(), 1).unwrap().breakdown;

        let total = b.base_salary
            + b.hra
            + b.pf
            + b.professional_tax_annual
            + b.medical_allowance
            + b.newspaper_allowance
            + b.dress_allowance
            + b.other_allowance;
        assert_eq!(total, input.ctc);
    }

    #[test]
    fn test_other_allowance_clamped_with_warning() {
        let mut structure = structure();
        structure.base_salary_rate = dec("0.90");

        let input = SalaryInput::new(dec("1000000"), "Mumbai");
        let result = decompose_salary(&input, &structure, 1).unwrap();

        assert_eq!(result.breakdown.other_allowance, Decimal::ZERO);
        assert!(result.breakdown.other_allowance_clamped);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, OTHER_ALLOWANCE_CLAMPED);
    }

    #[test]
    fn test_audit_steps_are_sequential_from_start() {
        let input = SalaryInput::new(dec("800000"), "Chennai");
        let result = decompose_salary(&input, &structure(), 4).unwrap();

        let numbers: Vec<u32> = result.audit_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(result.audit_steps[0].rule_id, "base_salary");
        assert_eq!(result.audit_steps[6].rule_id, "gross_and_taxable");
    }

    #[test]
    fn test_professional_tax_audit_reports_cap() {
        let input = SalaryInput::new(dec("1000000"), "Mumbai");
        let result = decompose_salary(&input, &structure(), 1).unwrap();

        let step = result
            .audit_steps
            .iter()
            .find(|s| s.rule_id == "professional_tax")
            .unwrap();
        assert_eq!(step.output["cap_applied"].as_bool(), Some(true));
        assert!(step.reasoning.contains("capped at 200"));
    }

    #[test]
    fn test_city_with_whitespace_and_case_is_metro() {
        let input = SalaryInput::new(dec("500000"), "  bangalore ");
        let b = decompose_salary(&input, &structure(), 1).unwrap().breakdown;

        assert!(b.is_metro);
        assert_eq!(b.hra, dec("125000"));
    }

    #[test]
    fn test_gross_overflow_is_a_calculation_error() {
        let mut input = SalaryInput::new(Decimal::MAX, "Mumbai");
        input.joining_bonus = Decimal::MAX;

        match decompose_salary(&input, &structure(), 1) {
            Err(EngineError::CalculationError { message }) => {
                assert!(message.contains("gross_salary"));
            }
            other => panic!("Expected CalculationError, got {:?}", other),
        }
    }
}
