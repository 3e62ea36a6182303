//! Income-tax regime evaluation.
//!
//! Each regime is a table of `(from, rate)` bands plus a flat rebate below an
//! income limit and a cess on the post-rebate tax.

use rust_decimal::Decimal;

use crate::config::{RegimeConfig, TaxSlab};
use crate::models::{AuditStep, TaxRegimeResult};

/// The result of evaluating one regime, including the audit steps.
#[derive(Debug, Clone)]
pub struct TaxRegimeEvaluation {
    /// The computed tax.
    pub result: TaxRegimeResult,
    /// Slab, rebate and cess steps, in that order.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes tax from a slab table alone.
///
/// Each band runs from its `from` up to the next band's `from` (the last band
/// is open-ended) and taxes the part of `income` falling inside it at the
/// band's rate. Incomes at or below zero pay nothing.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::slab_tax;
/// use hrms_engine::config::TaxSlab;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let slabs = vec![
///     TaxSlab { from: Decimal::ZERO, rate: Decimal::ZERO },
///     TaxSlab { from: Decimal::from(250_000), rate: Decimal::from_str("0.05").unwrap() },
///     TaxSlab { from: Decimal::from(500_000), rate: Decimal::from_str("0.20").unwrap() },
/// ];
///
/// assert_eq!(slab_tax(Decimal::from(600_000), &slabs), Decimal::from(32_500));
/// ```
pub fn slab_tax(income: Decimal, slabs: &[TaxSlab]) -> Decimal {
    slabs
        .iter()
        .enumerate()
        .take_while(|(_, slab)| income > slab.from)
        .map(|(index, slab)| {
            let upper = match slabs.get(index + 1) {
                Some(next) => next.from.min(income),
                None => income,
            };
            (upper - slab.from) * slab.rate
        })
        .sum()
}

/// Evaluates a regime on a taxable income.
///
/// The slab tax is reduced by the rebate when `taxable_income` is at or below
/// the rebate's income limit (never below zero), then cess is added on the
/// remainder.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::evaluate_regime;
/// use hrms_engine::config::ConfigLoader;
/// use hrms_engine::models::TaxRegime;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/in_payroll").unwrap();
/// let old = evaluate_regime(Decimal::from(600_000), loader.regime(TaxRegime::Old), 1);
///
/// assert_eq!(old.result.tax_before_cess, Decimal::from(32_500));
/// assert_eq!(old.result.tax, Decimal::from(33_800));
/// ```
pub fn evaluate_regime(
    taxable_income: Decimal,
    regime: &RegimeConfig,
    step_number: u32,
) -> TaxRegimeEvaluation {
    let rule_prefix = regime.regime.as_str();

    // Slab tax
    let gross_tax = slab_tax(taxable_income, &regime.slabs);
    let bands_applied = regime
        .slabs
        .iter()
        .filter(|slab| taxable_income > slab.from)
        .count();
    let slab_step = AuditStep {
        step_number,
        rule_id: format!("{}_regime_slabs", rule_prefix),
        rule_name: format!("{} Slabs", regime.name),
        reference: regime.section.clone(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
        }),
        output: serde_json::json!({
            "slab_tax": gross_tax.normalize().to_string(),
            "bands_applied": bands_applied,
        }),
        reasoning: format!(
            "{} bands applied to {} = {}",
            bands_applied,
            taxable_income.normalize(),
            gross_tax.normalize()
        ),
    };

    // Rebate
    let eligible = taxable_income <= regime.rebate.income_limit;
    let exemptions = if eligible {
        regime.rebate.amount.min(gross_tax)
    } else {
        Decimal::ZERO
    };
    let tax_before_cess = gross_tax - exemptions;
    let rebate_step = AuditStep {
        step_number: step_number + 1,
        rule_id: format!("{}_regime_rebate", rule_prefix),
        rule_name: format!("{} Rebate", regime.name),
        reference: regime.rebate.section.clone(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "income_limit": regime.rebate.income_limit.normalize().to_string(),
            "slab_tax": gross_tax.normalize().to_string(),
        }),
        output: serde_json::json!({
            "eligible": eligible,
            "rebate": exemptions.normalize().to_string(),
            "tax_before_cess": tax_before_cess.normalize().to_string(),
        }),
        reasoning: if eligible {
            format!(
                "Income {} <= {}: max(0, {} - {}) = {}",
                taxable_income.normalize(),
                regime.rebate.income_limit.normalize(),
                gross_tax.normalize(),
                regime.rebate.amount.normalize(),
                tax_before_cess.normalize()
            )
        } else {
            format!(
                "Income {} exceeds rebate limit {} - no rebate",
                taxable_income.normalize(),
                regime.rebate.income_limit.normalize()
            )
        },
    };

    // Cess
    let cess = tax_before_cess * regime.cess_rate;
    let tax = tax_before_cess + cess;
    let cess_step = AuditStep {
        step_number: step_number + 2,
        rule_id: format!("{}_regime_cess", rule_prefix),
        rule_name: "Health and Education Cess".to_string(),
        reference: "Finance Act s.2(11)".to_string(),
        input: serde_json::json!({
            "tax_before_cess": tax_before_cess.normalize().to_string(),
            "cess_rate": regime.cess_rate.normalize().to_string(),
        }),
        output: serde_json::json!({
            "cess": cess.normalize().to_string(),
            "tax": tax.normalize().to_string(),
        }),
        reasoning: format!(
            "{} + ({} x {}) = {}",
            tax_before_cess.normalize(),
            tax_before_cess.normalize(),
            regime.cess_rate.normalize(),
            tax.normalize()
        ),
    };

    TaxRegimeEvaluation {
        result: TaxRegimeResult {
            regime: regime.regime,
            slab_tax: gross_tax,
            exemptions,
            tax_before_cess,
            cess,
            tax,
        },
        audit_steps: vec![slab_step, rebate_step, cess_step],
    }
}
