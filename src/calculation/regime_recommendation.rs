//! Regime recommendation functionality.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AuditStep, RegimeRecommendation, TaxRegimeResult};

/// The result of recommending a regime, including the audit step.
#[derive(Debug, Clone)]
pub struct RegimeRecommendationResult {
    /// The recommendation.
    pub recommendation: RegimeRecommendation,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// Rounds an amount to two decimal places, midpoint away from zero.
pub fn round_two_places(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Picks the cheaper of two evaluated regimes.
///
/// The old regime wins ties. `monthly_tax` is the recommended regime's tax
/// divided by twelve and rounded with [`round_two_places`].
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::recommend_regime;
/// use hrms_engine::models::{TaxRegime, TaxRegimeResult};
/// use rust_decimal::Decimal;
///
/// let result = |regime, tax: i64| TaxRegimeResult {
///     regime,
///     slab_tax: Decimal::from(tax),
///     exemptions: Decimal::ZERO,
///     tax_before_cess: Decimal::from(tax),
///     cess: Decimal::ZERO,
///     tax: Decimal::from(tax),
/// };
///
/// let chosen = recommend_regime(&result(TaxRegime::Old, 1200), &result(TaxRegime::New, 1200), 1);
/// assert_eq!(chosen.recommendation.recommended_regime, TaxRegime::Old);
/// assert_eq!(chosen.recommendation.monthly_tax, Decimal::from(100));
/// ```
pub fn recommend_regime(
    old: &TaxRegimeResult,
    new: &TaxRegimeResult,
    step_number: u32,
) -> RegimeRecommendationResult {
    let (recommended, other) = if old.tax <= new.tax {
        (old, new)
    } else {
        (new, old)
    };

    let total_tax = recommended.tax;
    let monthly_tax = round_two_places(total_tax / Decimal::from(12));
    let tax_savings = (old.tax - new.tax).abs();

    let audit_step = AuditStep {
        step_number,
        rule_id: "regime_recommendation".to_string(),
        rule_name: "Regime Recommendation".to_string(),
        reference: "115BAC(6)".to_string(),
        input: serde_json::json!({
            "old_tax": old.tax.normalize().to_string(),
            "new_tax": new.tax.normalize().to_string(),
        }),
        output: serde_json::json!({
            "recommended_regime": recommended.regime,
            "monthly_tax": monthly_tax.normalize().to_string(),
            "tax_savings": tax_savings.normalize().to_string(),
        }),
        reasoning: if tax_savings.is_zero() {
            format!(
                "Both regimes cost {} - old regime kept on a tie",
                total_tax.normalize()
            )
        } else {
            format!(
                "{} regime {} < {} regime {} - saves {}",
                recommended.regime,
                total_tax.normalize(),
                other.regime,
                other.tax.normalize(),
                tax_savings.normalize()
            )
        },
    };

    RegimeRecommendationResult {
        recommendation: RegimeRecommendation {
            recommended_regime: recommended.regime,
            total_tax,
            monthly_tax,
            tax_savings,
        },
        audit_step,
    }
}
