//! Tax regime models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two mutually exclusive income-tax regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Old regime with fewer, wider slabs.
    Old,
    /// New regime with more, narrower slabs.
    New,
}

impl TaxRegime {
    /// Returns the snake_case name used in JSON and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxRegime::Old => "old",
            TaxRegime::New => "new",
        }
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tax computed under one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRegimeResult {
    /// The regime evaluated.
    pub regime: TaxRegime,
    /// Tax from the slab table alone.
    pub slab_tax: Decimal,
    /// Rebate actually applied (never more than `slab_tax`).
    pub exemptions: Decimal,
    /// Tax after rebate, before cess.
    pub tax_before_cess: Decimal,
    /// Cess on `tax_before_cess`.
    pub cess: Decimal,
    /// Total tax payable (`tax_before_cess + cess`).
    pub tax: Decimal,
}

/// Which regime to choose and what it costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeRecommendation {
    /// The cheaper regime; ties favour the old regime.
    pub recommended_regime: TaxRegime,
    /// Annual tax under the recommended regime.
    pub total_tax: Decimal,
    /// `total_tax / 12`, rounded to two decimal places.
    pub monthly_tax: Decimal,
    /// Absolute difference between the two regimes' tax.
    pub tax_savings: Decimal,
}

/// Both regimes evaluated on the same taxable income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComparison {
    /// The income both regimes were evaluated on.
    pub taxable_income: Decimal,
    /// Old regime result.
    pub old_regime: TaxRegimeResult,
    /// New regime result.
    pub new_regime: TaxRegimeResult,
    /// The recommendation derived from the two results.
    pub recommendation: RegimeRecommendation,
}
