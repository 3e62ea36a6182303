//! Configuration types for payroll and tax rules.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::TaxRegime;

/// Metadata about the rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesMetadata {
    /// A short code identifying the rule set (e.g., "IN-PAYROLL").
    pub code: String,
    /// The human-readable name of the rule set.
    pub name: String,
    /// The version or effective date of the rules.
    pub version: String,
    /// URL to the official documentation the rules were taken from.
    pub source_url: String,
}

/// House rent allowance rates.
#[derive(Debug, Clone, Deserialize)]
pub struct HraRates {
    /// Share of base salary paid as HRA in a metro city.
    pub metro_rate: Decimal,
    /// Share of base salary paid as HRA elsewhere.
    pub non_metro_rate: Decimal,
    /// Cities that qualify for the metro rate.
    pub metro_cities: Vec<String>,
}

/// Provident fund contribution rates, as shares of base salary.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidentFundRates {
    /// The employee's contribution.
    pub employee_rate: Decimal,
    /// The employer's contribution.
    pub employer_rate: Decimal,
}

/// Monthly professional tax rule.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfessionalTaxRule {
    /// Share of annual CTC charged per month before the cap.
    pub rate: Decimal,
    /// The maximum monthly professional tax.
    pub monthly_cap: Decimal,
}

/// Fixed allowance rates, as shares of base salary.
#[derive(Debug, Clone, Deserialize)]
pub struct AllowanceRates {
    /// Medical allowance.
    pub medical_rate: Decimal,
    /// Newspaper allowance.
    pub newspaper_rate: Decimal,
    /// Dress allowance.
    pub dress_rate: Decimal,
}

/// The salary structure used to decompose a CTC, from salary_structure.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct SalaryStructure {
    /// Share of CTC paid as base salary.
    pub base_salary_rate: Decimal,
    /// House rent allowance rates.
    pub hra: HraRates,
    /// Provident fund rates.
    pub provident_fund: ProvidentFundRates,
    /// Professional tax rule.
    pub professional_tax: ProfessionalTaxRule,
    /// Fixed allowance rates.
    pub allowances: AllowanceRates,
}

impl SalaryStructure {
    /// Returns true if the city qualifies for the metro HRA rate.
    ///
    /// Matching ignores ASCII case and surrounding whitespace.
    pub fn is_metro_city(&self, city: &str) -> bool {
        let city = city.trim();
        self.hra
            .metro_cities
            .iter()
            .any(|metro| metro.eq_ignore_ascii_case(city))
    }
}

/// A single band of a slab table.
///
/// The band covers income from `from` up to the next band's `from`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaxSlab {
    /// The income at which this band starts.
    pub from: Decimal,
    /// The marginal rate applied within this band.
    pub rate: Decimal,
}

/// A flat rebate granted below an income limit.
#[derive(Debug, Clone, Deserialize)]
pub struct RebateRule {
    /// Incomes at or below this limit receive the rebate.
    pub income_limit: Decimal,
    /// The flat rebate subtracted from the slab tax.
    pub amount: Decimal,
    /// The statutory section granting the rebate.
    pub section: String,
}

/// Configuration of one tax regime, from regimes/<regime>.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct RegimeConfig {
    /// Which regime this file describes.
    pub regime: TaxRegime,
    /// The human-readable name of the regime.
    pub name: String,
    /// The statutory section defining the slabs.
    pub section: String,
    /// Slab table, ordered by ascending `from`.
    pub slabs: Vec<TaxSlab>,
    /// Rebate rule.
    pub rebate: RebateRule,
    /// Cess applied on the post-rebate tax.
    pub cess_rate: Decimal,
}

impl RegimeConfig {
    /// Checks that the slab table is usable for evaluation.
    ///
    /// The table must be non-empty, start at zero, be strictly ascending, and
    /// every rate (including cess) must lie within `[0, 1]`.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidConfig {
            message: format!("{} regime: {}", self.regime, message),
        };

        let first = self
            .slabs
            .first()
            .ok_or_else(|| invalid("slab table is empty".to_string()))?;
        if first.from != Decimal::ZERO {
            return Err(invalid(format!(
                "first slab must start at 0, found {}",
                first.from
            )));
        }

        for pair in self.slabs.windows(2) {
            if pair[1].from <= pair[0].from {
                return Err(invalid(format!(
                    "slabs must be strictly ascending ({} follows {})",
                    pair[1].from, pair[0].from
                )));
            }
        }

        let in_unit_range = |rate: Decimal| rate >= Decimal::ZERO && rate <= Decimal::ONE;
        if let Some(slab) = self.slabs.iter().find(|s| !in_unit_range(s.rate)) {
            return Err(invalid(format!(
                "slab rate {} at {} is outside [0, 1]",
                slab.rate, slab.from
            )));
        }
        if !in_unit_range(self.cess_rate) {
            return Err(invalid(format!(
                "cess rate {} is outside [0, 1]",
                self.cess_rate
            )));
        }
        if self.rebate.amount < Decimal::ZERO {
            return Err(invalid("rebate amount is negative".to_string()));
        }

        Ok(())
    }
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    metadata: RulesMetadata,
    salary_structure: SalaryStructure,
    old_regime: RegimeConfig,
    new_regime: RegimeConfig,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    ///
    /// Exactly one configuration per regime is required and each must pass
    /// [`RegimeConfig::validate`].
    pub fn new(
        metadata: RulesMetadata,
        salary_structure: SalaryStructure,
        regimes: Vec<RegimeConfig>,
    ) -> EngineResult<Self> {
        let mut old_regime = None;
        let mut new_regime = None;

        for regime in regimes {
            regime.validate()?;
            let slot = match regime.regime {
                TaxRegime::Old => &mut old_regime,
                TaxRegime::New => &mut new_regime,
            };
            if slot.is_some() {
                return Err(EngineError::InvalidConfig {
                    message: format!("{} regime is configured more than once", regime.regime),
                });
            }
            *slot = Some(regime);
        }

        let missing = |regime: TaxRegime| EngineError::InvalidConfig {
            message: format!("{} regime is not configured", regime),
        };

        Ok(Self {
            metadata,
            salary_structure,
            old_regime: old_regime.ok_or_else(|| missing(TaxRegime::Old))?,
            new_regime: new_regime.ok_or_else(|| missing(TaxRegime::New))?,
        })
    }

    /// Returns the rule set metadata.
    pub fn rules(&self) -> &RulesMetadata {
        &self.metadata
    }

    /// Returns the salary structure.
    pub fn salary_structure(&self) -> &SalaryStructure {
        &self.salary_structure
    }

    /// Returns the configuration of the given regime.
    pub fn regime(&self, regime: TaxRegime) -> &RegimeConfig {
        match regime {
            TaxRegime::Old => &self.old_regime,
            TaxRegime::New => &self.new_regime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn slab(from: &str, rate: &str) -> TaxSlab {
        TaxSlab {
            from: dec(from),
            rate: dec(rate),
        }
    }

    fn regime(regime: TaxRegime, slabs: Vec<TaxSlab>) -> RegimeConfig {
        RegimeConfig {
            regime,
            name: format!("{} regime", regime),
            section: "test".to_string(),
            slabs,
            rebate: RebateRule {
                income_limit: dec("500000"),
                amount: dec("12500"),
                section: "87A".to_string(),
            },
            cess_rate: dec("0.04"),
        }
    }

    fn structure() -> SalaryStructure {
        SalaryStructure {
            base_salary_rate: dec("0.50"),
            hra: HraRates {
                metro_rate: dec("0.50"),
                non_metro_rate: dec("0.40"),
                metro_cities: vec!["Mumbai".to_string(), "Bengaluru".to_string()],
            },
            provident_fund: ProvidentFundRates {
                employee_rate: dec("0.12"),
                employer_rate: dec("0.12"),
            },
            professional_tax: ProfessionalTaxRule {
                rate: dec("0.002"),
                monthly_cap: dec("200"),
            },
            allowances: AllowanceRates {
                medical_rate: dec("0.10"),
                newspaper_rate: dec("0.04"),
                dress_rate: dec("0.04"),
            },
        }
    }

    fn metadata() -> RulesMetadata {
        RulesMetadata {
            code: "TEST".to_string(),
            name: "Test rules".to_string(),
            version: "1".to_string(),
            source_url: "https://example.invalid".to_string(),
        }
    }

    #[test]
    fn test_metro_match_ignores_case_and_whitespace() {
        let structure = structure();
        assert!(structure.is_metro_city("mumbai"));
        assert!(structure.is_metro_city("  BENGALURU "));
        assert!(!structure.is_metro_city("Pune"));
        assert!(!structure.is_metro_city(""));
    }

    #[test]
    fn test_valid_regime_passes() {
        let config = regime(
            TaxRegime::Old,
            vec![slab("0", "0"), slab("250000", "0.05"), slab("500000", "0.20")],
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_slab_table_is_rejected() {
        let config = regime(TaxRegime::Old, vec![]);
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_first_slab_must_start_at_zero() {
        let config = regime(TaxRegime::New, vec![slab("100", "0.05")]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("first slab must start at 0"));
    }

    #[test]
    fn test_slabs_must_ascend() {
        let config = regime(
            TaxRegime::New,
            vec![slab("0", "0"), slab("500000", "0.1"), slab("300000", "0.05")],
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("strictly ascending"));
    }

    #[test]
    fn test_rate_above_one_is_rejected() {
        let config = regime(TaxRegime::New, vec![slab("0", "1.5")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_payroll_config_requires_both_regimes() {
        let result = PayrollConfig::new(
            metadata(),
            structure(),
            vec![regime(TaxRegime::Old, vec![slab("0", "0")])],
        );
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: new regime is not configured"
        );
    }

    #[test]
    fn test_payroll_config_rejects_duplicate_regime() {
        let result = PayrollConfig::new(
            metadata(),
            structure(),
            vec![
                regime(TaxRegime::Old, vec![slab("0", "0")]),
                regime(TaxRegime::Old, vec![slab("0", "0")]),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_payroll_config_looks_up_regimes() {
        let config = PayrollConfig::new(
            metadata(),
            structure(),
            vec![
                regime(TaxRegime::New, vec![slab("0", "0")]),
                regime(TaxRegime::Old, vec![slab("0", "0")]),
            ],
        )
        .unwrap();
        assert_eq!(config.regime(TaxRegime::Old).regime, TaxRegime::Old);
        assert_eq!(config.regime(TaxRegime::New).regime, TaxRegime::New);
    }
}
