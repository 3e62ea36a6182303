//! Property tests for the salary decomposition, regime evaluation and
//! worked-time arithmetic.

use std::sync::OnceLock;

use chrono::NaiveTime;
use proptest::prelude::*;
use rust_decimal::Decimal;

use hrms_engine::calculation::{
    calculate_payroll, calculate_worked_time, decompose_salary, evaluate_regime,
};
use hrms_engine::config::{ConfigLoader, PayrollConfig};
use hrms_engine::models::{SalaryInput, TaxRegime};

fn config() -> &'static PayrollConfig {
    static CONFIG: OnceLock<PayrollConfig> = OnceLock::new();
    CONFIG.get_or_init(|| {
        ConfigLoader::load("./config/in_payroll")
            .expect("Failed to load config")
            .config()
            .clone()
    })
}

/// Amounts in rupees with paise, up to one crore.
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000).prop_map(|paise| Decimal::new(paise, 2))
}

fn city() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Mumbai".to_string()),
        Just("bengaluru".to_string()),
        Just("Jaipur".to_string()),
        Just(String::new()),
    ]
}

fn clock_time() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60, 0u32..60)
        .prop_map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap_or(NaiveTime::MIN))
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(200))]

    #[test]
    fn prop_components_balance_to_ctc(ctc in amount(), city in city()) {
        let input = SalaryInput::new(ctc, city);
        let b = decompose_salary(&input, config().salary_structure(), 1)
            .expect("validated input decomposes")
            .breakdown;

        if !b.other_allowance_clamped {
            let total = b.base_salary
                + b.hra
                + b.pf
                + b.professional_tax_annual
                + b.medical_allowance
                + b.newspaper_allowance
                + b.dress_allowance
                + b.other_allowance;
            prop_assert_eq!(total, ctc);
        }
    }

    #[test]
    fn prop_other_allowance_never_negative(ctc in amount(), city in city()) {
        let input = SalaryInput::new(ctc, city);
        let b = decompose_salary(&input, config().salary_structure(), 1)
            .expect("validated input decomposes")
            .breakdown;

        prop_assert!(b.other_allowance >= Decimal::ZERO);
    }

    #[test]
    fn prop_gross_at_least_base(
        ctc in amount(),
        bonus in 0i64..10_000_000,
        variable in 0i64..10_000_000,
        city in city(),
    ) {
        let mut input = SalaryInput::new(ctc, city);
        input.joining_bonus = Decimal::from(bonus);
        input.variable_salary = Decimal::from(variable);
        let b = decompose_salary(&input, config().salary_structure(), 1)
            .expect("validated input decomposes")
            .breakdown;

        prop_assert!(b.gross_salary >= b.base_salary);
    }

    #[test]
    fn prop_tax_non_decreasing_in_income(a in amount(), b in amount()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        for regime in [TaxRegime::Old, TaxRegime::New] {
            let regime_config = config().regime(regime);
            let low_tax = evaluate_regime(low, regime_config, 1).result.tax;
            let high_tax = evaluate_regime(high, regime_config, 1).result.tax;
            prop_assert!(
                low_tax <= high_tax,
                "{} regime: tax({}) = {} > tax({}) = {}",
                regime, low, low_tax, high, high_tax
            );
        }
    }

    #[test]
    fn prop_recommendation_is_never_dearer(ctc in amount(), city in city()) {
        let result = calculate_payroll(&SalaryInput::new(ctc, city), config())
            .expect("validated input calculates");
        let recommendation = &result.recommendation;

        let expected = if result.old_regime.tax <= result.new_regime.tax {
            TaxRegime::Old
        } else {
            TaxRegime::New
        };
        prop_assert_eq!(recommendation.recommended_regime, expected);
        prop_assert!(recommendation.total_tax <= result.old_regime.tax);
        prop_assert!(recommendation.total_tax <= result.new_regime.tax);
    }

    #[test]
    fn prop_worked_time_within_a_day(in_time in clock_time(), out_time in clock_time()) {
        let worked = calculate_worked_time(in_time, out_time);

        prop_assert!(worked.minutes >= 0);
        prop_assert!(worked.minutes < 24 * 60);
        prop_assert!(worked.hours >= Decimal::ZERO);
        prop_assert_eq!(worked.crossed_midnight, out_time < in_time);
    }
}
