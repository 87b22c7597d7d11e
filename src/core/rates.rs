use super::error::{DomainError, ensure_finite, ensure_non_negative};

/// Continuously-compounded equivalent of a nominal annual rate compounded
/// `compounds_per_year` times a year: `ln((1 + r/n)^n)`.
pub fn continuous_rate(nominal_rate: f64, compounds_per_year: u32) -> Result<f64, DomainError> {
    ensure_finite("nominal rate", nominal_rate)?;
    if compounds_per_year == 0 {
        return Err(DomainError::new("compounds per year", 0.0, "must be > 0"));
    }

    let n = compounds_per_year as f64;
    let periodic_growth = 1.0 + nominal_rate / n;
    if periodic_growth <= 0.0 {
        return Err(DomainError::new(
            "nominal rate",
            nominal_rate,
            "must leave 1 + rate / compounds positive",
        ));
    }

    Ok(n * periodic_growth.ln())
}

/// Total accumulated over `horizon` years by a stream paying `base_annual` per
/// year at the start and growing continuously at `rate`.
pub fn integrate_exponential_growth(
    base_annual: f64,
    rate: f64,
    horizon: f64,
) -> Result<f64, DomainError> {
    let base_annual = ensure_non_negative("annual amount", base_annual)?;
    let rate = ensure_finite("growth rate", rate)?;
    let horizon = ensure_non_negative("horizon", horizon)?;
    if rate == 0.0 {
        return Ok(base_annual * horizon);
    }
    Ok(base_annual * (1.0 / rate) * ((rate * horizon).exp() - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-12;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn zero_nominal_rate_is_zero_continuous_rate() {
        for n in [1, 2, 4, 12] {
            assert_eq!(continuous_rate(0.0, n).expect("valid rate"), 0.0);
        }
    }

    #[test]
    fn semi_annual_rate_matches_two_half_year_periods() {
        let cr = continuous_rate(0.0229, 2).expect("valid rate");
        assert_approx(cr, 2.0 * (1.0 + 0.0229 / 2.0_f64).ln());
        assert!(cr < 0.0229);
    }

    #[test]
    fn continuous_rate_rejects_zero_compounding() {
        let err = continuous_rate(0.05, 0).expect_err("must reject n = 0");
        assert_eq!(err.parameter, "compounds per year");
    }

    #[test]
    fn continuous_rate_rejects_total_loss_or_worse() {
        let err = continuous_rate(-1.0, 1).expect_err("ln(0) is undefined");
        assert_eq!(err.parameter, "nominal rate");
        assert!(continuous_rate(-2.5, 2).is_err());
        assert!(continuous_rate(f64::NAN, 1).is_err());
    }

    #[test]
    fn zero_rate_growth_falls_back_to_linear_accumulation() {
        assert_eq!(integrate_exponential_growth(1_200.0, 0.0, 7.5), Ok(9_000.0));
        assert_eq!(integrate_exponential_growth(0.0, 0.0, 3.0), Ok(0.0));
    }

    #[test]
    fn growth_integral_rejects_negative_amounts_and_horizons() {
        let err = integrate_exponential_growth(1_000.0, 0.03, -5.0).expect_err("negative horizon");
        assert_eq!(err.parameter, "horizon");
        let err = integrate_exponential_growth(1_000.0, 0.03, f64::NAN).expect_err("nan horizon");
        assert_eq!(err.parameter, "horizon");
        let err = integrate_exponential_growth(-1_000.0, 0.03, 5.0).expect_err("negative amount");
        assert_eq!(err.parameter, "annual amount");
        let err = integrate_exponential_growth(1_000.0, f64::INFINITY, 5.0).expect_err("inf rate");
        assert_eq!(err.parameter, "growth rate");
    }

    #[test]
    fn growth_integral_over_zero_horizon_is_zero() {
        let total = integrate_exponential_growth(5_000.0, 0.03, 0.0).expect("valid inputs");
        assert_approx(total, 0.0);
    }

    #[test]
    fn growth_integral_matches_closed_form() {
        let r = continuous_rate(0.02, 1).expect("valid rate");
        let total = integrate_exponential_growth(12_000.0, r, 10.0).expect("valid inputs");
        let expected = 12_000.0 * ((r * 10.0).exp() - 1.0) / r;
        assert!((total - expected).abs() < 1e-9);
        // grows faster than linear, slower than paying the final rate all along
        assert!(total > 120_000.0);
        assert!(total < 12_000.0 * 1.02_f64.powi(10) * 10.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_annual_continuous_rate_is_log_one_plus_rate(rate_bp in 1u32..5_000) {
            let rate = rate_bp as f64 / 10_000.0;
            let cr = continuous_rate(rate, 1).expect("valid rate");
            prop_assert!((cr - (1.0 + rate).ln()).abs() < 1e-12);
        }

        #[test]
        fn prop_more_frequent_compounding_gives_higher_continuous_rate(rate_bp in 1u32..3_000) {
            let rate = rate_bp as f64 / 10_000.0;
            let annual = continuous_rate(rate, 1).expect("valid rate");
            let semi_annual = continuous_rate(rate, 2).expect("valid rate");
            let monthly = continuous_rate(rate, 12).expect("valid rate");
            prop_assert!(annual < semi_annual);
            prop_assert!(semi_annual < monthly);
            prop_assert!(monthly < rate);
        }

        #[test]
        fn prop_small_rates_approach_linear_accumulation(
            base in 1u32..100_000,
            horizon_months in 1u32..600
        ) {
            let base = base as f64;
            let horizon = horizon_months as f64 / 12.0;
            let linear = integrate_exponential_growth(base, 0.0, horizon).expect("valid inputs");
            let nearly_flat =
                integrate_exponential_growth(base, 1e-9, horizon).expect("valid inputs");
            prop_assert!((nearly_flat - linear).abs() <= linear * 1e-6);
        }
    }
}
