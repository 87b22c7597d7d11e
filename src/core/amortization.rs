use serde::Serialize;

use super::error::{DomainError, ensure_non_negative, ensure_term};
use super::rates::continuous_rate;

/// Mortgage interest compounds semi-annually in the modelled jurisdiction.
pub const MORTGAGE_COMPOUNDS_PER_YEAR: u32 = 2;

/// Split of everything paid on a mortgage up to some point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgagePosition {
    pub interest_paid: f64,
    pub principal_paid: f64,
    pub remaining_balance: f64,
}

impl MortgagePosition {
    pub fn total_paid(self) -> f64 {
        self.interest_paid + self.principal_paid
    }
}

/// Constant annual payment that retires `principal` over `term_years`, paid
/// continuously against a semi-annually compounded nominal rate.
pub fn annual_mortgage_payment(
    principal: f64,
    nominal_rate: f64,
    term_years: u32,
) -> Result<f64, DomainError> {
    let principal = ensure_non_negative("mortgage principal", principal)?;
    let term = ensure_term(term_years)?;
    let cr = continuous_rate(nominal_rate, MORTGAGE_COMPOUNDS_PER_YEAR)?;
    Ok(payment_for(principal, cr, term))
}

fn payment_for(principal: f64, cr: f64, term: f64) -> f64 {
    if cr == 0.0 {
        return principal / term;
    }
    let growth = (cr * term).exp();
    principal * cr * growth / (growth - 1.0)
}

/// Interest paid, principal repaid and outstanding balance after
/// `elapsed_years`. Time past the end of the term accrues nothing further.
pub fn mortgage_balance_at(
    elapsed_years: f64,
    principal: f64,
    nominal_rate: f64,
    term_years: u32,
) -> Result<MortgagePosition, DomainError> {
    let elapsed = ensure_non_negative("elapsed years", elapsed_years)?;
    let principal = ensure_non_negative("mortgage principal", principal)?;
    let term = ensure_term(term_years)?;
    let cr = continuous_rate(nominal_rate, MORTGAGE_COMPOUNDS_PER_YEAR)?;

    let years = elapsed.min(term);
    let payment = payment_for(principal, cr, term);
    let total_paid = payment * years;
    let interest_paid = if cr == 0.0 {
        0.0
    } else {
        (principal * cr - payment) * ((cr * years).exp() - 1.0) / cr + payment * years
    };
    let principal_paid = total_paid - interest_paid;

    Ok(MortgagePosition {
        interest_paid,
        principal_paid,
        remaining_balance: principal - principal_paid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_rel(actual: f64, expected: f64, rtol: f64) {
        assert!(
            (actual - expected).abs() <= expected.abs() * rtol,
            "expected {expected}, got {actual}, relative tolerance {rtol}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn monthly_payment_matches_lender_calculators() {
        for (principal, rate, expected_monthly) in [
            (150_000.0, 0.0229, 656.36),
            (150_000.0, 0.0459, 837.73),
            (250_000.0, 0.0459, 1_396.22),
        ] {
            let annual = annual_mortgage_payment(principal, rate, 25).expect("valid mortgage");
            assert_rel(annual / 12.0, expected_monthly, 0.01);
        }
    }

    #[test]
    fn five_year_position_matches_reference_schedules() {
        let cases = [
            (150_000.0, 0.0229, 15_796.17, 23_585.43, 126_414.57),
            (150_000.0, 0.0459, 32_149.76, 18_114.04, 131_885.96),
            (250_000.0, 0.0459, 53_582.82, 30_190.38, 219_809.62),
        ];
        for (principal, rate, interest, repaid, balance) in cases {
            let position = mortgage_balance_at(5.0, principal, rate, 25).expect("valid mortgage");
            assert_rel(position.interest_paid, interest, 0.01);
            assert_rel(position.principal_paid, repaid, 0.01);
            assert_rel(position.remaining_balance, balance, 0.01);
            assert_rel(position.total_paid(), interest + repaid, 0.01);
        }
    }

    #[test]
    fn full_term_retires_the_loan() {
        let position = mortgage_balance_at(25.0, 150_000.0, 0.0229, 25).expect("valid mortgage");
        assert_rel(position.interest_paid, 46_909.12, 0.01);
        assert_approx_tol(position.principal_paid, 150_000.0, 1e-6);
        assert_approx_tol(position.remaining_balance, 0.0, 1e-6);
    }

    #[test]
    fn elapsed_time_past_term_is_clamped() {
        let at_term = mortgage_balance_at(25.0, 150_000.0, 0.0229, 25).expect("valid mortgage");
        let long_after = mortgage_balance_at(50.0, 150_000.0, 0.0229, 25).expect("valid mortgage");
        assert_eq!(at_term, long_after);
    }

    #[test]
    fn nothing_is_paid_at_time_zero() {
        let position = mortgage_balance_at(0.0, 400_000.0, 0.05, 30).expect("valid mortgage");
        assert_approx_tol(position.interest_paid, 0.0, 1e-9);
        assert_approx_tol(position.principal_paid, 0.0, 1e-9);
        assert_approx_tol(position.remaining_balance, 400_000.0, 1e-9);
    }

    #[test]
    fn zero_rate_mortgage_is_straight_line() {
        let payment = annual_mortgage_payment(100_000.0, 0.0, 20).expect("valid mortgage");
        assert_approx_tol(payment, 5_000.0, 1e-9);

        let position = mortgage_balance_at(4.0, 100_000.0, 0.0, 20).expect("valid mortgage");
        assert_eq!(position.interest_paid, 0.0);
        assert_approx_tol(position.principal_paid, 20_000.0, 1e-9);
        assert_approx_tol(position.remaining_balance, 80_000.0, 1e-9);
    }

    #[test]
    fn zero_principal_costs_nothing() {
        let position = mortgage_balance_at(10.0, 0.0, 0.04, 25).expect("valid mortgage");
        assert_eq!(position.total_paid(), 0.0);
        assert_eq!(position.remaining_balance, 0.0);
    }

    #[test]
    fn rejects_invalid_mortgage_inputs() {
        let err = annual_mortgage_payment(100_000.0, 0.04, 0).expect_err("zero term");
        assert_eq!(err.parameter, "mortgage term");

        let err = annual_mortgage_payment(-1.0, 0.04, 25).expect_err("negative principal");
        assert_eq!(err.parameter, "mortgage principal");

        let err = mortgage_balance_at(-0.5, 100_000.0, 0.04, 25).expect_err("negative time");
        assert_eq!(err.parameter, "elapsed years");

        let err = mortgage_balance_at(1.0, 100_000.0, -3.0, 25).expect_err("bad rate");
        assert_eq!(err.parameter, "nominal rate");
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_full_amortization_at_term(
            principal in 1_000u32..3_000_000,
            rate_bp in 1u32..1_500,
            term in 1u32..41
        ) {
            let principal = principal as f64;
            let rate = rate_bp as f64 / 10_000.0;
            let position = mortgage_balance_at(term as f64, principal, rate, term)
                .expect("valid mortgage");
            let tol = principal * 1e-9 + 1e-6;
            prop_assert!(position.remaining_balance.abs() <= tol);
            prop_assert!((position.principal_paid - principal).abs() <= tol);
            prop_assert!(position.interest_paid >= 0.0);
        }

        #[test]
        fn prop_longer_term_means_smaller_payment(
            principal in 1_000u32..3_000_000,
            rate_bp in 0u32..1_500,
            term in 1u32..40
        ) {
            let principal = principal as f64;
            let rate = rate_bp as f64 / 10_000.0;
            let shorter = annual_mortgage_payment(principal, rate, term).expect("valid mortgage");
            let longer =
                annual_mortgage_payment(principal, rate, term + 1).expect("valid mortgage");
            prop_assert!(longer < shorter);
        }

        #[test]
        fn prop_balance_declines_over_time(
            principal in 1_000u32..3_000_000,
            rate_bp in 0u32..1_500,
            elapsed_months in 0u32..300
        ) {
            let principal = principal as f64;
            let rate = rate_bp as f64 / 10_000.0;
            let earlier = elapsed_months as f64 / 12.0;
            let later = earlier + 1.0;
            let first = mortgage_balance_at(earlier, principal, rate, 25).expect("valid mortgage");
            let second = mortgage_balance_at(later, principal, rate, 25).expect("valid mortgage");
            prop_assert!(second.remaining_balance < first.remaining_balance);
            prop_assert!(second.principal_paid > first.principal_paid);
            prop_assert!(second.remaining_balance >= -principal * 1e-9);
        }
    }
}
