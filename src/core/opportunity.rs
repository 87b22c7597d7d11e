//! Investment growth given up by spending money on a home instead of keeping
//! it in the market.
//!
//! Recurring costs are treated as equal monthly installments paid at the end
//! of each month over the horizon, each of which would otherwise have been
//! invested until the end of the horizon. The result does not reconcile with
//! third-party rent-vs-buy calculators and should be read as an approximation.

use super::error::{DomainError, ensure_non_negative};
use super::rates::continuous_rate;

const MONTHS_PER_YEAR: f64 = 12.0;

pub fn opportunity_cost(
    initial_cost: f64,
    recurring_cost_total: f64,
    horizon: f64,
    market_return_rate: f64,
) -> Result<f64, DomainError> {
    let initial_cost = ensure_non_negative("initial cost", initial_cost)?;
    let recurring_cost_total = ensure_non_negative("recurring cost total", recurring_cost_total)?;
    let horizon = ensure_non_negative("horizon", horizon)?;
    let roi = continuous_rate(market_return_rate, 1)?;

    let initial_opportunity = initial_cost * ((roi * horizon).exp() - 1.0);
    Ok(initial_opportunity + recurring_opportunity(recurring_cost_total, horizon, roi))
}

fn recurring_opportunity(recurring_cost_total: f64, horizon: f64, roi: f64) -> f64 {
    if horizon == 0.0 || roi == 0.0 {
        return 0.0;
    }

    let months = horizon * MONTHS_PER_YEAR;
    let monthly_installment = recurring_cost_total / months;
    let monthly_roi = roi / MONTHS_PER_YEAR;
    let accumulated = ((monthly_roi * months).exp() - 1.0) / (monthly_roi.exp() - 1.0);
    monthly_installment * (accumulated - months)
}
