use tracing::debug;

use super::amortization::mortgage_balance_at;
use super::error::{DomainError, ensure_finite};
use super::fees::{buyer_commission, property_transfer_tax, seller_commission};
use super::opportunity::opportunity_cost;
use super::rates::{continuous_rate, integrate_exponential_growth};
use super::types::{BuyScenario, Comparison, CostBreakdown, CostGroup, LineItem, RentScenario};

pub mod labels {
    pub const DOWN_PAYMENT: &str = "Down Payment";
    pub const BUYER_COMMISSION: &str = "Buyer Commission Cost";
    pub const PROPERTY_TRANSFER_TAX: &str = "Property Transfer Tax";
    pub const PROPERTY_TAXES: &str = "Property Taxes";
    pub const MAINTENANCE: &str = "Maintenance";
    pub const INSURANCE: &str = "Insurance";
    pub const UTILITIES: &str = "Utilities";
    pub const STRATA_FEES: &str = "Strata Fees";
    pub const MORTGAGE_PAYMENTS: &str = "Mortgage Payments";
    pub const SELLING_PRICE: &str = "Selling Price";
    pub const SELLER_COMMISSION: &str = "Seller Commission";
    pub const MORTGAGE_BALANCE: &str = "Mortgage Balance";
    pub const DEPOSIT: &str = "Deposit";
    pub const RENT: &str = "Rent";
    pub const DEPOSIT_REFUND: &str = "Deposit Refund";
}

fn item(label: &'static str, amount: f64) -> LineItem {
    LineItem { label, amount }
}

fn fold_net_cost(
    initial_costs: CostGroup,
    recurring_costs: CostGroup,
    opportunity_cost: f64,
    proceeds: CostGroup,
) -> Result<CostBreakdown, DomainError> {
    let net_cost =
        initial_costs.total + recurring_costs.total + opportunity_cost + proceeds.total;
    let net_cost = ensure_finite("net cost", net_cost)?.round_ties_even();
    Ok(CostBreakdown {
        initial_costs,
        recurring_costs,
        opportunity_cost,
        proceeds,
        net_cost,
    })
}

pub fn buy_cost_breakdown(scenario: &BuyScenario) -> Result<CostBreakdown, DomainError> {
    scenario.validate()?;

    let price = scenario.home_price;
    let years = scenario.horizon_years;
    let r = continuous_rate(scenario.appreciation_rate, 1)?;
    let i = continuous_rate(scenario.inflation_rate, 1)?;

    let initial_costs = CostGroup::from_items(vec![
        item(labels::DOWN_PAYMENT, scenario.down_payment()),
        item(labels::BUYER_COMMISSION, buyer_commission(price)?),
        item(labels::PROPERTY_TRANSFER_TAX, property_transfer_tax(price)?),
    ]);

    let mortgage = mortgage_balance_at(
        years,
        scenario.mortgage_amount(),
        scenario.mortgage_rate,
        scenario.mortgage_term_years,
    )?;

    let recurring_costs = CostGroup::from_items(vec![
        item(
            labels::PROPERTY_TAXES,
            integrate_exponential_growth(scenario.property_tax_rate * price, r, years)?,
        ),
        item(
            labels::MAINTENANCE,
            integrate_exponential_growth(scenario.maintenance_rate * price, r, years)?,
        ),
        item(
            labels::INSURANCE,
            integrate_exponential_growth(scenario.insurance_annual, i, years)?,
        ),
        item(
            labels::UTILITIES,
            integrate_exponential_growth(scenario.utilities_annual, i, years)?,
        ),
        item(
            labels::STRATA_FEES,
            integrate_exponential_growth(scenario.strata_fee_annual, i, years)?,
        ),
        item(labels::MORTGAGE_PAYMENTS, mortgage.total_paid()),
    ]);
    ensure_finite("recurring costs", recurring_costs.total)?;

    let opportunity = opportunity_cost(
        initial_costs.total,
        recurring_costs.total,
        years,
        scenario.market_return_rate,
    )?;

    let final_home_price = ensure_finite("final home price", price * (r * years).exp())?;
    let proceeds = CostGroup::from_items(vec![
        item(labels::SELLING_PRICE, -final_home_price),
        item(labels::SELLER_COMMISSION, seller_commission(final_home_price)?),
        item(labels::MORTGAGE_BALANCE, mortgage.remaining_balance),
    ]);

    let breakdown = fold_net_cost(initial_costs, recurring_costs, opportunity, proceeds)?;
    debug!(
        initial = breakdown.initial_costs.total,
        recurring = breakdown.recurring_costs.total,
        opportunity = breakdown.opportunity_cost,
        proceeds = breakdown.proceeds.total,
        net = breakdown.net_cost,
        "computed buy cost"
    );
    Ok(breakdown)
}

pub fn compute_buy_net_cost(scenario: &BuyScenario) -> Result<f64, DomainError> {
    buy_cost_breakdown(scenario).map(|breakdown| breakdown.net_cost)
}

/// The deposit is paid up front and refunded in full at the end, so it
/// appears on both sides and cancels out of the net cost.
pub fn rent_cost_breakdown(scenario: &RentScenario) -> Result<CostBreakdown, DomainError> {
    scenario.validate()?;

    let years = scenario.horizon_years;
    let i = continuous_rate(scenario.inflation_rate, 1)?;
    let r = continuous_rate(scenario.rent_increase_rate, 1)?;

    let initial_costs = CostGroup::from_items(vec![item(labels::DEPOSIT, scenario.deposit)]);
    let recurring_costs = CostGroup::from_items(vec![
        item(
            labels::RENT,
            integrate_exponential_growth(scenario.rent_annual, r, years)?,
        ),
        item(
            labels::INSURANCE,
            integrate_exponential_growth(scenario.insurance_annual, i, years)?,
        ),
    ]);
    ensure_finite("recurring costs", recurring_costs.total)?;

    let opportunity = opportunity_cost(
        initial_costs.total,
        recurring_costs.total,
        years,
        scenario.market_return_rate,
    )?;
    let proceeds = CostGroup::from_items(vec![item(labels::DEPOSIT_REFUND, -initial_costs.total)]);

    let breakdown = fold_net_cost(initial_costs, recurring_costs, opportunity, proceeds)?;
    debug!(
        recurring = breakdown.recurring_costs.total,
        opportunity = breakdown.opportunity_cost,
        net = breakdown.net_cost,
        "computed rent cost"
    );
    Ok(breakdown)
}

pub fn compute_rent_net_cost(scenario: &RentScenario) -> Result<f64, DomainError> {
    rent_cost_breakdown(scenario).map(|breakdown| breakdown.net_cost)
}

pub fn compare(buy: &BuyScenario, rent: &RentScenario) -> Result<Comparison, DomainError> {
    let buy = buy_cost_breakdown(buy)?;
    let rent = rent_cost_breakdown(rent)?;
    let buy_minus_rent = buy.net_cost - rent.net_cost;
    Ok(Comparison {
        buy,
        rent,
        buy_minus_rent,
    })
}
