use serde::Serialize;

use super::error::{DomainError, ensure_finite, ensure_non_negative, ensure_term};

/// Inputs to the buy model. Rates are fractions and periodic fees are annual
/// amounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyScenario {
    pub home_price: f64,
    pub down_payment_fraction: f64,
    pub mortgage_rate: f64,
    pub mortgage_term_years: u32,
    pub appreciation_rate: f64,
    pub market_return_rate: f64,
    pub inflation_rate: f64,
    pub property_tax_rate: f64,
    /// Annual upkeep as a fraction of the purchase price.
    pub maintenance_rate: f64,
    pub strata_fee_annual: f64,
    pub insurance_annual: f64,
    pub utilities_annual: f64,
    pub horizon_years: f64,
}

impl BuyScenario {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_non_negative("home price", self.home_price)?;
        ensure_non_negative("horizon", self.horizon_years)?;
        if !(0.0..=1.0).contains(&self.down_payment_fraction) {
            return Err(DomainError::new(
                "down payment fraction",
                self.down_payment_fraction,
                "must be between 0 and 1",
            ));
        }
        ensure_term(self.mortgage_term_years)?;
        ensure_finite("mortgage rate", self.mortgage_rate)?;
        ensure_finite("appreciation rate", self.appreciation_rate)?;
        ensure_finite("market return rate", self.market_return_rate)?;
        ensure_finite("inflation rate", self.inflation_rate)?;
        ensure_non_negative("property tax rate", self.property_tax_rate)?;
        ensure_non_negative("maintenance rate", self.maintenance_rate)?;
        ensure_non_negative("strata fee", self.strata_fee_annual)?;
        ensure_non_negative("insurance", self.insurance_annual)?;
        ensure_non_negative("utilities", self.utilities_annual)?;
        Ok(())
    }

    pub fn down_payment(&self) -> f64 {
        self.home_price * self.down_payment_fraction
    }

    pub fn mortgage_amount(&self) -> f64 {
        self.home_price * (1.0 - self.down_payment_fraction)
    }
}

/// Inputs to the rent model. Rates are fractions and periodic fees are annual
/// amounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentScenario {
    pub rent_annual: f64,
    pub rent_increase_rate: f64,
    pub deposit: f64,
    pub insurance_annual: f64,
    pub market_return_rate: f64,
    pub inflation_rate: f64,
    /// Not folded into the rent net cost.
    pub utilities_annual: f64,
    pub horizon_years: f64,
}

impl RentScenario {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_non_negative("rent", self.rent_annual)?;
        ensure_non_negative("deposit", self.deposit)?;
        ensure_non_negative("insurance", self.insurance_annual)?;
        ensure_non_negative("utilities", self.utilities_annual)?;
        ensure_non_negative("horizon", self.horizon_years)?;
        ensure_finite("rent increase rate", self.rent_increase_rate)?;
        ensure_finite("market return rate", self.market_return_rate)?;
        ensure_finite("inflation rate", self.inflation_rate)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub label: &'static str,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostGroup {
    pub total: f64,
    pub items: Vec<LineItem>,
}

impl CostGroup {
    pub(crate) fn from_items(items: Vec<LineItem>) -> Self {
        let total = items.iter().map(|item| item.amount).sum();
        Self { total, items }
    }

    pub fn item(&self, label: &str) -> Option<f64> {
        self.items
            .iter()
            .find(|item| item.label == label)
            .map(|item| item.amount)
    }
}

/// Every line of a cost calculation. Amounts are signed as costs, so money
/// coming back (a sale, a refunded deposit) is negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub initial_costs: CostGroup,
    pub recurring_costs: CostGroup,
    pub opportunity_cost: f64,
    pub proceeds: CostGroup,
    pub net_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub buy: CostBreakdown,
    pub rent: CostBreakdown,
    /// Positive when renting is cheaper.
    pub buy_minus_rent: f64,
}
