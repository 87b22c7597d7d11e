mod amortization;
mod engine;
mod error;
mod fees;
mod opportunity;
mod rates;
mod types;

pub use amortization::{MortgagePosition, annual_mortgage_payment, mortgage_balance_at};
pub use engine::{
    buy_cost_breakdown, compare, compute_buy_net_cost, compute_rent_net_cost, labels,
    rent_cost_breakdown,
};
pub use error::DomainError;
pub use fees::{
    BUYER_COMMISSION, PROPERTY_TRANSFER_TAX, SELLER_COMMISSION, TieredRate, buyer_commission,
    property_transfer_tax, seller_commission,
};
pub use opportunity::opportunity_cost;
pub use rates::{continuous_rate, integrate_exponential_growth};
pub use types::{BuyScenario, Comparison, CostBreakdown, CostGroup, LineItem, RentScenario};
