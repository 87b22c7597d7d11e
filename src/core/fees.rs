use super::error::{DomainError, ensure_non_negative};

/// Two-bracket progressive rate: `lower_rate` up to `threshold`, `upper_rate`
/// on the remainder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TieredRate {
    pub lower_rate: f64,
    pub upper_rate: f64,
    pub threshold: f64,
}

impl TieredRate {
    pub fn apply(self, amount: f64) -> Result<f64, DomainError> {
        let amount = ensure_non_negative("price", amount)?;
        let lower = self.lower_rate * self.threshold.min(amount);
        let upper = self.upper_rate * (amount - self.threshold).max(0.0);
        Ok(lower + upper)
    }
}

pub const BUYER_COMMISSION: TieredRate = TieredRate {
    lower_rate: 0.03125,
    upper_rate: 0.011625,
    threshold: 100_000.0,
};

pub const SELLER_COMMISSION: TieredRate = TieredRate {
    lower_rate: 0.07,
    upper_rate: 0.025,
    threshold: 100_000.0,
};

pub const PROPERTY_TRANSFER_TAX: TieredRate = TieredRate {
    lower_rate: 0.01,
    upper_rate: 0.02,
    threshold: 200_000.0,
};

pub fn buyer_commission(price: f64) -> Result<f64, DomainError> {
    BUYER_COMMISSION.apply(price)
}

pub fn seller_commission(price: f64) -> Result<f64, DomainError> {
    SELLER_COMMISSION.apply(price)
}

pub fn property_transfer_tax(price: f64) -> Result<f64, DomainError> {
    PROPERTY_TRANSFER_TAX.apply(price)
}
