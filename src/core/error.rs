use thiserror::Error;

/// A numeric input, or a value derived from one, outside the domain the cost
/// model is defined on.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {parameter} ({value}): {reason}")]
pub struct DomainError {
    pub parameter: &'static str,
    pub value: f64,
    pub reason: &'static str,
}

impl DomainError {
    pub fn new(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        Self {
            parameter,
            value,
            reason,
        }
    }
}

pub(crate) fn ensure_non_negative(parameter: &'static str, value: f64) -> Result<f64, DomainError> {
    if !value.is_finite() {
        return Err(DomainError::new(parameter, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(DomainError::new(parameter, value, "must be >= 0"));
    }
    Ok(value)
}

pub(crate) fn ensure_finite(parameter: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::new(parameter, value, "must be finite"))
    }
}

pub(crate) fn ensure_term(term_years: u32) -> Result<f64, DomainError> {
    if term_years == 0 {
        return Err(DomainError::new("mortgage term", 0.0, "must be > 0 years"));
    }
    Ok(term_years as f64)
}
