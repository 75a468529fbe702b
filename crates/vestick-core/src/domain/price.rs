use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::ValidationError;

/// Latest traded price for a symbol. Always positive and finite; carries no
/// identity beyond its value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct QuotePrice(f64);

impl QuotePrice {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::NonPositivePrice { field: "price" });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Display for QuotePrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
