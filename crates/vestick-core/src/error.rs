use thiserror::Error;

/// Validation and contract errors exposed by `vestick-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,

    #[error("total options must be greater than zero")]
    ZeroTotalOptions,
    #[error("vesting periods must be greater than zero")]
    ZeroVestingPeriods,

    #[error("field '{field}' must be a positive finite number")]
    NonPositivePrice { field: &'static str },
    #[error("tax rate must be within [0, 1], got {value}")]
    TaxRateOutOfRange { value: f64 },

    #[error("date must be calendar YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
}
