use serde::Serialize;

use crate::ValidationError;

use super::GrantDate;

/// Terms of a single option grant. Immutable once constructed; all bounds
/// are checked up front so downstream computation cannot divide by zero or
/// apply a nonsensical tax rate.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantConfig {
    pub symbol: String,
    pub total_options: u64,
    pub strike_price: f64,
    pub vesting_periods: u32,
    pub start_date: GrantDate,
    pub tax_rate: f64,
}

impl GrantConfig {
    pub fn new(
        symbol: impl Into<String>,
        total_options: u64,
        strike_price: f64,
        vesting_periods: u32,
        start_date: GrantDate,
        tax_rate: f64,
    ) -> Result<Self, ValidationError> {
        let symbol = symbol.into().trim().to_owned();
        if symbol.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        if total_options == 0 {
            return Err(ValidationError::ZeroTotalOptions);
        }
        if vesting_periods == 0 {
            return Err(ValidationError::ZeroVestingPeriods);
        }
        if !strike_price.is_finite() || strike_price <= 0.0 {
            return Err(ValidationError::NonPositivePrice {
                field: "strike_price",
            });
        }
        if !tax_rate.is_finite() || !(0.0..=1.0).contains(&tax_rate) {
            return Err(ValidationError::TaxRateOutOfRange { value: tax_rate });
        }

        Ok(Self {
            symbol,
            total_options,
            strike_price,
            vesting_periods,
            start_date,
            tax_rate,
        })
    }
}

/// Valuation snapshot derived from a grant, a price point, and an as-of
/// date. Recomputed fresh each run; never mutated.
///
/// `completed_periods` keeps growing past `total_periods` so "how long since
/// grant" survives full vesting, while `vested_options` and `vested_ratio`
/// cap at the grant size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitBreakdown {
    pub vested_options: u64,
    pub vested_ratio: f64,
    pub gross_profit: f64,
    pub net_profit: f64,
    pub completed_periods: u32,
    pub total_periods: u32,
}
