//! Vesting schedule arithmetic.
//!
//! Tranches vest on whole-year anniversaries of the grant start date.
//! `floor(total / periods)` options vest per anniversary; remainder shares
//! from an uneven split never vest.

use crate::{GrantConfig, GrantDate, ProfitBreakdown, QuotePrice};

/// Whole vesting anniversaries elapsed between `start` and `as_of`,
/// clamped at zero and deliberately unclamped upward.
pub fn completed_anniversaries(start: GrantDate, as_of: GrantDate) -> u32 {
    let mut years = as_of.year() - start.year();
    if as_of.month_day() < start.month_day() {
        years -= 1;
    }
    years.max(0) as u32
}

/// Derive the full valuation snapshot for a grant at a given price point.
/// Pure: identical inputs always yield an identical breakdown.
pub fn compute_profit(
    config: &GrantConfig,
    price: QuotePrice,
    as_of: GrantDate,
) -> ProfitBreakdown {
    let completed_periods = completed_anniversaries(config.start_date, as_of);
    let effective_periods = completed_periods.min(config.vesting_periods);
    let per_period = config.total_options / u64::from(config.vesting_periods);
    let vested_options = u64::from(effective_periods) * per_period;

    let vested_ratio = vested_options as f64 / config.total_options as f64;
    let gross_profit = vested_options as f64 * (price.get() - config.strike_price);
    let net_profit = gross_profit * (1.0 - config.tax_rate);

    ProfitBreakdown {
        vested_options,
        vested_ratio,
        gross_profit,
        net_profit,
        completed_periods,
        total_periods: config.vesting_periods,
    }
}
