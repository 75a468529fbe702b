use std::sync::Arc;

use serde_json::{json, Value};

use vestick_core::{compute_profit, Envelope, GrantDate, QuoteFetcher, ReqwestHttpClient};

use crate::cli::ProfitArgs;
use crate::config;
use crate::error::CliError;
use crate::metadata::RequestId;

use super::fetch_meta;

pub async fn run(args: &ProfitArgs, request_id: RequestId) -> Result<Envelope<Value>, CliError> {
    let settings = config::resolve(args)?;
    let as_of = match &args.as_of {
        Some(raw) => GrantDate::parse(raw)?,
        None => GrantDate::today(),
    };

    let fetcher =
        QuoteFetcher::new(Arc::new(ReqwestHttpClient::new())).with_timeout_ms(args.timeout_ms);
    let outcome = fetcher
        .fetch_price(&settings.grant.symbol, settings.fallback)
        .await;
    let breakdown = compute_profit(&settings.grant, outcome.price, as_of);

    let mut meta = fetch_meta(
        request_id,
        outcome.endpoint_chain.clone(),
        outcome.latency_ms,
        &outcome.errors,
    );
    if outcome.used_fallback() {
        meta = meta.with_warning(
            "all quote endpoints failed; valuation uses the configured fallback price",
        );
    }

    let data = json!({
        "symbol": settings.grant.symbol,
        "provider_symbol": outcome.symbol.as_str(),
        "as_of": as_of.to_string(),
        "currency": args.currency,
        "price": outcome.price,
        "price_source": outcome.source.as_str(),
        "strike_price": settings.grant.strike_price,
        "breakdown": breakdown,
    });

    Ok(Envelope::success(meta, data))
}
