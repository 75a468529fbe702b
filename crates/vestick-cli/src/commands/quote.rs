use std::sync::Arc;

use serde_json::{json, Value};

use vestick_core::{
    Envelope, EnvelopeMeta, PriceSource, QuoteFetcher, QuotePrice, ReqwestHttpClient,
};

use crate::cli::QuoteArgs;
use crate::error::CliError;
use crate::metadata::RequestId;

use super::fetch_meta;

pub async fn run(args: &QuoteArgs, request_id: RequestId) -> Result<Envelope<Value>, CliError> {
    let fetcher =
        QuoteFetcher::new(Arc::new(ReqwestHttpClient::new())).with_timeout_ms(args.timeout_ms);

    match args.fallback {
        Some(raw) => {
            let fallback = QuotePrice::new(raw)?;
            let outcome = fetcher.fetch_price(&args.symbol, fallback).await;

            let mut meta = fetch_meta(
                request_id,
                outcome.endpoint_chain.clone(),
                outcome.latency_ms,
                &outcome.errors,
            );
            if outcome.used_fallback() {
                meta = meta.with_warning("all quote endpoints failed; using fallback price");
            }

            let data = quote_data(
                &args.symbol,
                outcome.symbol.as_str(),
                Some(outcome.price),
                Some(outcome.source),
            );
            Ok(Envelope::success(meta, data))
        }
        None => match fetcher.fetch(&args.symbol).await {
            Ok(success) => {
                let meta = fetch_meta(
                    request_id,
                    success.endpoint_chain.clone(),
                    success.latency_ms,
                    &success.errors,
                );
                let data = quote_data(
                    &args.symbol,
                    success.symbol.as_str(),
                    Some(success.price),
                    Some(success.endpoint.into()),
                );
                Ok(Envelope::success(meta, data))
            }
            Err(failure) => {
                let meta = EnvelopeMeta::new(request_id.to_string())
                    .with_endpoint_chain(failure.endpoint_chain.clone())
                    .with_latency(failure.latency_ms)
                    .with_warning("all quote endpoints failed and no fallback price was given");
                let data = quote_data(&args.symbol, failure.symbol.as_str(), None, None);
                Ok(Envelope::with_errors(meta, data, failure.errors))
            }
        },
    }
}

fn quote_data(
    symbol: &str,
    provider_symbol: &str,
    price: Option<QuotePrice>,
    source: Option<PriceSource>,
) -> Value {
    json!({
        "symbol": symbol,
        "provider_symbol": provider_symbol,
        "price": price,
        "source": source.map(PriceSource::as_str),
    })
}
