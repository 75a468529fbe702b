//! Two-tier quote retrieval with a terminal fallback price.
//!
//! The fetcher tries the primary endpoint, then the secondary, strictly in
//! order. Transport failures, non-success statuses, and undecodable payloads
//! are absorbed into the outcome; `fetch_price` converts a total miss into
//! the caller-supplied fallback so price retrieval never aborts a run.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::http_client::{HttpClient, HttpRequest};
use crate::{EnvelopeError, ProviderSymbol, QuoteEndpoint, QuotePrice};

pub const DEFAULT_PRIMARY_HOST: &str = "qt.gtimg.cn";
pub const DEFAULT_SECONDARY_HOST: &str = "web.sqt.gtimg.cn";

const DEFAULT_TIMEOUT_MS: u64 = 3_000;

/// Where the returned price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Primary,
    Secondary,
    Fallback,
}

impl PriceSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Fallback => "fallback",
        }
    }

    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback)
    }
}

impl From<QuoteEndpoint> for PriceSource {
    fn from(endpoint: QuoteEndpoint) -> Self {
        match endpoint {
            QuoteEndpoint::Primary => Self::Primary,
            QuoteEndpoint::Secondary => Self::Secondary,
        }
    }
}

/// Successful fetch from one of the endpoints.
#[derive(Debug, Clone)]
pub struct FetchSuccess {
    pub symbol: ProviderSymbol,
    pub price: QuotePrice,
    pub endpoint: QuoteEndpoint,
    pub endpoint_chain: Vec<QuoteEndpoint>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

/// Both endpoints exhausted without a usable price.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub symbol: ProviderSymbol,
    pub endpoint_chain: Vec<QuoteEndpoint>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

pub type FetchResult = Result<FetchSuccess, FetchFailure>;

/// Price plus provenance, as produced by [`QuoteFetcher::fetch_price`].
/// Always carries a usable positive price.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub symbol: ProviderSymbol,
    pub price: QuotePrice,
    pub source: PriceSource,
    pub endpoint_chain: Vec<QuoteEndpoint>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

impl FetchOutcome {
    pub fn used_fallback(&self) -> bool {
        self.source.is_fallback()
    }
}

/// Stateless quote retriever over an injected transport.
pub struct QuoteFetcher {
    http: Arc<dyn HttpClient>,
    primary_host: String,
    secondary_host: String,
    timeout_ms: u64,
}

impl QuoteFetcher {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            primary_host: String::from(DEFAULT_PRIMARY_HOST),
            secondary_host: String::from(DEFAULT_SECONDARY_HOST),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_hosts(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.primary_host = primary.into();
        self.secondary_host = secondary.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn host(&self, endpoint: QuoteEndpoint) -> &str {
        match endpoint {
            QuoteEndpoint::Primary => &self.primary_host,
            QuoteEndpoint::Secondary => &self.secondary_host,
        }
    }

    fn quote_url(&self, endpoint: QuoteEndpoint, symbol: &ProviderSymbol) -> String {
        format!(
            "https://{}/q={}",
            self.host(endpoint),
            urlencoding::encode(symbol.as_str())
        )
    }

    /// Try primary then secondary, recording each absorbed failure. The raw
    /// ticker is normalized internally.
    pub async fn fetch(&self, raw_symbol: &str) -> FetchResult {
        let started = Instant::now();
        let symbol = ProviderSymbol::normalize(raw_symbol);
        let mut endpoint_chain = Vec::with_capacity(QuoteEndpoint::ALL.len());
        let mut errors = Vec::new();

        for endpoint in QuoteEndpoint::ALL {
            endpoint_chain.push(endpoint);
            let url = self.quote_url(endpoint, &symbol);
            debug!(symbol = %symbol, endpoint = endpoint.as_str(), %url, "requesting quote");

            let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);
            match self.http.execute(request).await {
                Ok(response) if response.is_success() => {
                    match crate::wire::decode_last_price(&response.body) {
                        Ok(price) => {
                            info!(
                                symbol = %symbol,
                                endpoint = endpoint.as_str(),
                                price = price.get(),
                                "quote fetched"
                            );
                            return Ok(FetchSuccess {
                                symbol,
                                price,
                                endpoint,
                                endpoint_chain,
                                errors,
                                latency_ms: elapsed_ms(started),
                            });
                        }
                        Err(error) => {
                            warn!(symbol = %symbol, endpoint = endpoint.as_str(), %error, "quote payload rejected");
                            errors.push(
                                EnvelopeError::new("quote.decode", error.to_string())
                                    .with_endpoint(endpoint),
                            );
                        }
                    }
                }
                Ok(response) => {
                    warn!(
                        symbol = %symbol,
                        endpoint = endpoint.as_str(),
                        status = response.status,
                        "quote endpoint returned non-success status"
                    );
                    errors.push(
                        EnvelopeError::new(
                            "quote.status",
                            format!("endpoint returned status {}", response.status),
                        )
                        .with_endpoint(endpoint),
                    );
                }
                Err(error) => {
                    warn!(symbol = %symbol, endpoint = endpoint.as_str(), %error, "quote request failed");
                    errors.push(
                        EnvelopeError::new("quote.transport", error.message()).with_endpoint(endpoint),
                    );
                }
            }
        }

        Err(FetchFailure {
            symbol,
            endpoint_chain,
            errors,
            latency_ms: elapsed_ms(started),
        })
    }

    /// Fetch with a terminal fallback: on total failure the supplied default
    /// price is returned instead of an error.
    pub async fn fetch_price(&self, raw_symbol: &str, fallback: QuotePrice) -> FetchOutcome {
        match self.fetch(raw_symbol).await {
            Ok(success) => FetchOutcome {
                symbol: success.symbol,
                price: success.price,
                source: success.endpoint.into(),
                endpoint_chain: success.endpoint_chain,
                errors: success.errors,
                latency_ms: success.latency_ms,
            },
            Err(failure) => {
                warn!(
                    symbol = %failure.symbol,
                    fallback = fallback.get(),
                    "all quote endpoints failed, using fallback price"
                );
                FetchOutcome {
                    symbol: failure.symbol,
                    price: fallback,
                    source: PriceSource::Fallback,
                    endpoint_chain: failure.endpoint_chain,
                    errors: failure.errors,
                    latency_ms: failure.latency_ms,
                }
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    const PAYLOAD: &str = r#"v_hk00700="100~TENCENT~00700~320.50~319.00";"#;

    struct ScriptedHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        urls: Mutex<Vec<String>>,
    }

    impl ScriptedHttpClient {
        fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn urls(&self) -> Vec<String> {
            self.urls.lock().expect("urls lock").clone()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.urls.lock().expect("urls lock").push(request.url);
            let next = self
                .responses
                .lock()
                .expect("responses lock")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::new("script exhausted")));
            Box::pin(async move { next })
        }
    }

    fn fetcher(client: Arc<ScriptedHttpClient>) -> QuoteFetcher {
        QuoteFetcher::new(client)
    }

    #[test]
    fn primary_success_skips_secondary() {
        let client = ScriptedHttpClient::new(vec![Ok(HttpResponse::ok(PAYLOAD))]);
        let outcome = block_on(
            fetcher(Arc::clone(&client))
                .fetch_price("700", QuotePrice::new(1.0).expect("valid fallback")),
        );

        assert_eq!(outcome.price.get(), 320.50);
        assert_eq!(outcome.source, PriceSource::Primary);
        assert_eq!(outcome.endpoint_chain, vec![QuoteEndpoint::Primary]);
        assert!(outcome.errors.is_empty());
        assert_eq!(client.urls(), vec!["https://qt.gtimg.cn/q=hk00700"]);
    }

    #[test]
    fn transport_error_falls_back_to_secondary() {
        let client = ScriptedHttpClient::new(vec![
            Err(HttpError::new("connection failed")),
            Ok(HttpResponse::ok(PAYLOAD)),
        ]);
        let outcome = block_on(
            fetcher(Arc::clone(&client))
                .fetch_price("700", QuotePrice::new(1.0).expect("valid fallback")),
        );

        assert_eq!(outcome.source, PriceSource::Secondary);
        assert_eq!(
            outcome.endpoint_chain,
            vec![QuoteEndpoint::Primary, QuoteEndpoint::Secondary]
        );
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].endpoint, Some(QuoteEndpoint::Primary));
        assert_eq!(
            client.urls(),
            vec![
                "https://qt.gtimg.cn/q=hk00700",
                "https://web.sqt.gtimg.cn/q=hk00700"
            ]
        );
    }

    #[test]
    fn non_success_status_counts_as_failure() {
        let client = ScriptedHttpClient::new(vec![
            Ok(HttpResponse {
                status: 502,
                body: String::new(),
            }),
            Ok(HttpResponse::ok(PAYLOAD)),
        ]);
        let outcome = block_on(
            fetcher(client).fetch_price("700", QuotePrice::new(1.0).expect("valid fallback")),
        );

        assert_eq!(outcome.source, PriceSource::Secondary);
        assert_eq!(outcome.errors[0].code, "quote.status");
    }

    #[test]
    fn undecodable_payload_counts_as_failure() {
        let client = ScriptedHttpClient::new(vec![
            Ok(HttpResponse::ok("garbage")),
            Ok(HttpResponse::ok(PAYLOAD)),
        ]);
        let outcome = block_on(
            fetcher(client).fetch_price("700", QuotePrice::new(1.0).expect("valid fallback")),
        );

        assert_eq!(outcome.source, PriceSource::Secondary);
        assert_eq!(outcome.errors[0].code, "quote.decode");
    }

    #[test]
    fn total_failure_returns_the_fallback_price() {
        let client = ScriptedHttpClient::new(vec![
            Err(HttpError::new("dns failure")),
            Err(HttpError::new("dns failure")),
        ]);
        let fallback = QuotePrice::new(88.8).expect("valid fallback");
        let outcome = block_on(fetcher(client).fetch_price("700", fallback));

        assert!(outcome.used_fallback());
        assert_eq!(outcome.price.get(), 88.8);
        assert_eq!(outcome.errors.len(), 2);
    }

    #[test]
    fn fetch_without_fallback_reports_both_attempts() {
        let client = ScriptedHttpClient::new(vec![
            Err(HttpError::new("dns failure")),
            Ok(HttpResponse {
                status: 500,
                body: String::new(),
            }),
        ]);
        let failure = block_on(fetcher(client).fetch("700")).expect_err("must fail");

        assert_eq!(
            failure.endpoint_chain,
            vec![QuoteEndpoint::Primary, QuoteEndpoint::Secondary]
        );
        assert_eq!(failure.errors.len(), 2);
        assert_eq!(failure.symbol.as_str(), "hk00700");
    }

    fn block_on<F>(future: F) -> F::Output
    where
        F: Future,
    {
        let waker = noop_waker();
        let mut context = Context::from_waker(&waker);
        let mut future = std::pin::pin!(future);

        loop {
            match future.as_mut().poll(&mut context) {
                Poll::Ready(output) => return output,
                Poll::Pending => std::thread::yield_now(),
            }
        }
    }

    fn noop_waker() -> Waker {
        // SAFETY: The vtable functions never dereference the data pointer and are no-op operations.
        unsafe { Waker::from_raw(noop_raw_waker()) }
    }

    fn noop_raw_waker() -> RawWaker {
        RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
    }

    unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
        noop_raw_waker()
    }

    unsafe fn noop_raw_waker_wake(_: *const ()) {}

    unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

    unsafe fn noop_raw_waker_drop(_: *const ()) {}

    static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
        noop_raw_waker_clone,
        noop_raw_waker_wake,
        noop_raw_waker_wake_by_ref,
        noop_raw_waker_drop,
    );
}
