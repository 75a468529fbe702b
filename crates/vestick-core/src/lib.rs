//! # Vestick Core
//!
//! Quote retrieval and vesting valuation for the `vestick` toolkit.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Value types (GrantConfig, GrantDate, QuotePrice, ProviderSymbol) |
//! | [`endpoint`] | Quote endpoint identifiers |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Validation errors |
//! | [`fetcher`] | Two-tier quote retrieval with fallback |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`vesting`] | Vesting/profit calculator |
//! | [`wire`] | Provider payload decoder |
//!
//! ## Flow
//!
//! ```text
//! ticker ──▶ ProviderSymbol ──▶ QuoteFetcher ──▶ wire decoder ──▶ QuotePrice
//!                                    │ (primary, secondary, fallback)
//! GrantConfig + QuotePrice + as-of ──▶ compute_profit ──▶ ProfitBreakdown
//! ```
//!
//! Every run is a fresh, independent computation: the fetcher holds no cache
//! and the calculator is a pure function.

pub mod domain;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod vesting;
pub mod wire;

pub use domain::{GrantConfig, GrantDate, ProfitBreakdown, ProviderSymbol, QuotePrice};
pub use endpoint::QuoteEndpoint;
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::ValidationError;
pub use fetcher::{
    FetchFailure, FetchOutcome, FetchResult, FetchSuccess, PriceSource, QuoteFetcher,
    DEFAULT_PRIMARY_HOST, DEFAULT_SECONDARY_HOST,
};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use vesting::{completed_anniversaries, compute_profit};
pub use wire::{decode_last_price, ParseError, LAST_PRICE_FIELD};
