//! Decoder for the provider's delimited quote payload.
//!
//! A quote response is a single assignment line of the form
//! `v_hk00700="100~TENCENT~00700~320.50~...";` with tilde-separated fields
//! inside the quoted string. The last traded price sits at field index 3.

use thiserror::Error;

use crate::QuotePrice;

/// Zero-indexed position of the last traded price within the payload.
pub const LAST_PRICE_FIELD: usize = 3;

/// Failure to extract a usable price from a quote payload. Absorbed by the
/// fetcher; never shown raw to the end user.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("payload does not contain a quoted field string")]
    MissingPayload,
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("last-price field is not numeric: '{value}'")]
    NonNumericPrice { value: String },
    #[error("last-price field must be positive, got {value}")]
    NonPositivePrice { value: f64 },
}

/// Extract the last traded price from a raw quote response body.
pub fn decode_last_price(body: &str) -> Result<QuotePrice, ParseError> {
    let open = body.find('"').ok_or(ParseError::MissingPayload)?;
    let rest = &body[open + 1..];
    let close = rest.find('"').ok_or(ParseError::MissingPayload)?;
    let payload = &rest[..close];

    let fields: Vec<&str> = payload.split('~').collect();
    if fields.len() <= LAST_PRICE_FIELD {
        return Err(ParseError::TooFewFields {
            expected: LAST_PRICE_FIELD + 1,
            found: fields.len(),
        });
    }

    let raw = fields[LAST_PRICE_FIELD].trim();
    let value: f64 = raw.parse().map_err(|_| ParseError::NonNumericPrice {
        value: raw.to_owned(),
    })?;

    QuotePrice::new(value).map_err(|_| ParseError::NonPositivePrice { value })
}
