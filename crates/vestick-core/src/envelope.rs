use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::QuoteEndpoint;

/// Standard response envelope for machine-readable `vestick` output.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self {
            meta,
            data,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(meta: EnvelopeMeta, data: T, errors: Vec<EnvelopeError>) -> Self {
        Self { meta, data, errors }
    }
}

/// Metadata attached to every envelope.
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub endpoint_chain: Vec<QuoteEndpoint>,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            generated_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_else(|_| String::from("<unformattable>")),
            endpoint_chain: Vec::new(),
            latency_ms: 0,
            warnings: Vec::new(),
        }
    }

    pub fn with_endpoint_chain(mut self, chain: Vec<QuoteEndpoint>) -> Self {
        self.endpoint_chain = chain;
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

/// Structured error entry carried inside an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeError {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<QuoteEndpoint>,
}

impl EnvelopeError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: QuoteEndpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// One-line rendering used when an absorbed error is demoted to a
    /// warning on an otherwise successful run.
    pub fn summary(&self) -> String {
        match self.endpoint {
            Some(endpoint) => format!("{endpoint}: {} ({})", self.message, self.code),
            None => format!("{} ({})", self.message, self.code),
        }
    }
}
