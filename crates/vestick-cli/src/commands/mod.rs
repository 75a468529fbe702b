mod profit;
mod quote;

use serde_json::Value;

use vestick_core::{Envelope, EnvelopeError, EnvelopeMeta, QuoteEndpoint};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::RequestId;

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let request_id = RequestId::new_v4();
    match &cli.command {
        Command::Quote(args) => quote::run(args, request_id).await,
        Command::Profit(args) => profit::run(args, request_id).await,
    }
}

/// Envelope metadata for a fetch that produced a price: absorbed endpoint
/// errors are demoted to warnings.
fn fetch_meta(
    request_id: RequestId,
    endpoint_chain: Vec<QuoteEndpoint>,
    latency_ms: u64,
    absorbed: &[EnvelopeError],
) -> EnvelopeMeta {
    EnvelopeMeta::new(request_id.to_string())
        .with_endpoint_chain(endpoint_chain)
        .with_latency(latency_ms)
        .with_warnings(absorbed.iter().map(EnvelopeError::summary))
}
