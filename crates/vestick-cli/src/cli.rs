//! CLI argument definitions for vestick.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `quote` | Fetch the latest price for a ticker |
//! | `profit` | Fetch a price and value a grant against it |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Vestick - stock-option grant valuation CLI
///
/// Fetches a live quote (with primary/secondary endpoint fallback) and turns
/// a vesting grant schedule into vested-count and profit figures.
#[derive(Debug, Parser)]
#[command(
    name = "vestick",
    author,
    version,
    about = "Stock-option grant valuation CLI"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    ///
    /// Useful when a fallback price must not silently stand in for a live
    /// quote, e.g. in scripted runs.
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII key/value format for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the latest quote for a ticker.
    ///
    /// Tries the primary endpoint, then the secondary; with `--fallback`
    /// a total miss still yields a price.
    ///
    /// # Examples
    ///
    ///   vestick quote 700
    ///   vestick quote 9863.hk --fallback 88.8
    Quote(QuoteArgs),

    /// Value a vesting grant against the latest quote.
    ///
    /// Grant terms come from a JSON config file (`--config` or the
    /// `VESTICK_CONFIG` env var) and/or flags; flags win.
    ///
    /// # Examples
    ///
    ///   vestick profit --config grant.json
    ///   vestick profit --config grant.json --as-of 2025-09-02 --pretty
    Profit(ProfitArgs),
}

/// Arguments for the `quote` command.
#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Ticker, optionally suffixed with a market code (.hk, .sh, .sz).
    pub symbol: String,

    /// Price to fall back to when both endpoints fail.
    #[arg(long)]
    pub fallback: Option<f64>,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 3_000)]
    pub timeout_ms: u64,
}

/// Arguments for the `profit` command.
#[derive(Debug, Args)]
pub struct ProfitArgs {
    /// Path to a JSON grant config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ticker override.
    #[arg(long)]
    pub symbol: Option<String>,

    /// Total options in the grant.
    #[arg(long)]
    pub total_options: Option<u64>,

    /// Strike (exercise) price.
    #[arg(long)]
    pub strike_price: Option<f64>,

    /// Number of equal yearly vesting tranches.
    #[arg(long)]
    pub vesting_periods: Option<u32>,

    /// Grant start date, YYYY-MM-DD.
    #[arg(long)]
    pub start_date: Option<String>,

    /// Tax rate applied to gross profit, within [0, 1].
    #[arg(long)]
    pub tax_rate: Option<f64>,

    /// Price to fall back to when both endpoints fail.
    #[arg(long)]
    pub fallback: Option<f64>,

    /// Valuation date, YYYY-MM-DD (defaults to today).
    #[arg(long)]
    pub as_of: Option<String>,

    /// Display currency symbol (no conversion is performed).
    #[arg(long, default_value = "$")]
    pub currency: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 3_000)]
    pub timeout_ms: u64,
}
