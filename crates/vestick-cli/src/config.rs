//! Grant configuration resolution: JSON file merged with flag overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use vestick_core::{GrantConfig, GrantDate, QuotePrice};

use crate::cli::ProfitArgs;
use crate::error::CliError;

/// Env var pointing at a grant config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "VESTICK_CONFIG";

/// On-disk grant config. Every field is optional so flags can fill gaps;
/// required fields are enforced once, at resolution time.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantFile {
    pub symbol: Option<String>,
    pub total_options: Option<u64>,
    pub strike_price: Option<f64>,
    pub vesting_periods: Option<u32>,
    pub start_date: Option<String>,
    pub tax_rate: Option<f64>,
    pub fallback_price: Option<f64>,
}

impl GrantFile {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Fully resolved inputs for a profit run.
#[derive(Debug, Clone)]
pub struct ProfitSettings {
    pub grant: GrantConfig,
    pub fallback: QuotePrice,
}

/// Merge file and flags (flags win) and validate the result.
pub fn resolve(args: &ProfitArgs) -> Result<ProfitSettings, CliError> {
    let file = match config_path(args) {
        Some(path) => GrantFile::load(&path)?,
        None => GrantFile::default(),
    };

    let symbol = args
        .symbol
        .clone()
        .or(file.symbol)
        .ok_or(CliError::MissingParameter { name: "symbol" })?;
    let total_options = args.total_options.or(file.total_options).ok_or(
        CliError::MissingParameter {
            name: "total_options",
        },
    )?;
    let strike_price =
        args.strike_price
            .or(file.strike_price)
            .ok_or(CliError::MissingParameter {
                name: "strike_price",
            })?;
    let vesting_periods =
        args.vesting_periods
            .or(file.vesting_periods)
            .ok_or(CliError::MissingParameter {
                name: "vesting_periods",
            })?;
    let start_raw = args
        .start_date
        .clone()
        .or(file.start_date)
        .ok_or(CliError::MissingParameter { name: "start_date" })?;
    let tax_rate = args
        .tax_rate
        .or(file.tax_rate)
        .ok_or(CliError::MissingParameter { name: "tax_rate" })?;
    let fallback_raw =
        args.fallback
            .or(file.fallback_price)
            .ok_or(CliError::MissingParameter {
                name: "fallback_price",
            })?;

    let start_date = GrantDate::parse(&start_raw)?;
    let grant = GrantConfig::new(
        symbol,
        total_options,
        strike_price,
        vesting_periods,
        start_date,
        tax_rate,
    )?;
    let fallback = QuotePrice::new(fallback_raw)?;

    Ok(ProfitSettings { grant, fallback })
}

fn config_path(args: &ProfitArgs) -> Option<PathBuf> {
    args.config
        .clone()
        .or_else(|| env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn profit_args() -> ProfitArgs {
        ProfitArgs {
            config: None,
            symbol: None,
            total_options: None,
            strike_price: None,
            vesting_periods: None,
            start_date: None,
            tax_rate: None,
            fallback: None,
            as_of: None,
            currency: String::from("$"),
            timeout_ms: 3_000,
        }
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    const FULL_CONFIG: &str = r#"{
        "symbol": "700",
        "total_options": 50000,
        "strike_price": 20.0,
        "vesting_periods": 5,
        "start_date": "2022-09-01",
        "tax_rate": 0.2,
        "fallback_price": 88.8
    }"#;

    #[test]
    fn loads_a_complete_config_file() {
        let file = write_config(FULL_CONFIG);
        let mut args = profit_args();
        args.config = Some(file.path().to_path_buf());

        let settings = resolve(&args).expect("must resolve");
        assert_eq!(settings.grant.symbol, "700");
        assert_eq!(settings.grant.total_options, 50_000);
        assert_eq!(settings.fallback.get(), 88.8);
    }

    #[test]
    fn flags_override_file_values() {
        let file = write_config(FULL_CONFIG);
        let mut args = profit_args();
        args.config = Some(file.path().to_path_buf());
        args.strike_price = Some(30.0);
        args.fallback = Some(99.9);

        let settings = resolve(&args).expect("must resolve");
        assert_eq!(settings.grant.strike_price, 30.0);
        assert_eq!(settings.fallback.get(), 99.9);
    }

    #[test]
    fn missing_parameter_is_named_in_the_error() {
        let mut args = profit_args();
        args.symbol = Some(String::from("700"));

        let err = resolve(&args).expect_err("must fail");
        assert!(matches!(
            err,
            CliError::MissingParameter {
                name: "total_options"
            }
        ));
    }

    #[test]
    fn invalid_grant_values_are_rejected() {
        let file = write_config(FULL_CONFIG);
        let mut args = profit_args();
        args.config = Some(file.path().to_path_buf());
        args.tax_rate = Some(1.5);

        let err = resolve(&args).expect_err("must fail");
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let file = write_config(r#"{ "symbol": "700", "shares": 1 }"#);
        let mut args = profit_args();
        args.config = Some(file.path().to_path_buf());

        let err = resolve(&args).expect_err("must fail");
        assert!(matches!(err, CliError::Serialization(_)));
    }
}
