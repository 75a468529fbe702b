//! Behavior tests for grant valuation, including the full fetch-then-value
//! journey over a scripted transport.

use vestick_core::{compute_profit, GrantConfig, GrantDate};
use vestick_tests::{fetcher_with, price, HttpError, HttpResponse, PAYLOAD_25};

fn date(input: &str) -> GrantDate {
    GrantDate::parse(input).expect("valid date")
}

fn tencent_grant() -> GrantConfig {
    GrantConfig::new("700", 50_000, 20.0, 5, date("2022-09-01"), 0.2).expect("valid grant")
}

#[tokio::test]
async fn fetched_price_flows_into_the_valuation() {
    let fetcher = fetcher_with(vec![Ok(HttpResponse::ok(PAYLOAD_25))]);

    let outcome = fetcher.fetch_price("700", price(1.0)).await;
    let breakdown = compute_profit(&tencent_grant(), outcome.price, date("2025-09-02"));

    assert_eq!(breakdown.completed_periods, 3);
    assert_eq!(breakdown.vested_options, 30_000);
    assert_eq!(breakdown.vested_ratio, 0.6);
    assert_eq!(breakdown.gross_profit, 150_000.0);
    assert_eq!(breakdown.net_profit, 120_000.0);
}

#[tokio::test]
async fn valuation_survives_a_total_quote_outage() {
    let fetcher = fetcher_with(vec![
        Err(HttpError::new("dns failure")),
        Err(HttpError::new("dns failure")),
    ]);

    let outcome = fetcher.fetch_price("700", price(25.0)).await;
    let breakdown = compute_profit(&tencent_grant(), outcome.price, date("2025-09-02"));

    // The configured fallback keeps the run alive with the same numbers.
    assert!(outcome.used_fallback());
    assert_eq!(breakdown.net_profit, 120_000.0);
}

#[test]
fn nothing_vests_before_the_grant_starts() {
    for as_of in ["2020-01-01", "2022-08-31"] {
        let breakdown = compute_profit(&tencent_grant(), price(25.0), date(as_of));
        assert_eq!(breakdown.completed_periods, 0, "as_of {as_of}");
        assert_eq!(breakdown.vested_options, 0, "as_of {as_of}");
    }
}

#[test]
fn fully_vested_grant_caps_count_but_keeps_counting_years() {
    let grant = tencent_grant();
    let at_five = compute_profit(&grant, price(25.0), date("2027-09-01"));
    let at_eight = compute_profit(&grant, price(25.0), date("2030-09-01"));

    assert_eq!(at_five.completed_periods, 5);
    assert_eq!(at_eight.completed_periods, 8);
    for breakdown in [at_five, at_eight] {
        assert_eq!(breakdown.vested_options, 50_000);
        assert_eq!(breakdown.vested_ratio, 1.0);
        assert_eq!(breakdown.gross_profit, 250_000.0);
    }
}

#[test]
fn uneven_grants_leave_remainder_shares_unvested() {
    let grant =
        GrantConfig::new("700", 10_000, 20.0, 3, date("2022-09-01"), 0.2).expect("valid grant");
    let breakdown = compute_profit(&grant, price(25.0), date("2026-01-01"));

    // 10_000 / 3 floors to 3_333 per tranche; one share never vests.
    assert_eq!(breakdown.vested_options, 9_999);
    assert!(breakdown.vested_ratio < 1.0);
}

#[test]
fn valuation_is_a_pure_function_of_its_inputs() {
    let grant = tencent_grant();
    let first = compute_profit(&grant, price(25.0), date("2025-09-02"));
    let second = compute_profit(&grant, price(25.0), date("2025-09-02"));
    assert_eq!(first, second);
}
