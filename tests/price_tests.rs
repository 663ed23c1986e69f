// Host-side tests for the token USD estimate and its fallback rate.

use glow_core::*;

#[test]
fn failed_lookup_uses_fallback_rate() {
    let quantity = 12_500.0;
    let lookup = Err(PriceError::Unreachable("connection refused".into()));
    let usd = usd_estimate(quantity, lookup);
    assert!((usd - quantity * 0.1).abs() < 1e-9);
    assert_eq!(FALLBACK_USD_RATE, 0.1);
}

#[test]
fn successful_lookup_uses_the_live_rate() {
    assert!((usd_estimate(200.0, Ok(0.25)) - 50.0).abs() < 1e-9);
}

#[test]
fn unusable_rates_fall_back() {
    for bad in [f64::NAN, f64::INFINITY, 0.0, -3.0] {
        assert_eq!(effective_rate(Ok(bad)), FALLBACK_USD_RATE, "rate {bad}");
    }
    assert_eq!(
        effective_rate(Err(PriceError::Malformed("no usd".into()))),
        FALLBACK_USD_RATE
    );
}

#[test]
fn validate_rate_reports_the_bad_value() {
    assert_eq!(validate_rate(1.5), Ok(1.5));
    assert_eq!(validate_rate(-1.0), Err(PriceError::InvalidRate(-1.0)));
}

#[test]
fn usd_formatting_groups_thousands() {
    assert_eq!(format_usd(0.0), "$0.00");
    assert_eq!(format_usd(1250.0), "$1,250.00");
    assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
    assert_eq!(format_usd(999.999), "$1,000.00");
    assert_eq!(format_usd(-42.5), "-$42.50");
    assert_eq!(format_usd(f64::NAN), "$0.00");
}

#[test]
fn token_amounts_parse_with_separators() {
    assert_eq!(parse_token_amount("12,500"), Some(12_500.0));
    assert_eq!(parse_token_amount(" 1 000.5 "), Some(1000.5));
    assert_eq!(parse_token_amount("1_000"), Some(1000.0));
    assert_eq!(parse_token_amount("n/a"), None);
    assert_eq!(parse_token_amount(""), None);
}
