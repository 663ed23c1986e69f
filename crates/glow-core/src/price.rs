//! USD estimates for token amounts shown next to grant figures.
//!
//! The rate comes from an external lookup. Whenever that lookup fails, or
//! returns something that isn't a usable rate, the fixed fallback rate is
//! used so the page always shows a number.

use crate::constants::FALLBACK_USD_RATE;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PriceError {
    #[error("price service unreachable: {0}")]
    Unreachable(String),
    #[error("malformed price response: {0}")]
    Malformed(String),
    #[error("unusable rate {0}")]
    InvalidRate(f64),
}

/// Accept only finite, positive rates.
pub fn validate_rate(rate: f64) -> Result<f64, PriceError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(PriceError::InvalidRate(rate))
    }
}

/// The rate to display with, falling back on any lookup failure.
pub fn effective_rate(lookup: Result<f64, PriceError>) -> f64 {
    match lookup.and_then(validate_rate) {
        Ok(rate) => rate,
        Err(e) => {
            log::warn!("[price] {}; using fallback rate {}", e, FALLBACK_USD_RATE);
            FALLBACK_USD_RATE
        }
    }
}

/// `quantity` tokens in USD at the looked-up rate, or at the fallback rate.
pub fn usd_estimate(quantity: f64, lookup: Result<f64, PriceError>) -> f64 {
    quantity * effective_rate(lookup)
}

/// Format as `$1,234.56`. Non-finite values render as `$0.00`.
pub fn format_usd(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Parse a token amount as written in page content, e.g. `12,500`.
pub fn parse_token_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
