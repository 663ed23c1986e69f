use crate::constants::{PRICE_URL_ATTR, TOKEN_AMOUNT_ATTR, TOKEN_AMOUNT_SELECTOR};
use crate::dom;
use glow_core::{effective_rate, format_usd, parse_token_amount, PriceError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Fetch `{"usd": <rate>}` from the price endpoint.
pub async fn fetch_rate(url: &str) -> Result<f64, PriceError> {
    let window = web::window().ok_or_else(|| PriceError::Unreachable("no window".into()))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| PriceError::Unreachable(format!("{:?}", e)))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|_| PriceError::Malformed("fetch did not return a Response".into()))?;
    if !resp.ok() {
        return Err(PriceError::Unreachable(format!("HTTP {}", resp.status())));
    }
    let body = resp
        .json()
        .map_err(|e| PriceError::Malformed(format!("{:?}", e)))?;
    let json = JsFuture::from(body)
        .await
        .map_err(|e| PriceError::Malformed(format!("{:?}", e)))?;
    js_sys::Reflect::get(&json, &JsValue::from_str("usd"))
        .ok()
        .and_then(|v| v.as_f64())
        .ok_or_else(|| PriceError::Malformed("missing numeric `usd` field".into()))
}

/// Write a USD estimate into every element carrying `data-token-amount`.
/// A failed lookup falls back to the fixed rate; nothing is left blank.
pub async fn fill_estimates(document: web::Document) {
    let targets = dom::query_all(&document, TOKEN_AMOUNT_SELECTOR);
    if targets.is_empty() {
        return;
    }
    let url = document
        .body()
        .and_then(|b| b.get_attribute(PRICE_URL_ATTR));
    let lookup = match url {
        Some(url) => fetch_rate(&url).await,
        None => Err(PriceError::Unreachable(format!("no {} on <body>", PRICE_URL_ATTR))),
    };
    let rate = effective_rate(lookup);
    for el in &targets {
        let Some(amount) = el
            .get_attribute(TOKEN_AMOUNT_ATTR)
            .as_deref()
            .and_then(parse_token_amount)
        else {
            continue;
        };
        el.set_text_content(Some(&format!("\u{2248} {}", format_usd(amount * rate))));
    }
    log::info!("[price] filled {} estimates at {}", targets.len(), rate);
}
