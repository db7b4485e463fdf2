//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Storage (LocalStorage on web)
//! - Haptics
//! - Catalog fetch

use chrono::{DateTime, Utc};

/// Current wall-clock time
#[cfg(target_arch = "wasm32")]
pub fn now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// The page's LocalStorage, if the browser grants access
#[cfg(target_arch = "wasm32")]
pub fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Buzz the device with an on/off pattern in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn vibrate(pattern: &[u32]) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let array = js_sys::Array::new();
    for ms in pattern {
        array.push(&wasm_bindgen::JsValue::from(*ms));
    }
    // Unsupported on desktop browsers; failure is harmless
    let _ = window.navigator().vibrate_with_pattern(&array);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn vibrate(_pattern: &[u32]) {
    // No haptics natively
}

/// Fetch a text resource relative to the page
#[cfg(target_arch = "wasm32")]
pub async fn fetch_text(url: &str) -> Result<String, crate::error::CatalogError> {
    use crate::error::CatalogError;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fail = |e: wasm_bindgen::JsValue| CatalogError::Fetch(format!("{e:?}"));

    let window = web_sys::window().ok_or_else(|| CatalogError::Fetch("no window".into()))?;
    let response = JsFuture::from(window.fetch_with_str(url)).await.map_err(fail)?;
    let response: web_sys::Response = response.dyn_into().map_err(fail)?;
    if !response.ok() {
        return Err(CatalogError::Fetch(format!(
            "{url}: HTTP {}",
            response.status()
        )));
    }
    let text = JsFuture::from(response.text().map_err(fail)?)
        .await
        .map_err(fail)?;
    text.as_string()
        .ok_or_else(|| CatalogError::Fetch(format!("{url}: body is not text")))
}
