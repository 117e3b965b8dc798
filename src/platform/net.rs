//! Browser fetch helpers

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCache, RequestInit, RequestMode, Response};

async fn send(request: &Request) -> Result<Response, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response = JsFuture::from(window.fetch_with_request(request)).await?;
    response.dyn_into()
}

/// GET a text resource, bypassing the HTTP cache
pub async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_cache(RequestCache::NoStore);
    let request = Request::new_with_str_and_init(url, &opts)?;

    let response = send(&request).await?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
    }
    let text = JsFuture::from(response.text()?).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

/// POST a plain-text body without CORS. The response is opaque, so only
/// network failures surface as errors.
pub async fn post_plain(url: &str, body: &str) -> Result<(), JsValue> {
    let headers = Headers::new()?;
    headers.set("Content-Type", "text/plain;charset=utf-8")?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::NoCors);
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(body));
    let request = Request::new_with_str_and_init(url, &opts)?;

    send(&request).await?;
    Ok(())
}
