//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and making requests.

use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{Request, Response};

/// Get the base URL for API requests
///
/// The backend serves the bundle itself, so API calls go to the same origin
/// the page was loaded from, whatever port the server was started on.
///
/// # Returns
/// - Origin like "http://localhost:3001"
/// - Empty string if window is not available (relative URLs are used then)
pub fn api_base() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/api/chat");
/// ```
pub fn api_url(path: &str) -> String {
    join_url(&api_base(), path)
}

fn join_url(origin: &str, path: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), path)
}

/// Выполнить запрос и разобрать JSON-ответ.
///
/// Любой статус вне 2xx считается ошибкой, тело ответа при этом не читается.
pub async fn fetch_json<T: DeserializeOwned>(request: &Request) -> Result<T, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(|e| format!("{e:?}"))?;
    let resp: Response = resp_value.dyn_into().map_err(|e| format!("{e:?}"))?;

    if !resp.ok() {
        return Err(format!(
            "Network response was not ok: {} {}",
            resp.status(),
            resp.status_text()
        ));
    }

    let text = wasm_bindgen_futures::JsFuture::from(resp.text().map_err(|e| format!("{e:?}"))?)
        .await
        .map_err(|e| format!("{e:?}"))?;
    let text: String = text.as_string().ok_or_else(|| "bad text".to_string())?;
    serde_json::from_str(&text).map_err(|e| format!("{e}"))
}
