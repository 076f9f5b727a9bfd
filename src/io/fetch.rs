use std::path::Path;
use std::time::Duration;

use serde_json::Value;

use crate::model::config::FetchConfig;

/// Built-in model definitions, available without a network.
const BLANK_MODEL: &str = include_str!("../templates/blank.json");
const BUG_TRACKING_MODEL: &str = include_str!("../templates/bug-tracking.json");

/// Errors from remote model and URL fetching
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No endpoint configured and the model is not bundled or local
    #[error("unknown model \"{0}\" and no api_url configured (set one with `cn config set fetch.api_url <url>`)")]
    NoApiUrl(String),
    /// Network or other HTTP error
    #[error("HTTP request failed: {0}")]
    HttpError(String),
    /// Non-2xx response
    #[error("HTTP {status} from {url}")]
    StatusError { status: u16, url: String },
    /// Failed to parse response body
    #[error("response was not valid JSON: {0}")]
    ParseError(String),
}

/// GET a JSON document with the given timeout.
pub fn fetch_json(url: &str, timeout: Duration) -> Result<Value, FetchError> {
    let response = ureq::get(url).timeout(timeout).call();
    match response {
        Ok(resp) => resp
            .into_json()
            .map_err(|e| FetchError::ParseError(e.to_string())),
        Err(ureq::Error::Status(code, _)) => Err(FetchError::StatusError {
            status: code,
            url: url.to_string(),
        }),
        Err(e) => Err(FetchError::HttpError(e.to_string())),
    }
}

/// Endpoint for a named model definition
fn model_url(api_url: &str, name: &str) -> String {
    format!("{}/configs/{}.json", api_url.trim_end_matches('/'), name)
}

/// Fetch a named model from the configured endpoint. The endpoint serves
/// bare section arrays.
pub fn fetch_model(config: &FetchConfig, name: &str) -> Result<Value, FetchError> {
    if config.api_url.is_empty() {
        return Err(FetchError::NoApiUrl(name.to_string()));
    }
    let url = model_url(&config.api_url, name);
    fetch_json(&url, Duration::from_secs(config.timeout_secs))
}

/// Bundled model for `name`, if one ships with the binary.
pub fn builtin_model(name: &str) -> Option<Value> {
    let text = match name {
        "blank" => BLANK_MODEL,
        "bug-tracking" => BUG_TRACKING_MODEL,
        _ => return None,
    };
    serde_json::from_str(text).ok()
}

/// Resolve a model by name: a file under `models/` in the store wins,
/// then the bundled models, then the remote endpoint.
pub fn resolve_model(
    store_dir: &Path,
    config: &FetchConfig,
    name: &str,
) -> Result<Value, FetchError> {
    if let Some(value) = crate::io::store_io::read_local_model(store_dir, name) {
        return Ok(value);
    }
    if let Some(value) = builtin_model(name) {
        return Ok(value);
    }
    fetch_model(config, name)
}
