//! JSON over HTTP GET
//!
//! The single entry point every provider goes through: one GET, status
//! check, JSON decode. No timeout and no retry, a failed attempt ends the
//! calling chain.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{Result, WeatherPageError};

pub const DEFAULT_ERROR_LABEL: &str = "Something went wrong!";

/// Thin wrapper around a shared `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct JsonFetcher {
    client: Client,
}

impl JsonFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// A non-2xx status fails with [`WeatherPageError::HttpStatus`] carrying
    /// `error_label`; network and decode failures surface as
    /// [`WeatherPageError::Transport`].
    #[instrument(skip(self, url), fields(url = %redact(url)))]
    pub async fn fetch_json(&self, url: &str, error_label: &str) -> Result<Value> {
        debug!("Sending request");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "{}", error_label);
            return Err(WeatherPageError::http_status(error_label, status.as_u16()));
        }

        let body = response.json::<Value>().await?;
        Ok(body)
    }

    /// [`Self::fetch_json`] with the default label
    pub async fn fetch_json_default(&self, url: &str) -> Result<Value> {
        self.fetch_json(url, DEFAULT_ERROR_LABEL).await
    }
}

/// Decode an already-fetched JSON value into a typed response.
///
/// Shape mismatches are the provider's fault, not the transport's.
pub fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| WeatherPageError::malformed(format!("{what}: {e}")))
}

/// Strip credentials from a URL before it reaches the logs
pub(crate) fn redact(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let params: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_secret_param(key) => format!("{key}=***"),
            _ => pair.to_string(),
        })
        .collect();

    format!("{base}?{}", params.join("&"))
}

fn is_secret_param(key: &str) -> bool {
    matches!(key, "access_token" | "appid" | "key" | "api_key")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        "https://api.mapbox.com/x.json?access_token=pk.secret",
        "https://api.mapbox.com/x.json?access_token=***"
    )]
    #[case(
        "https://x/onecall?lat=1&lon=2&units=metric&appid=abc",
        "https://x/onecall?lat=1&lon=2&units=metric&appid=***"
    )]
    #[case("https://x/plain", "https://x/plain")]
    fn test_redact(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(redact(url), expected);
    }

    #[derive(Debug, serde::Deserialize)]
    struct Shape {
        #[allow(dead_code)]
        features: Vec<Value>,
    }

    #[test]
    fn test_decode_mismatch_is_malformed() {
        let result: Result<Shape> = decode(serde_json::json!({"nope": 1}), "geocoding");
        let err = result.unwrap_err();
        assert!(matches!(err, WeatherPageError::MalformedResponse(_)));
        assert!(err.to_string().contains("geocoding"));
    }
}
