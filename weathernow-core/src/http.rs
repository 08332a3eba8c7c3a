use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::WeatherError;

const USER_AGENT: &str = concat!("weathernow/", env!("CARGO_PKG_VERSION"));

pub(crate) fn client(timeout: Duration) -> Result<Client, WeatherError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| WeatherError::Network(format!("Failed to create HTTP client: {e}")))
}

/// GET `url` with `query` and decode a JSON body.
///
/// Every failure mode (send, status, body, decode) maps to
/// [`WeatherError::Network`]; `what` names the request in the message.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, String)],
    what: &str,
) -> Result<T, WeatherError> {
    debug!(url, ?query, "Sending {what} request");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| WeatherError::Network(format!("Failed to send {what} request: {e}")))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| WeatherError::Network(format!("Failed to read {what} response body: {e}")))?;

    if !status.is_success() {
        return Err(WeatherError::Network(format!(
            "{what} request failed with status {status}: {}",
            truncate_body(&body)
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| WeatherError::Network(format!("Failed to parse {what} JSON: {e}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
