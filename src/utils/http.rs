use std::time::Duration;

use reqwest::{header::USER_AGENT, Client};
use thiserror::Error;

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 15;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Request(e)
        }
    }
}

/// Build the client shared by every outbound request of the process.
pub fn build_client() -> Result<Client, HttpError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_TIMEOUT))
        .build()
        .map_err(HttpError::Client)
}

/// Makes a GET request to the specified URL
///
/// # Arguments
/// * `client` - Shared HTTP client
/// * `url` - The URL to request
/// * `user_agent` - Value of the `User-Agent` header
/// * `timeout` - Deadline for the whole exchange, body included
///
/// # Returns
/// * `Ok(String)` - The response body as a string
/// * `Err(HttpError)` - Transport failure, timeout or non-2xx status
pub async fn web_get_async(
    client: &Client,
    url: &str,
    user_agent: &str,
    timeout: Duration,
) -> Result<String, HttpError> {
    let response = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(HttpError::Status(response.status()));
    }

    Ok(response.text().await?)
}

/// Same as [`web_get_async`] but decodes the body as JSON.
pub async fn web_get_json_async(
    client: &Client,
    url: &str,
    user_agent: &str,
    timeout: Duration,
) -> Result<serde_json::Value, HttpError> {
    let response = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(HttpError::Status(response.status()));
    }

    Ok(response.json().await?)
}
