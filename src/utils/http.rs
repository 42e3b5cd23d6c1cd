// src/utils/http.rs

//! HTTP client utilities.

use crate::error::Result;
use crate::models::ApiConfig;

/// Create a configured asynchronous HTTP client.
///
/// Deadlines are applied per request, since reads and writes use different ones.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .build()?;
    Ok(client)
}
