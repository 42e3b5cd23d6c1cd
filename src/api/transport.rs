// src/api/transport.rs

//! Request execution against the remote data service.
//!
//! Reads are `GET ?action=<name>&...`, writes are a `POST` whose JSON body is
//! `{ action, token, ...fields }`. Either way the answer is a JSON value; an
//! object carrying a truthy `error` member is a logical failure whatever the
//! HTTP status was.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::ApiConfig;
use crate::storage::SessionStorage;
use crate::utils::http::create_async_client;
use crate::utils::url::{action_url, redacted};

/// Transport seam between the typed client and the wire.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a read action with extra query parameters.
    async fn get(&self, action: &str, params: &[(&str, &str)]) -> Result<Value>;

    /// Issue a write action carrying `fields`.
    async fn post(&self, action: &str, fields: Map<String, Value>) -> Result<Value>;
}

/// HTTP transport backed by reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    read_timeout: Duration,
    write_timeout: Duration,
    session: Arc<dyn SessionStorage>,
}

impl HttpTransport {
    /// Create a transport for the configured endpoint.
    ///
    /// The bearer token for writes is read from `session` on every call.
    pub fn new(config: &ApiConfig, session: Arc<dyn SessionStorage>) -> Result<Self> {
        url::Url::parse(&config.endpoint)?;
        Ok(Self {
            client: create_async_client(config)?,
            endpoint: config.endpoint.clone(),
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
            session,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Read the whole response and apply the envelope contract.
    async fn finish(
        &self,
        action: &str,
        response: reqwest::Response,
        deadline: Duration,
        started: Instant,
    ) -> Result<Value> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| send_error(action, e, deadline))?;
        log::debug!(
            "{} -> {} ({} bytes) in {:?}",
            action,
            status,
            bytes.len(),
            started.elapsed()
        );

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::invalid_body(action, format!("HTTP {status}: {e}")))?;
        check_envelope(action, value)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, action: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = action_url(&self.endpoint, action, params)?;
        log::debug!("GET {} action={}", redacted(&url), action);

        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .timeout(self.read_timeout)
            .send()
            .await
            .map_err(|e| send_error(action, e, self.read_timeout))?;

        self.finish(action, response, self.read_timeout, started)
            .await
    }

    async fn post(&self, action: &str, fields: Map<String, Value>) -> Result<Value> {
        let session = self.session.load().await?;

        let mut body = Map::with_capacity(fields.len() + 2);
        body.insert("action".into(), Value::String(action.to_string()));
        body.insert("token".into(), Value::String(session.bearer().to_string()));
        body.extend(fields);
        let payload = serde_json::to_string(&body)?;
        log::debug!("POST action={} ({} bytes)", action, payload.len());

        // A string body, like a browser fetch, so Apps Script skips the preflight.
        let started = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(payload)
            .timeout(self.write_timeout)
            .send()
            .await
            .map_err(|e| send_error(action, e, self.write_timeout))?;

        self.finish(action, response, self.write_timeout, started)
            .await
    }
}

/// Read URLs carry login credentials; errors never keep the URL.
fn send_error(action: &str, error: reqwest::Error, deadline: Duration) -> AppError {
    if error.is_timeout() {
        AppError::timeout(action, deadline.as_secs())
    } else {
        AppError::Http(error.without_url())
    }
}

/// Fail with a remote error when the payload carries a truthy `error` member.
pub fn check_envelope(action: &str, value: Value) -> Result<Value> {
    let message = match value.get("error") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };
    match message {
        Some(message) => {
            log::warn!("{} rejected by data service: {}", action, message);
            Err(AppError::remote(action, message))
        }
        None => Ok(value),
    }
}
