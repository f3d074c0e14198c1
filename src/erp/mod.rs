//! JSON-RPC client for the external ERP.
//!
//! Issues single best-effort `call_kw` invocations; no caching, retries or
//! batching. Transport failures and RPC-level error payloads are kept as
//! distinct error variants so callers can tell an unreachable ERP apart from
//! a rejected call.

use serde_json::{Value, json};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::domain::types::ErpBaseUrl;
use crate::models::config::ErpConfig;

/// Errors surfaced by [`JsonRpcClient::call`].
#[derive(Debug, Error)]
pub enum ErpError {
    /// The ERP endpoint could not be reached or returned a transport-level
    /// failure. Never retried internally.
    #[error("erp transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The ERP responded but signaled an application-level error.
    #[error("erp remote error: {0}")]
    Remote(String),
}

/// Thin client over the ERP's `/web/dataset/call_kw` JSON-RPC endpoint.
///
/// The underlying `reqwest::Client` pools connections and is cheap to clone.
#[derive(Clone)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    base_url: ErpBaseUrl,
    api_key: String,
}

impl JsonRpcClient {
    pub fn new(config: &ErpConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Base URL of the ERP deployment, used to derive image/content URLs.
    pub fn base_url(&self) -> &ErpBaseUrl {
        &self.base_url
    }

    /// Invokes `model.method(args, kwargs)` on the ERP.
    ///
    /// Returns the `result` field of the response envelope when present,
    /// otherwise the raw decoded body (some endpoints do not wrap their
    /// payload).
    pub async fn call(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, ErpError> {
        let url = format!("{}/web/dataset/call_kw/{model}/{method}", self.base_url);
        let envelope = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {
                "model": model,
                "method": method,
                "args": args,
                "kwargs": kwargs,
            },
            "id": request_id(),
        });

        let response = self
            .http
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&envelope)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        unwrap_envelope(body)
    }
}

/// Unpacks a JSON-RPC response body: an `error` object fails the call, a
/// `result` field is unwrapped, and anything else is returned as-is (some
/// endpoints do not wrap their payload).
fn unwrap_envelope(mut body: Value) -> Result<Value, ErpError> {
    if let Some(error) = body.get("error") {
        return Err(ErpError::Remote(remote_error_message(error)));
    }

    match body.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Ok(body),
    }
}

fn request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Picks the most specific message out of an ERP error payload:
/// `error.data.message`, then `error.message`, then the raw error object.
fn remote_error_message(error: &Value) -> String {
    error
        .pointer("/data/message")
        .and_then(Value::as_str)
        .or_else(|| error.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}
