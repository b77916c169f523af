use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CoreError;

/// HTTP verbs used against the dashboard backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// A fully-resolved request: absolute URL, verb, headers and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            ..Self::get(url)
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: Some(body),
            ..Self::get(url)
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// What came back over the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait abstraction over the wire.
///
/// Implementations only move bytes: they return `CoreError::Network` when
/// no response was obtained and a `RawResponse` for *every* status code.
/// Classification of the outcome lives in [`super::fetch::fetch_json`], so
/// the HTTP client can be swapped (or mocked) without touching it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable name of this transport (for logs).
    fn name(&self) -> &str;

    /// Issue the request and read the full body as text.
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, CoreError>;
}
