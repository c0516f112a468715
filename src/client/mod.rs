//! Network transport for backend calls
//!
//! The [`Transport`] trait is the seam between the cache, the session helpers
//! and the real HTTP stack. Responses keep a fetch-like shape: an `ok` flag
//! plus a JSON body that may already be parsed.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::{ApiError, Result};

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::{HttpTransport, SessionCookies};
#[cfg(test)]
pub use mock::MockTransport;

/// Whether a request carries the session cookies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Credentials {
    Omit,
    #[default]
    SameOrigin,
    Include,
}

/// Per-request options
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub credentials: Credentials,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            credentials: Credentials::default(),
            body: None,
        }
    }
}

impl RequestOptions {
    /// Plain GET request
    pub fn get() -> Self {
        Self::default()
    }

    /// POST with a JSON body
    pub fn post_json(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
        .with_header("Content-Type", "application/json")
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Look up a header value, ignoring name case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Layer caller headers over defaults; the caller wins on a name collision
pub fn merge_headers(
    defaults: &[(&str, &str)],
    caller: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = defaults
        .iter()
        .filter(|(name, _)| !caller.iter().any(|(k, _)| k.eq_ignore_ascii_case(name)))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    merged.extend(caller.iter().cloned());
    merged
}

/// Response body, either decoded JSON or the raw text
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Parsed(Value),
    Raw(String),
}

/// Response returned by a [`Transport`] or synthesized by the cache
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl FetchResponse {
    /// Successful response wrapping already-decoded JSON
    pub fn from_json(value: Value) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Parsed(value),
        }
    }

    /// Response carrying an undecoded body
    pub fn raw(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Raw(text.into()),
        }
    }

    /// True for 2xx statuses
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON
    pub fn json(&self) -> Result<Value> {
        match &self.body {
            ResponseBody::Parsed(value) => Ok(value.clone()),
            ResponseBody::Raw(text) => serde_json::from_str(text).map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into()
            }),
        }
    }

    /// Body as text
    pub fn text(&self) -> String {
        match &self.body {
            ResponseBody::Parsed(value) => value.to_string(),
            ResponseBody::Raw(text) => text.clone(),
        }
    }

    /// The `message` field of a JSON body, if there is one
    pub fn message(&self) -> Option<String> {
        self.json()
            .ok()?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }
}

/// Asynchronous network fetch
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a request. An `Err` means no response was received at all.
    async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<FetchResponse>;
}
