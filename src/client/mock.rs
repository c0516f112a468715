//! Mock transport for testing
//!
//! Replays queued responses in order and records every request so tests can
//! assert on what reached the network.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{FetchResponse, RequestOptions, Transport};
use crate::error::{ApiError, Result};

/// A request seen by the mock
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub url: String,
    pub options: RequestOptions,
}

/// Scripted response: a reply or a transport failure
#[derive(Debug, Clone)]
enum Scripted {
    Reply(FetchResponse),
    Fail(String),
}

/// Mock transport for unit tests.
///
/// # Example
/// ```ignore
/// let mock = MockTransport::new().with_json(200, json!({"videos": []}));
/// let response = mock.fetch("/videos", &RequestOptions::get()).await?;
/// assert_eq!(mock.call_count().await, 1);
/// ```
#[derive(Default, Clone)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, scripted: Scripted) -> Self {
        if let Ok(mut queue) = self.responses.try_lock() {
            queue.push_back(scripted);
        }
        self
    }

    /// Queue a JSON reply
    pub fn with_json(self, status: u16, body: Value) -> Self {
        self.push(Scripted::Reply(FetchResponse::raw(status, body.to_string())))
    }

    /// Queue a reply with an arbitrary text body
    pub fn with_text(self, status: u16, body: &str) -> Self {
        self.push(Scripted::Reply(FetchResponse::raw(status, body)))
    }

    /// Queue a transport failure
    pub fn with_network_error(self, message: &str) -> Self {
        self.push(Scripted::Fail(message.to_string()))
    }

    /// Number of requests received so far
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Requests received so far, oldest first
    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<FetchResponse> {
        self.requests.lock().await.push(CapturedRequest {
            url: url.to_string(),
            options: options.clone(),
        });

        match self.responses.lock().await.pop_front() {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(ApiError::Network(message).into()),
            None => Err(ApiError::Network(format!("no response queued for {}", url)).into()),
        }
    }
}
