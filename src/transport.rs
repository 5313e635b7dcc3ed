//! HTTP access behind a trait so acquisition and probing can be exercised offline

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

/// Blocking GET; any received status is a successful exchange, only transport failures are errors
pub trait Transport: Send + Sync {
    fn get(
        &self,
        url: &str,
        accept: Option<&str>,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn get(
        &self,
        url: &str,
        accept: Option<&str>,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.get(url).timeout(timeout);
        if let Some(accept) = accept {
            request = request.header(reqwest::header::ACCEPT, accept);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                TransportError::Network {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| TransportError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// Canned transport; URLs without a registered reply fail like a refused connection
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, Result<HttpResponse, String>>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_response(&self, url: impl Into<String>, response: HttpResponse) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), Ok(response));
    }

    pub fn add_json(&self, url: impl Into<String>, document: &serde_json::Value) {
        self.add_response(url, HttpResponse::new(200, document.to_string()));
    }

    pub fn add_failure(&self, url: impl Into<String>, message: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), Err(message.into()));
    }

    /// URLs requested so far, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Transport for MockTransport {
    fn get(
        &self,
        url: &str,
        _accept: Option<&str>,
        _timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned();

        match reply {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Network {
                url: url.to_string(),
                message,
            }),
            None => Err(TransportError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}
