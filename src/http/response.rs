//! HTTP response handling

use crate::error::Result;
use crate::mailer::Notification;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    url: String,
    headers: HeaderMap,
    body: Vec<u8>,
    notification: Notification,
}

impl Response {
    pub fn new(status: StatusCode, url: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Vec::new(),
            notification: Notification::NotConfigured,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(HeaderName::from_static(name), value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// True only for exactly 200, the one status that never triggers an alert.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Outcome of the status alert for this response, if one was attempted.
    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub(crate) fn set_notification(&mut self, notification: Notification) {
        self.notification = notification;
    }
}
