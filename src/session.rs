//! Session abstraction
//!
//! A session is the stateful HTTP client the wrapper drives: it owns the
//! cookie jar, default headers and proxy/TLS settings. The wrapper only
//! talks to it through the [`Session`] trait so tests can swap in a fake.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{ClientConfig, HttpMethod, ProxyMap, DEFAULT_MAX_RETRIES};
use crate::error::Result;
use crate::http::response::Response;

/// Cookie name to value
pub type CookieMap = BTreeMap<String, String>;

/// Everything a session is opened with
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub headers: HashMap<String, String>,
    pub proxies: ProxyMap,
    pub verify: bool,
    pub timeout: Option<Duration>,
    pub retries: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            headers: HashMap::new(),
            proxies: ProxyMap::new(),
            verify: true,
            timeout: None,
            retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl From<&ClientConfig> for SessionOptions {
    fn from(config: &ClientConfig) -> Self {
        SessionOptions {
            headers: config.headers.clone(),
            proxies: config.proxies.clone(),
            verify: config.verify_certs(),
            timeout: config.default_timeout,
            retries: config.max_retries,
        }
    }
}

/// Request body variants
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
    Text(String),
    Bytes(Vec<u8>),
}

/// Per-call arguments forwarded to the session.
///
/// `cookies` is reserved: the wrapper replaces it with the current jar
/// before every call, so values set here never reach the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub timeout: Option<Duration>,
    pub cookies: CookieMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.body = Some(RequestBody::Form(fields));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(RequestBody::Bytes(body.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Capabilities the wrapper needs from the underlying HTTP client
#[async_trait]
pub trait Session: Send {
    /// Open a session. Must not perform network I/O.
    fn open(options: SessionOptions) -> Result<Self>
    where
        Self: Sized;

    async fn request(
        &mut self,
        method: HttpMethod,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Response>;

    async fn get(&mut self, url: &str, options: &RequestOptions) -> Result<Response> {
        self.request(HttpMethod::Get, url, options).await
    }

    async fn post(&mut self, url: &str, options: &RequestOptions) -> Result<Response> {
        self.request(HttpMethod::Post, url, options).await
    }

    async fn put(&mut self, url: &str, options: &RequestOptions) -> Result<Response> {
        self.request(HttpMethod::Put, url, options).await
    }

    async fn delete(&mut self, url: &str, options: &RequestOptions) -> Result<Response> {
        self.request(HttpMethod::Delete, url, options).await
    }

    /// Snapshot of the cookie jar.
    fn cookies(&self) -> CookieMap;

    /// Merge into the cookie jar, overwriting existing names.
    fn update_cookies(&mut self, cookies: &CookieMap);

    fn headers(&self) -> &HashMap<String, String>;

    fn headers_mut(&mut self) -> &mut HashMap<String, String>;

    fn proxies(&self) -> &ProxyMap;

    fn set_proxies(&mut self, proxies: ProxyMap);

    fn verify(&self) -> bool;

    fn set_verify(&mut self, verify: bool);

    fn close(&mut self);
}
