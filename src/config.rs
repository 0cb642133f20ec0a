//! Configuration management for rjar

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, RjarError};

/// Default number of connection retries handed to the transport.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Proxy URLs keyed by scheme pattern (`"http://"`, `"https://"`, `"all://"`).
pub type ProxyMap = BTreeMap<String, String>;

/// HTTP verbs the wrapper forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{}", method)
    }
}

impl FromStr for HttpMethod {
    type Err = RjarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(RjarError::Config(format!("Unknown HTTP method: {}", other))),
        }
    }
}

/// Which requests a proxy entry applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyScheme {
    Http,
    Https,
    All,
}

impl ProxyScheme {
    /// Parse a proxy map key such as `https://` or `all`.
    pub fn parse(key: &str) -> Result<Self> {
        let scheme = key.trim().trim_end_matches("://").to_ascii_lowercase();
        match scheme.as_str() {
            "http" => Ok(ProxyScheme::Http),
            "https" => Ok(ProxyScheme::Https),
            "all" | "*" => Ok(ProxyScheme::All),
            _ => Err(RjarError::Proxy(format!(
                "Unsupported proxy scheme key: '{}'. Expected http://, https:// or all://",
                key
            ))),
        }
    }

    /// Build the reqwest proxy for this scheme.
    pub fn to_proxy(self, proxy_url: &str) -> Result<reqwest::Proxy> {
        let proxy = match self {
            ProxyScheme::Http => reqwest::Proxy::http(proxy_url),
            ProxyScheme::Https => reqwest::Proxy::https(proxy_url),
            ProxyScheme::All => reqwest::Proxy::all(proxy_url),
        };
        proxy.map_err(|e| RjarError::Proxy(format!("Invalid proxy '{}': {}", proxy_url, e)))
    }
}

/// Settings consumed once to open a session
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub headers: HashMap<String, String>,
    pub proxies: ProxyMap,
    /// `None` keeps the HTTP library's own default.
    pub default_timeout: Option<Duration>,
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            headers: HashMap::new(),
            proxies: ProxyMap::new(),
            default_timeout: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl ClientConfig {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_proxy(mut self, scheme: impl Into<String>, url: impl Into<String>) -> Self {
        self.proxies.insert(scheme.into(), url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Proxy use turns certificate verification off for the whole session.
    pub fn verify_certs(&self) -> bool {
        self.proxies.is_empty()
    }
}
