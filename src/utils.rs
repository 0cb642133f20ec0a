//! Parsing helpers for command-line style inputs

use crate::config::ProxyScheme;
use crate::error::{Result, RjarError};
use std::time::Duration;
use url::Url;

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate and normalize URL
    pub fn validate_url(input: &str) -> Result<Url> {
        // Add http:// if no scheme is provided
        let url_str = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        Url::parse(&url_str)
            .map_err(|e| RjarError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))
    }
}

/// String utilities
pub struct StringUtils;

impl StringUtils {
    /// Parse `Name: value` header lines
    pub fn parse_header(input: &str) -> Result<(String, String)> {
        match input.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(RjarError::Config(format!(
                "Invalid header format: '{}'. Expected 'key: value'",
                input
            ))),
        }
    }

    /// Parse `NAME=VALUE` cookie pairs
    pub fn parse_cookie(input: &str) -> Result<(String, String)> {
        match input.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(RjarError::Config(format!(
                "Invalid cookie format: '{}'. Expected 'NAME=VALUE'",
                input
            ))),
        }
    }

    /// Parse `SCHEME=PROXY_URL` proxy entries, e.g. `https://=http://127.0.0.1:8080`
    pub fn parse_proxy(input: &str) -> Result<(String, String)> {
        let (scheme, proxy_url) = input.split_once('=').ok_or_else(|| {
            RjarError::Proxy(format!(
                "Invalid proxy format: '{}'. Expected 'SCHEME=PROXY_URL'",
                input
            ))
        })?;
        ProxyScheme::parse(scheme)?;
        Url::parse(proxy_url)
            .map_err(|e| RjarError::Proxy(format!("Invalid proxy URL '{}': {}", proxy_url, e)))?;
        Ok((scheme.trim().to_string(), proxy_url.to_string()))
    }

    /// Parse timeout values (supports suffixes like 's', 'm', 'h' and fractional seconds)
    pub fn parse_timeout(input: &str) -> Result<Duration> {
        if let Ok(seconds) = input.parse::<f64>() {
            return seconds_to_duration(input, seconds);
        }

        let (number_part, scale) = if let Some(stripped) = input.strip_suffix('s') {
            (stripped, 1.0)
        } else if let Some(stripped) = input.strip_suffix('m') {
            (stripped, 60.0)
        } else if let Some(stripped) = input.strip_suffix('h') {
            (stripped, 3600.0)
        } else {
            return Err(RjarError::Config(format!(
                "Invalid timeout format: '{}'. Use number with optional suffix (s/m/h)",
                input
            )));
        };

        let number: f64 = number_part
            .parse()
            .map_err(|_| RjarError::Config(format!("Invalid timeout number: '{}'", number_part)))?;

        seconds_to_duration(input, number * scale)
    }
}

fn seconds_to_duration(input: &str, seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| RjarError::Config(format!("Invalid timeout value: '{}'", input)))
}
