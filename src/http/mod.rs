//! HTTP session module
//!
//! [`ReqwestSession`] is the production [`Session`]: a reqwest client plus
//! an in-memory cookie jar, default headers and proxy/TLS settings.

use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, SET_COOKIE};
use reqwest::{Client, ClientBuilder};
use url::Url;

use crate::config::{HttpMethod, ProxyMap, ProxyScheme};
use crate::error::{Result, RjarError};
use crate::session::{CookieMap, RequestBody, RequestOptions, Session, SessionOptions};

pub mod cookies;
pub mod response;

use response::Response;

/// reqwest-backed session
pub struct ReqwestSession {
    options: SessionOptions,
    jar: CookieMap,
    client: Option<Client>,
    closed: bool,
}

impl ReqwestSession {
    /// Number of extra attempts made after a connection failure.
    pub fn retries(&self) -> u32 {
        self.options.retries
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn client(&mut self) -> Result<Client> {
        if self.closed {
            return Err(RjarError::Connection(
                "cannot send a request, the session has been closed".to_string(),
            ));
        }
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => {
                let client = build_client(&self.options)?;
                self.client = Some(client.clone());
                Ok(client)
            }
        }
    }

    fn build_request(
        &self,
        client: &Client,
        method: HttpMethod,
        url: &Url,
        options: &RequestOptions,
    ) -> Result<reqwest::Request> {
        let mut request = client.request(method.as_reqwest(), url.clone());

        let mut headers = HeaderMap::new();
        for (name, value) in &self.options.headers {
            insert_header(&mut headers, name, value)?;
        }
        for (name, value) in &options.headers {
            insert_header(&mut headers, name, value)?;
        }
        if !options.cookies.is_empty() {
            let value = cookies::cookies_to_header(&options.cookies);
            headers.insert(COOKIE, header_value(COOKIE.as_str(), &value)?);
        }
        request = request.headers(headers);

        if !options.query.is_empty() {
            request = request.query(&options.query);
        }

        request = match &options.body {
            Some(RequestBody::Json(value)) => request.json(value),
            Some(RequestBody::Form(fields)) => request.form(fields),
            Some(RequestBody::Text(text)) => request.body(text.clone()),
            Some(RequestBody::Bytes(bytes)) => request.body(bytes.clone()),
            None => request,
        };

        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        request.build().map_err(RjarError::Http)
    }

    async fn execute_with_retry(
        &self,
        client: &Client,
        method: HttpMethod,
        url: &Url,
        options: &RequestOptions,
    ) -> Result<reqwest::Response> {
        retry_on_connect(self.retries(), url, || async {
            let request = self.build_request(client, method, url, options)?;
            client.execute(request).await.map_err(RjarError::Http)
        })
        .await
    }

    fn store_response_cookies(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(SET_COOKIE) {
            let Ok(raw) = value.to_str() else {
                continue;
            };
            if let Some((name, value)) = cookies::parse_set_cookie(raw) {
                debug!("Storing cookie {} from response", name);
                self.jar.insert(name, value);
            }
        }
    }
}

#[async_trait]
impl Session for ReqwestSession {
    fn open(options: SessionOptions) -> Result<Self> {
        let client = build_client(&options)?;
        Ok(Self {
            options,
            jar: CookieMap::new(),
            client: Some(client),
            closed: false,
        })
    }

    async fn request(
        &mut self,
        method: HttpMethod,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Response> {
        let url = Url::parse(url)
            .map_err(|e| RjarError::InvalidUrl(format!("Invalid URL '{}': {}", url, e)))?;
        let client = self.client()?;

        debug!("{} {}", method, url);
        let response = self
            .execute_with_retry(&client, method, &url, options)
            .await?;

        let status = response.status();
        let final_url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(RjarError::Http)?;
        debug!("{} {} -> {}", method, final_url, status);

        self.store_response_cookies(&headers);

        Ok(Response::new(status, final_url)
            .with_headers(headers)
            .with_body(body.to_vec()))
    }

    fn cookies(&self) -> CookieMap {
        self.jar.clone()
    }

    fn update_cookies(&mut self, cookies: &CookieMap) {
        self.jar
            .extend(cookies.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.options.headers
    }

    fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.options.headers
    }

    fn proxies(&self) -> &ProxyMap {
        &self.options.proxies
    }

    fn set_proxies(&mut self, proxies: ProxyMap) {
        if self.options.proxies != proxies {
            self.options.proxies = proxies;
            self.client = None;
        }
    }

    fn verify(&self) -> bool {
        self.options.verify
    }

    fn set_verify(&mut self, verify: bool) {
        if self.options.verify != verify {
            self.options.verify = verify;
            self.client = None;
        }
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("Session closed");
        }
        self.closed = true;
    }
}

/// Run `operation`, repeating it up to `retries` more times while it fails to connect.
async fn retry_on_connect<F, Fut, T>(retries: u32, target: &Url, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(RjarError::Http(err)) if err.is_connect() && attempt < retries => {
                attempt += 1;
                warn!(
                    "Connection to {} failed (attempt {}/{}): {}",
                    target,
                    attempt,
                    retries + 1,
                    err
                );
            }
            Err(err) => return Err(err),
        }
    }
}

fn build_client(options: &SessionOptions) -> Result<Client> {
    let mut builder = ClientBuilder::new();

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    for (key, proxy_url) in &options.proxies {
        let proxy = ProxyScheme::parse(key)?.to_proxy(proxy_url)?;
        builder = builder.proxy(proxy);
    }

    if !options.verify {
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().map_err(RjarError::Http)
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let header_name = HeaderName::from_str(name)
        .map_err(|e| RjarError::Config(format!("Invalid header name '{}': {}", name, e)))?;
    headers.insert(header_name, header_value(name, value)?);
    Ok(())
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| RjarError::Config(format!("Invalid value for header '{}': {}", name, e)))
}
