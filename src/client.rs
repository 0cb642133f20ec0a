//! Cookie-carrying client wrapper
//!
//! [`HttpClientWrapper`] owns one [`Session`], injects the session's
//! cookies into every call and, for GET and POST, reports failures through
//! an optional [`ErrorAlert`].

use std::backtrace::Backtrace;
use std::fmt;

use log::{debug, error, warn};

use crate::config::{ClientConfig, HttpMethod};
use crate::error::{Result, RjarError};
use crate::http::response::Response;
use crate::http::ReqwestSession;
use crate::mailer::{self, ErrorAlert, Mailer, Notification};
use crate::session::{CookieMap, RequestOptions, Session, SessionOptions};

/// A failed GET or POST: the original error plus what happened to the alert.
#[derive(Debug)]
pub struct RequestFailure {
    pub error: RjarError,
    pub notification: Notification,
}

impl RequestFailure {
    pub fn into_inner(self) -> RjarError {
        self.error
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for RequestFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<RequestFailure> for RjarError {
    fn from(failure: RequestFailure) -> Self {
        failure.error
    }
}

/// The verbs that report failures through the alert
#[derive(Debug, Clone, Copy)]
enum ReportedVerb {
    Get,
    Post,
}

impl ReportedVerb {
    fn method(self) -> HttpMethod {
        match self {
            ReportedVerb::Get => HttpMethod::Get,
            ReportedVerb::Post => HttpMethod::Post,
        }
    }
}

/// HTTP client wrapper
pub struct HttpClientWrapper<S: Session = ReqwestSession> {
    config: ClientConfig,
    session: S,
    alert: Option<ErrorAlert>,
}

impl HttpClientWrapper<ReqwestSession> {
    /// Create a wrapper around a reqwest session.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_session_type(config)
    }
}

impl<S: Session> HttpClientWrapper<S> {
    /// Open a session of type `S` from `config`. No request is sent.
    ///
    /// A non-empty proxy map disables TLS certificate verification for
    /// the whole session.
    pub fn with_session_type(config: ClientConfig) -> Result<Self> {
        let mut session = S::open(SessionOptions::from(&config))?;
        session.headers_mut().extend(config.headers.clone());

        if !config.proxies.is_empty() {
            warn!("Proxy configured: TLS certificate verification is disabled for this session");
            session.set_proxies(config.proxies.clone());
            session.set_verify(false);
        }

        Ok(Self {
            config,
            session,
            alert: None,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Report failed GET/POST calls through `mailer`. Replaces any earlier alert.
    pub fn set_error_mailer(
        &mut self,
        mailer: impl Mailer + 'static,
        recipient: impl Into<String>,
        subject: impl Into<String>,
    ) {
        self.alert = Some(ErrorAlert::new(Box::new(mailer), recipient, subject));
    }

    pub fn has_error_mailer(&self) -> bool {
        self.alert.is_some()
    }

    /// Transport adapters are configured through [`ClientConfig`]; mounting is refused.
    pub fn mount<A>(&mut self, prefix: &str, _adapter: A) -> Result<()> {
        Err(RjarError::Unsupported(format!(
            "mount('{}') is no longer supported. Configure transport and proxy settings \
             through ClientConfig when creating the client instead.",
            prefix
        )))
    }

    pub async fn get(
        &mut self,
        url: &str,
        options: RequestOptions,
    ) -> std::result::Result<Response, RequestFailure> {
        self.send_reported(ReportedVerb::Get, url, options).await
    }

    pub async fn post(
        &mut self,
        url: &str,
        options: RequestOptions,
    ) -> std::result::Result<Response, RequestFailure> {
        self.send_reported(ReportedVerb::Post, url, options).await
    }

    /// PUT without alerting.
    pub async fn put(&mut self, url: &str, mut options: RequestOptions) -> Result<Response> {
        options.cookies = self.session.cookies();
        self.session.put(url, &options).await
    }

    /// DELETE without alerting.
    pub async fn delete(&mut self, url: &str, mut options: RequestOptions) -> Result<Response> {
        options.cookies = self.session.cookies();
        self.session.delete(url, &options).await
    }

    pub fn close(&mut self) {
        self.session.close();
    }

    pub fn cookies_to_dict(&self) -> CookieMap {
        self.session.cookies()
    }

    /// Merge cookies into the jar. Existing names are overwritten.
    pub fn add_cookies<K, V>(&mut self, cookies: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let cookies: CookieMap = cookies
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.session.update_cookies(&cookies);
    }

    async fn send_reported(
        &mut self,
        verb: ReportedVerb,
        url: &str,
        mut options: RequestOptions,
    ) -> std::result::Result<Response, RequestFailure> {
        options.cookies = self.session.cookies();

        let outcome = match verb {
            ReportedVerb::Get => self.session.get(url, &options).await,
            ReportedVerb::Post => self.session.post(url, &options).await,
        };
        let method = verb.method();

        match outcome {
            Ok(mut response) => {
                if !response.is_ok() {
                    if let Some(alert) = &self.alert {
                        let status_code = response.status_code();
                        let body = mailer::status_alert_body(method, url, &options, status_code);
                        let notification = alert.notify(&body).await;
                        error!(
                            "Sending error email to {} because of status_code={}.",
                            alert.recipient(),
                            status_code
                        );
                        response.set_notification(notification);
                    } else {
                        debug!("{} {} returned {}", method, url, response.status());
                    }
                }
                Ok(response)
            }
            Err(err) => {
                let notification = match &self.alert {
                    Some(alert) => {
                        let backtrace = Backtrace::force_capture();
                        let body =
                            mailer::error_alert_body(method, url, &options, &err, &backtrace);
                        let notification = alert.notify(&body).await;
                        error!(
                            "Sending error email to {} because of error: {}",
                            alert.recipient(),
                            err
                        );
                        notification
                    }
                    None => Notification::NotConfigured,
                };
                Err(RequestFailure {
                    error: err,
                    notification,
                })
            }
        }
    }
}
