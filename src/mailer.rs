//! Failure alerts
//!
//! The wrapper can report failed requests through an externally supplied
//! [`Mailer`]. Alerts are a side channel: they never change what the
//! caller gets back.

use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt::Write as _;

use async_trait::async_trait;
use log::{debug, error};

use crate::config::HttpMethod;
use crate::error::{Result, RjarError};
use crate::session::RequestOptions;

/// Something that can deliver a plain-text alert
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, contents: &str) -> Result<()>;
}

/// Outcome of an alert attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// No mailer was configured, nothing was sent.
    NotConfigured,
    Sent,
    /// The mailer itself failed; holds its error message.
    Failed(String),
}

impl Notification {
    pub fn attempted(&self) -> bool {
        !matches!(self, Notification::NotConfigured)
    }
}

/// A mailer together with the recipient and subject it sends to
pub struct ErrorAlert {
    mailer: Box<dyn Mailer>,
    recipient: String,
    subject: String,
}

impl ErrorAlert {
    pub fn new(
        mailer: Box<dyn Mailer>,
        recipient: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            mailer,
            recipient: recipient.into(),
            subject: subject.into(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Send `contents`. A failing mailer is logged and reported, never raised.
    pub async fn notify(&self, contents: &str) -> Notification {
        debug!("Sending '{}' alert to {}", self.subject(), self.recipient());
        match self
            .mailer
            .send(&self.recipient, &self.subject, contents)
            .await
        {
            Ok(()) => Notification::Sent,
            Err(err) => {
                error!("Failed to send error email to {}: {}", self.recipient(), err);
                Notification::Failed(err.to_string())
            }
        }
    }
}

impl std::fmt::Debug for ErrorAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorAlert")
            .field("recipient", &self.recipient)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

/// Alert body for a response whose status is not 200.
pub fn status_alert_body(
    method: HttpMethod,
    url: &str,
    options: &RequestOptions,
    status_code: u16,
) -> String {
    format!(
        "status_code is not 200 on {} url={:?} options={:?}\nstatus_code={}",
        method, url, options, status_code
    )
}

/// Alert body for a request that failed outright.
pub fn error_alert_body(
    method: HttpMethod,
    url: &str,
    options: &RequestOptions,
    err: &RjarError,
    backtrace: &Backtrace,
) -> String {
    let mut body = format!(
        "Error on {} url={:?} options={:?}\n[error]\n{}\n",
        method, url, options, err
    );
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(body, "caused by: {}", cause);
        source = cause.source();
    }
    let _ = write!(body, "[backtrace]\n{}", backtrace);
    body
}
