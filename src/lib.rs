//! rjar - a cookie-carrying HTTP session wrapper
//!
//! This crate wraps a reqwest-based session so that every request carries
//! the session's cookie jar, and can alert a mailer when GET or POST calls
//! fail or return a status other than 200.

pub mod browser;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod http;
pub mod logging;
pub mod mailer;
pub mod session;
pub mod utils;

pub use browser::open_html_in_browser;
pub use client::{HttpClientWrapper, RequestFailure};
pub use config::ClientConfig;
pub use error::{Result, RjarError};
pub use http::response::Response;
pub use http::ReqwestSession;
pub use mailer::{Mailer, Notification};
pub use session::{CookieMap, RequestOptions, Session};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
