//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and the `rjar` entry point.

use crate::browser::open_html_in_browser;
use crate::client::HttpClientWrapper;
use crate::config::{ClientConfig, HttpMethod};
use crate::error::{Result, RjarError};
use crate::exit_code::exit_code_for_error;
use crate::http::response::Response;
use crate::session::{CookieMap, RequestOptions};
use crate::utils::{StringUtils, UrlUtils};
use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use std::io::Write;

/// Main entry point for the CLI application
pub fn run() {
    crate::logging::init();

    let matches = create_app().get_matches();

    if let Err(err) = run_with_args(&matches) {
        eprintln!("rjar: error: {:#}", err);
        let code = err
            .downcast_ref::<RjarError>()
            .map(exit_code_for_error)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

/// One parsed command line
#[derive(Debug, Clone)]
pub struct Invocation {
    pub url: String,
    pub method: HttpMethod,
    pub config: ClientConfig,
    pub cookies: CookieMap,
    pub data: Option<String>,
    pub data_is_json: bool,
    pub include_status: bool,
    pub open_in_browser: bool,
}

impl Invocation {
    fn request_options(&self) -> Result<RequestOptions> {
        let options = RequestOptions::new();
        let Some(data) = &self.data else {
            return Ok(options);
        };
        if self.data_is_json {
            Ok(options.json(serde_json::from_str(data)?))
        } else if self.has_content_type() {
            Ok(options.text(data.clone()))
        } else {
            Ok(options
                .header("Content-Type", "application/x-www-form-urlencoded")
                .text(data.clone()))
        }
    }

    fn has_content_type(&self) -> bool {
        self.config
            .headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("content-type"))
    }
}

/// Run rjar with parsed command line arguments
fn run_with_args(matches: &ArgMatches) -> anyhow::Result<()> {
    let invocation = build_invocation(matches)?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    let response = rt.block_on(execute(&invocation))?;

    if invocation.open_in_browser {
        open_html_in_browser(response.bytes())?;
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    if invocation.include_status {
        writeln!(stdout, "HTTP {}", response.status())?;
        for (name, value) in response.headers() {
            writeln!(
                stdout,
                "{}: {}",
                name,
                value.to_str().unwrap_or("<non-utf8>")
            )?;
        }
        writeln!(stdout)?;
    }
    stdout.write_all(response.bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Perform the request described by `invocation` on a fresh client.
pub async fn execute(invocation: &Invocation) -> Result<Response> {
    let mut client = HttpClientWrapper::new(invocation.config.clone())?;
    client.add_cookies(invocation.cookies.clone());
    let options = invocation.request_options()?;

    let url = invocation.url.as_str();
    let result = match invocation.method {
        HttpMethod::Get => client.get(url, options).await.map_err(RjarError::from),
        HttpMethod::Post => client.post(url, options).await.map_err(RjarError::from),
        HttpMethod::Put => client.put(url, options).await,
        HttpMethod::Delete => client.delete(url, options).await,
    };
    client.close();
    result
}

/// Create the CLI application structure
pub fn create_app() -> Command {
    Command::new("rjar")
        .version(crate::VERSION)
        .about("Send HTTP requests through a cookie-carrying session")
        .arg(Arg::new("url")
            .help("The URL to request")
            .required(true)
            .index(1))
        .arg(Arg::new("request")
            .short('X')
            .long("request")
            .value_name("METHOD")
            .help("HTTP request method (GET, POST, PUT, DELETE)")
            .default_value("GET"))
        .arg(Arg::new("header")
            .short('H')
            .long("header")
            .value_name("HEADER")
            .help("Add a session header")
            .action(clap::ArgAction::Append))
        .arg(Arg::new("cookie")
            .short('b')
            .long("cookie")
            .value_name("NAME=VALUE")
            .help("Seed the session cookie jar")
            .action(clap::ArgAction::Append))
        .arg(Arg::new("proxy")
            .short('x')
            .long("proxy")
            .value_name("SCHEME=PROXY_URL")
            .env("RJAR_PROXY")
            .help("Route a scheme through a proxy (disables certificate verification)")
            .action(clap::ArgAction::Append))
        .arg(Arg::new("max-time")
            .short('m')
            .long("max-time")
            .value_name("SECONDS")
            .env("RJAR_TIMEOUT")
            .help("Default request timeout"))
        .arg(Arg::new("retries")
            .long("retries")
            .value_name("N")
            .help("Connection retries")
            .value_parser(clap::value_parser!(u32))
            .default_value("3"))
        .arg(Arg::new("data")
            .short('d')
            .long("data")
            .value_name("DATA")
            .help("Request body"))
        .arg(Arg::new("json")
            .long("json")
            .help("Send --data as JSON")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("include")
            .short('i')
            .long("include")
            .help("Print the status line and response headers")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("open")
            .long("open")
            .help("Open the response body in the default browser")
            .action(clap::ArgAction::SetTrue))
}

/// Build an invocation from command line arguments
pub fn build_invocation(matches: &ArgMatches) -> Result<Invocation> {
    let url = match matches.get_one::<String>("url") {
        Some(url_str) => UrlUtils::validate_url(url_str)?.to_string(),
        None => return Err(RjarError::Config("URL is required".to_string())),
    };

    let method = match matches.get_one::<String>("request") {
        Some(method_str) => method_str.parse::<HttpMethod>()?,
        None => HttpMethod::Get,
    };

    let mut config = ClientConfig::default();

    if let Some(headers) = matches.get_many::<String>("header") {
        for header_str in headers {
            let (key, value) = StringUtils::parse_header(header_str)?;
            config.headers.insert(key, value);
        }
    }

    if let Some(proxies) = matches.get_many::<String>("proxy") {
        for proxy_str in proxies {
            let (scheme, proxy_url) = StringUtils::parse_proxy(proxy_str)?;
            config.proxies.insert(scheme, proxy_url);
        }
    }

    if let Some(timeout_str) = matches.get_one::<String>("max-time") {
        config.default_timeout = Some(StringUtils::parse_timeout(timeout_str)?);
    }

    if let Some(retries) = matches.get_one::<u32>("retries") {
        config.max_retries = *retries;
    }

    let mut cookies = CookieMap::new();
    if let Some(pairs) = matches.get_many::<String>("cookie") {
        for pair in pairs {
            let (name, value) = StringUtils::parse_cookie(pair)?;
            cookies.insert(name, value);
        }
    }

    Ok(Invocation {
        url,
        method,
        config,
        cookies,
        data: matches.get_one::<String>("data").cloned(),
        data_is_json: matches.get_flag("json"),
        include_status: matches.get_flag("include"),
        open_in_browser: matches.get_flag("open"),
    })
}
