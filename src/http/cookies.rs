//! Cookie header rendering and `Set-Cookie` parsing

use crate::session::CookieMap;

/// Render a jar as a `Cookie` request header value.
pub fn cookies_to_header(cookies: &CookieMap) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Extract the name and value from a `Set-Cookie` header. Attributes are ignored.
pub fn parse_set_cookie(header: &str) -> Option<(String, String)> {
    let pair = header.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"');
    Some((name.to_string(), value.to_string()))
}
