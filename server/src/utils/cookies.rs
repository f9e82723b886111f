//! The two cookies the service issues: the anonymous client id and the
//! login session.

use axum::http::HeaderValue;
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

pub const CLIENT_ID_COOKIE: &str = "client_id";
pub const SESSION_COOKIE: &str = "session";

/// A site-wide, script-inaccessible cookie.
pub fn site_cookie(
    name: &'static str,
    value: impl Into<String>,
    max_age_secs: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value.into()))
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// The `Set-Cookie` value for `cookie`, written without percent-encoding.
/// `None` when the value contains bytes a header cannot carry.
pub fn set_cookie_header(cookie: &Cookie<'_>) -> Option<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string()).ok()
}
