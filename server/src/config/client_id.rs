//! Anonymous per-browser identity carried in the `client_id` cookie.
//!
//! The token is a weak, spoofable identity: it only ever authorizes
//! cancelling an RSVP that was made with the same token, and is kept apart
//! from authenticated user identity for that reason.

use std::fmt;
use std::task::{Context, Poll};

use axum::http::{header, HeaderValue, Request, Response};
use axum_extra::extract::CookieJar;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use tower::{Layer, Service};
use tracing::debug;

use super::Config;
use crate::utils::cookies::{set_cookie_header, site_cookie, CLIENT_ID_COOKIE};

/// Random bytes per token, before base64.
const CLIENT_ID_BYTES: usize = 18;
const MAX_CLIENT_ID_LEN: usize = 256;

#[derive(Clone, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    pub fn generate() -> Self {
        let mut raw = [0u8; CLIENT_ID_BYTES];
        rand::thread_rng().fill_bytes(&mut raw);
        Self(STANDARD.encode(raw))
    }

    /// Accepts a token presented by the browser; `None` for values that are
    /// empty, oversized or unsafe to echo back.
    pub fn from_cookie(value: &str) -> Option<Self> {
        (value.len() <= MAX_CLIENT_ID_LEN && is_echo_safe(value)).then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_echo_safe(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'))
}

// Keep tokens out of logs.
impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientId(..)")
    }
}

/// Ensures every request carries a [`ClientId`] extension and every
/// response (re)sets the cookie, refreshing its lifetime.
#[derive(Clone)]
pub struct ClientIdLayer {
    max_age_secs: i64,
    secure: bool,
}

impl ClientIdLayer {
    pub fn new(max_age_secs: i64, secure: bool) -> Self {
        Self {
            max_age_secs,
            secure,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cookie_max_age_secs(), config.secure_cookies)
    }
}

impl<S> Layer<S> for ClientIdLayer {
    type Service = ClientIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ClientIdService {
            inner,
            max_age_secs: self.max_age_secs,
            secure: self.secure,
        }
    }
}

#[derive(Clone)]
pub struct ClientIdService<S> {
    inner: S,
    max_age_secs: i64,
    secure: bool,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for ClientIdService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = ClientIdFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let client_id = CookieJar::from_headers(request.headers())
            .get(CLIENT_ID_COOKIE)
            .and_then(|cookie| ClientId::from_cookie(cookie.value()))
            .unwrap_or_else(|| {
                debug!("Issuing new client id");
                ClientId::generate()
            });

        let cookie = set_cookie_header(&site_cookie(
            CLIENT_ID_COOKIE,
            client_id.as_str(),
            self.max_age_secs,
            self.secure,
        ));
        request.extensions_mut().insert(client_id);

        ClientIdFuture {
            future: self.inner.call(request),
            cookie,
        }
    }
}

#[pin_project::pin_project]
pub struct ClientIdFuture<F> {
    #[pin]
    future: F,
    cookie: Option<HeaderValue>,
}

impl<F, ResBody, E> std::future::Future for ClientIdFuture<F>
where
    F: std::future::Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = Result<Response<ResBody>, E>;

    fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let mut response = match this.future.poll(cx) {
            Poll::Ready(Ok(response)) => response,
            other => return other,
        };

        if let Some(cookie) = this.cookie.take() {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }

        Poll::Ready(Ok(response))
    }
}
