#![allow(dead_code)]

use attend_server::models::{Event, EventInput, User, UserInput};
use attend_server::services::identity::hash_password;
use attend_server::{create_routes, db, repository, AppState, Config};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }
}

pub async fn fresh_state() -> AppState {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    AppState::new(pool, Config::default())
}

pub async fn spawn() -> TestApp {
    let state = fresh_state().await;
    state.ensure_schema().await.unwrap();
    TestApp {
        app: create_routes(state.clone()),
        state,
    }
}

pub fn next_week() -> DateTime<Utc> {
    Utc::now() + Duration::days(7)
}

pub async fn seed_event(state: &AppState, slug: &str, date: DateTime<Utc>) -> Event {
    let input = EventInput {
        slug: slug.to_string(),
        name: format!("Event {slug}"),
        location_id: None,
        text: "# Welcome".to_string(),
        date,
    };
    repository::event::insert(&state.pool, &input).await.unwrap()
}

pub async fn seed_user(state: &AppState, login: &str, password: &str, is_admin: bool) -> User {
    let input = UserInput {
        login: login.to_string(),
        name: format!("{login} name"),
        email: None,
        is_admin,
        enabled: true,
        password: None,
    };
    let hash = hash_password(password).unwrap();
    repository::user::insert(&state.pool, &input, &hash)
        .await
        .unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Value of cookie `name` from the response's `Set-Cookie` headers.
pub fn cookie_from(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&prefix))
        .map(|v| v[prefix.len()..].split(';').next().unwrap_or("").to_string())
}

/// Logs in and returns a `Cookie` header value carrying the session.
pub async fn login(app: &TestApp, login: &str, password: &str) -> String {
    let response = app
        .send(post_form(
            "/login",
            &format!("login={login}&password={password}"),
            None,
        ))
        .await;
    assert_eq!(response.status(), 200);
    let token = cookie_from(&response, "session").expect("session cookie");
    format!("session={token}")
}
