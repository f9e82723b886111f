mod common;

use attend_server::repository;
use axum::http::{header, StatusCode};
use common::*;

async fn rsvp(app: &TestApp, cookie: &str) -> i64 {
    let response = app
        .send(post_form("/party", "name=Alice&captcha=osm", Some(cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let event = repository::event::with_slug(&app.state.pool, "party")
        .await
        .unwrap()
        .remove(0);
    let listed = repository::attendee::for_event(&app.state.pool, event.id)
        .await
        .unwrap();
    listed.last().unwrap().attendee.id
}

#[tokio::test]
async fn test_other_client_is_forbidden() {
    let app = spawn().await;
    seed_event(&app.state, "party", next_week()).await;
    let id = rsvp(&app, "client_id=X").await;

    let response = app
        .send(post_form(&format!("/attendee/{id}/delete"), "", Some("client_id=Y")))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"]["code"], "FORBIDDEN");

    let still_there = repository::attendee::find(&app.state.pool, id).await.unwrap();
    assert!(still_there.is_some());
}

#[tokio::test]
async fn test_request_without_cookie_is_forbidden() {
    let app = spawn().await;
    seed_event(&app.state, "party", next_week()).await;
    let id = rsvp(&app, "client_id=X").await;

    let response = app
        .send(post_form(&format!("/attendee/{id}/delete"), "", None))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_owner_client_deletes_and_is_redirected() {
    let app = spawn().await;
    seed_event(&app.state, "party", next_week()).await;
    let id = rsvp(&app, "client_id=X").await;

    let response = app
        .send(post_form(&format!("/attendee/{id}/delete"), "", Some("client_id=X")))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/party");

    let gone = repository::attendee::find(&app.state.pool, id).await.unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
async fn test_logged_in_user_cancels_own_rsvp_from_any_browser() {
    let app = spawn().await;
    seed_event(&app.state, "party", next_week()).await;
    seed_user(&app.state, "eva", "pass-word", false).await;
    seed_user(&app.state, "adam", "pass-word", false).await;

    let eva = login(&app, "eva", "pass-word").await;
    let id = rsvp(&app, &format!("{eva}; client_id=laptop")).await;

    let adam = login(&app, "adam", "pass-word").await;
    let response = app
        .send(post_form(
            &format!("/attendee/{id}/delete"),
            "",
            Some(&format!("{adam}; client_id=laptop")),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(post_form(
            &format!("/attendee/{id}/delete"),
            "",
            Some(&format!("{eva}; client_id=phone")),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_missing_attendee_is_not_found() {
    let app = spawn().await;
    let response = app
        .send(post_form("/attendee/999/delete", "", Some("client_id=X")))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
