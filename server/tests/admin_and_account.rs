mod common;

use attend_server::repository;
use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_admin_requires_login_and_admin_flag() {
    let app = spawn().await;
    seed_user(&app.state, "eva", "pass-word", false).await;

    let response = app.send(get("/admin/events", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let eva = login(&app, "eva", "pass-word").await;
    let response = app.send(get("/admin/events", Some(&eva))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_manages_locations_and_events() {
    let app = spawn().await;
    seed_user(&app.state, "root", "admin-pass", true).await;
    let admin = login(&app, "root", "admin-pass").await;

    let response = app
        .send(json_request(
            "POST",
            "/admin/locations",
            &json!({"name": "Klub", "address": "Main St 1", "lat": 50.08, "lng": 14.42,
                    "url": "https://example.org/klub"}),
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let event = json!({
        "slug": "party",
        "name": "Summer party",
        "location_id": location_id,
        "text": "Bring *snacks*",
        "date": "2099-06-01T18:00:00Z"
    });
    let response = app
        .send(json_request("POST", "/admin/events", &event, Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let event_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .send(json_request("POST", "/admin/events", &event, Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(app.send(get("/party", None)).await).await;
    assert_eq!(body["data"]["location"]["name"], "Klub");
    assert_eq!(body["data"]["event"]["text"], "Bring *snacks*");

    let renamed = json!({
        "slug": "party",
        "name": "Autumn party",
        "date": "2099-10-01T18:00:00Z"
    });
    let response = app
        .send(json_request(
            "PUT",
            &format!("/admin/events/{event_id}"),
            &renamed,
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Autumn party");

    let response = app
        .send(json_request(
            "DELETE",
            &format!("/admin/events/{event_id}"),
            &json!({}),
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .send(get(&format!("/admin/events/{event_id}"), Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_input_is_validated() {
    let app = spawn().await;
    seed_user(&app.state, "root", "admin-pass", true).await;
    let admin = login(&app, "root", "admin-pass").await;

    let response = app
        .send(json_request(
            "POST",
            "/admin/events",
            &json!({"slug": "Bad Slug", "name": "", "date": "2099-06-01T18:00:00Z"}),
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]["details"]["slug"].is_array());
    assert!(body["error"]["details"]["name"].is_array());

    let response = app
        .send(json_request(
            "POST",
            "/admin/events",
            &json!({"slug": "ghost", "name": "Ghost", "location_id": 404,
                    "date": "2099-06-01T18:00:00Z"}),
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_event_slug_cannot_shadow_site_routes() {
    let app = spawn().await;
    seed_user(&app.state, "root", "admin-pass", true).await;
    let admin = login(&app, "root", "admin-pass").await;

    for slug in ["login", "health"] {
        let response = app
            .send(json_request(
                "POST",
                "/admin/events",
                &json!({"slug": slug, "name": "Clash", "date": "2099-06-01T18:00:00Z"}),
                Some(&admin),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"]["details"]["slug"].is_array());
    }

    let response = app.send(get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_created_user_can_log_in_and_rsvp() {
    let app = spawn().await;
    seed_user(&app.state, "root", "admin-pass", true).await;
    let event = seed_event(&app.state, "party", next_week()).await;
    let admin = login(&app, "root", "admin-pass").await;

    let response = app
        .send(json_request(
            "POST",
            "/admin/users",
            &json!({"login": "jan", "name": "Jan Novak", "email": "jan@example.org",
                    "password": "first-pass"}),
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert!(body["data"].get("password").is_none());

    let jan = login(&app, "jan", "first-pass").await;
    let response = app
        .send(post_form("/party", "name=Honza&captcha=osm", Some(&jan)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let listed = repository::attendee::for_event(&app.state.pool, event.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].attendee.user_id.is_some());
    assert_eq!(listed[0].attendee.client_id, None);
    assert_eq!(listed[0].display_name(), "Jan Novak");

    let body = body_json(app.send(get("/account", Some(&jan))).await).await;
    assert_eq!(body["data"]["user"]["login"], "jan");
    assert_eq!(body["data"]["attended"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_failures() {
    let app = spawn().await;
    seed_user(&app.state, "eva", "pass-word", false).await;

    let response = app
        .send(post_form("/login", "login=eva&password=nope", None))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(post_form("/login", "login=ghost&password=pass-word", None))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = spawn().await;
    seed_user(&app.state, "eva", "pass-word", false).await;
    let eva = login(&app, "eva", "pass-word").await;

    assert_eq!(app.send(get("/account", Some(&eva))).await.status(), StatusCode::OK);

    let response = app.send(post_form("/logout", "", Some(&eva))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cookie_from(&response, "session").as_deref(), Some(""));

    let response = app.send(get("/account", Some(&eva))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn().await;
    seed_user(&app.state, "eva", "pass-word", false).await;
    let eva = login(&app, "eva", "pass-word").await;

    let response = app
        .send(post_form("/account/password", "password=short", Some(&eva)))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(post_form("/account/password", "password=much-longer", Some(&eva)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(post_form("/login", "login=eva&password=pass-word", None))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    login(&app, "eva", "much-longer").await;
}

#[tokio::test]
async fn test_disabled_user_session_is_ignored() {
    let app = spawn().await;
    let user = seed_user(&app.state, "eva", "pass-word", false).await;
    let eva = login(&app, "eva", "pass-word").await;

    sqlx::query("UPDATE users SET enabled = 0 WHERE id = ?")
        .bind(user.id)
        .execute(&app.state.pool)
        .await
        .unwrap();

    let response = app.send(get("/account", Some(&eva))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_sets_user_password() {
    let app = spawn().await;
    seed_user(&app.state, "root", "admin-pass", true).await;
    let eva = seed_user(&app.state, "eva", "pass-word", false).await;
    let admin = login(&app, "root", "admin-pass").await;

    let response = app
        .send(json_request(
            "PUT",
            &format!("/admin/users/{}", eva.id),
            &json!({"login": "eva", "name": "Eva", "password": "second-pass"}),
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Eva");
    assert!(body["data"].get("password").is_none());

    let response = app
        .send(post_form("/login", "login=eva&password=pass-word", None))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    login(&app, "eva", "second-pass").await;
}

#[tokio::test]
async fn test_deleting_user_keeps_attendance_anonymously() {
    let app = spawn().await;
    seed_user(&app.state, "root", "admin-pass", true).await;
    let eva = seed_user(&app.state, "eva", "pass-word", false).await;
    let event = seed_event(&app.state, "party", next_week()).await;
    let admin = login(&app, "root", "admin-pass").await;
    let session = login(&app, "eva", "pass-word").await;

    let response = app
        .send(post_form("/party", "name=Evie&captcha=osm", Some(&session)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .send(json_request(
            "DELETE",
            &format!("/admin/users/{}", eva.id),
            &json!({}),
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = repository::attendee::for_event(&app.state.pool, event.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].attendee.user_id, None);
    assert!(listed[0].attendee.client_id.is_some());
    assert_eq!(listed[0].display_name(), "eva name");

    let response = app.send(get("/account", Some(&session))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(json_request(
            "DELETE",
            &format!("/admin/users/{}", eva.id),
            &json!({}),
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
