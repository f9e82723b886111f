use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_security_headers_layer, ClientIdLayer};
use crate::handlers::{account, admin, attendee, event, health_check};
use crate::state::AppState;
use crate::utils::error::AppError;

pub fn create_routes(state: AppState) -> Router {
    let client_ids = ClientIdLayer::from_config(&state.config);
    let security_headers = create_security_headers_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(event::show_latest).post(event::attend_latest))
        .route("/:slug", get(event::show_event).post(event::attend_event))
        .route("/attendee/:id/delete", post(attendee::delete_attendee))
        .route("/login", post(account::login))
        .route("/logout", post(account::logout))
        .route("/account", get(account::show_account))
        .route("/account/password", post(account::change_password))
        .merge(admin::routes())
        .layer(middleware::from_fn_with_state(state.clone(), ensure_schema))
        .layer(client_ids)
        .layer(TraceLayer::new_for_http())
        .layer(security_headers)
        .with_state(state)
}

/// Creates the schema before the first request is handled.
async fn ensure_schema(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.ensure_schema().await?;
    Ok(next.run(request).await)
}
