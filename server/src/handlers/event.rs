use axum::extract::{OriginalUri, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{Event, Location};
use crate::repository;
use crate::services::{attendance::Requester, events};
use crate::state::AppState;
use crate::utils::error::{field_errors, AppError, FieldErrors};
use crate::utils::response::success;

/// "5+3 = (in words)", compared case-insensitively.
pub const CAPTCHA_ANSWER: &str = "osm";

/// The RSVP form. Missing fields deserialize as empty so they fail
/// validation instead of rejecting the request.
#[derive(Debug, Deserialize, Validate)]
pub struct AttendForm {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_captcha"))]
    pub captcha: String,
}

fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("This field is required.".into()));
    }
    Ok(())
}

fn validate_captcha(value: &str) -> Result<(), ValidationError> {
    if value.to_lowercase() != CAPTCHA_ANSWER {
        return Err(ValidationError::new("captcha").with_message("Wrong answer.".into()));
    }
    Ok(())
}

/// The form as shown back to the visitor.
#[derive(Debug, Default, Serialize)]
pub struct FormView {
    pub name: String,
    pub captcha: String,
    pub errors: FieldErrors,
}

#[derive(Debug, Serialize)]
pub struct AttendeeView {
    pub id: i64,
    pub display_name: String,
    pub timestamp: DateTime<Utc>,
    pub can_cancel: bool,
}

#[derive(Debug, Serialize)]
pub struct EventView {
    pub event: Event,
    pub location: Option<Location>,
    pub editable: bool,
    pub attendees: Vec<AttendeeView>,
    pub form: FormView,
}

pub async fn show_latest(State(state): State<AppState>, requester: Requester) -> Result<Response, AppError> {
    let event = events::resolve(&state.pool, None).await?;
    render(&state, event, &requester, FormView::default()).await
}

pub async fn show_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    requester: Requester,
) -> Result<Response, AppError> {
    let event = events::resolve(&state.pool, Some(&slug)).await?;
    render(&state, event, &requester, FormView::default()).await
}

pub async fn attend_latest(
    State(state): State<AppState>,
    requester: Requester,
    OriginalUri(uri): OriginalUri,
    Form(form): Form<AttendForm>,
) -> Result<Response, AppError> {
    let event = events::resolve(&state.pool, None).await?;
    attend(&state, event, &requester, uri, form).await
}

pub async fn attend_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    requester: Requester,
    OriginalUri(uri): OriginalUri,
    Form(form): Form<AttendForm>,
) -> Result<Response, AppError> {
    let event = events::resolve(&state.pool, Some(&slug)).await?;
    attend(&state, event, &requester, uri, form).await
}

/// Creates the attendee and redirects back to the page, or re-renders the
/// page with the form errors.
async fn attend(
    state: &AppState,
    event: Event,
    requester: &Requester,
    uri: axum::http::Uri,
    form: AttendForm,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        let view = FormView {
            name: form.name,
            captcha: form.captcha,
            errors: field_errors(&errors),
        };
        return render(state, event, requester, view).await;
    }

    state
        .attendance()
        .create_attendee(
            &event,
            requester.user.as_ref(),
            Some(form.name.trim().to_string()),
            &requester.client_id,
        )
        .await?;

    let target = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    Ok(Redirect::to(target).into_response())
}

async fn render(
    state: &AppState,
    event: Event,
    requester: &Requester,
    form: FormView,
) -> Result<Response, AppError> {
    let location = match event.location_id {
        Some(id) => repository::location::find(&state.pool, id).await?,
        None => None,
    };
    let attendees = state
        .attendance()
        .attendees_of(&event)
        .await?
        .into_iter()
        .map(|listed| AttendeeView {
            id: listed.attendee.id,
            display_name: listed.display_name().to_string(),
            timestamp: listed.attendee.timestamp,
            can_cancel: requester.may_cancel(&listed.attendee),
        })
        .collect();

    let message = if form.errors.is_empty() {
        "Event loaded"
    } else {
        "Please correct the highlighted fields"
    };
    let view = EventView {
        editable: event.editable(),
        event,
        location,
        attendees,
        form,
    };
    Ok(success(view, message))
}
