use axum::extract::{Path, State};
use axum::response::Redirect;

use crate::services::attendance::Requester;
use crate::state::AppState;
use crate::utils::error::AppError;

/// Cancels an RSVP and sends the browser back to the event page.
pub async fn delete_attendee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    requester: Requester,
) -> Result<Redirect, AppError> {
    let event = state.attendance().delete_attendee(id, &requester).await?;
    Ok(Redirect::to(&format!("/{}", event.slug)))
}
