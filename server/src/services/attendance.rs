use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::config::ClientId;
use crate::models::{Attendee, Event, ListedAttendee, NewAttendee, User};
use crate::repository;
use crate::utils::error::AppError;

/// Who is asking: the logged-in user, if any, plus the anonymous client id
/// every request carries.
#[derive(Debug, Clone)]
pub struct Requester {
    pub user: Option<User>,
    pub client_id: ClientId,
}

impl Requester {
    /// Allowed when the attendee belongs to the requester's user, or was
    /// created anonymously under the requester's client id.
    pub fn may_cancel(&self, attendee: &Attendee) -> bool {
        let same_user = matches!(
            (&self.user, attendee.user_id),
            (Some(user), Some(owner)) if user.id == owner
        );
        let same_client = attendee
            .client_id
            .as_deref()
            .is_some_and(|owner| owner == self.client_id.as_str());
        same_user || same_client
    }
}

#[derive(Clone)]
pub struct AttendanceService {
    pool: SqlitePool,
}

impl AttendanceService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records an RSVP. Without a user the attendee is tied to `client_id`.
    pub async fn create_attendee(
        &self,
        event: &Event,
        user: Option<&User>,
        name: Option<String>,
        client_id: &ClientId,
    ) -> Result<Attendee, AppError> {
        let new = NewAttendee::new(event, user, name, client_id);
        let attendee = repository::attendee::insert(&self.pool, &new).await?;
        info!(
            attendee_id = attendee.id,
            event = %event.slug,
            user_id = ?attendee.user_id,
            "Attendee created"
        );
        Ok(attendee)
    }

    /// Cancels an RSVP and returns the event it belonged to.
    pub async fn delete_attendee(&self, id: i64, requester: &Requester) -> Result<Event, AppError> {
        let attendee = repository::attendee::find(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attendee {id} was not found")))?;

        if !requester.may_cancel(&attendee) {
            warn!(
                attendee_id = id,
                requester_user = ?requester.user.as_ref().map(|u| u.id),
                "Refused attendee deletion"
            );
            return Err(AppError::Forbidden(
                "You may only cancel your own attendance".to_string(),
            ));
        }

        let event = repository::event::find(&self.pool, attendee.event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} was not found", attendee.event_id)))?;

        repository::attendee::delete(&self.pool, id).await?;
        info!(attendee_id = id, event = %event.slug, "Attendee deleted");
        Ok(event)
    }

    pub async fn attendees_of(&self, event: &Event) -> Result<Vec<ListedAttendee>, AppError> {
        Ok(repository::attendee::for_event(&self.pool, event.id).await?)
    }

    pub async fn history_of(&self, user: &User) -> Result<Vec<Attendee>, AppError> {
        Ok(repository::attendee::for_user(&self.pool, user.id).await?)
    }
}
