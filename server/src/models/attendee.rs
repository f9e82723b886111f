use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::config::ClientId;

use super::{Event, User};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Attendee {
    pub id: i64,
    pub event_id: i64,
    pub user_id: Option<i64>,
    /// Free-text name typed into the RSVP form.
    pub name: Option<String>,
    /// Anonymous owner token; set whenever `user_id` is not.
    #[serde(skip)]
    pub client_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// An attendee row joined with the linked user's name, as listed on an
/// event page.
#[derive(Debug, Clone, FromRow)]
pub struct ListedAttendee {
    #[sqlx(flatten)]
    pub attendee: Attendee,
    pub user_name: Option<String>,
}

impl ListedAttendee {
    /// The linked user's name when a user is linked, else the free-text name.
    pub fn display_name(&self) -> &str {
        match (self.attendee.user_id, self.user_name.as_deref()) {
            (Some(_), Some(user_name)) => user_name,
            _ => self.attendee.name.as_deref().unwrap_or_default(),
        }
    }
}

/// A not-yet-persisted RSVP. The constructors guarantee that an attendee
/// without a user always carries the requester's client id.
#[derive(Debug, Clone)]
pub struct NewAttendee {
    event_id: i64,
    user_id: Option<i64>,
    name: Option<String>,
    client_id: Option<String>,
}

impl NewAttendee {
    pub fn new(event: &Event, user: Option<&User>, name: Option<String>, client_id: &ClientId) -> Self {
        match user {
            Some(user) => Self::for_user(event, user, name),
            None => Self::anonymous(event, name, client_id),
        }
    }

    pub fn for_user(event: &Event, user: &User, name: Option<String>) -> Self {
        Self {
            event_id: event.id,
            user_id: Some(user.id),
            name,
            client_id: None,
        }
    }

    pub fn anonymous(event: &Event, name: Option<String>, client_id: &ClientId) -> Self {
        Self {
            event_id: event.id,
            user_id: None,
            name,
            client_id: Some(client_id.as_str().to_string()),
        }
    }

    pub fn event_id(&self) -> i64 {
        self.event_id
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }
}
