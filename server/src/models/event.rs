use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    /// Unique URL identifier.
    pub slug: String,
    pub name: String,
    pub location_id: Option<i64>,
    /// Markdown body.
    pub text: String,
    pub date: DateTime<Utc>,
}

impl Event {
    /// Open for changes while the event lies strictly in the future.
    pub fn editable(&self) -> bool {
        self.editable_at(Utc::now())
    }

    pub fn editable_at(&self, now: DateTime<Utc>) -> bool {
        self.date > now
    }
}

/// Admin create/update payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EventInput {
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub location_id: Option<i64>,
    #[serde(default)]
    pub text: String,
    pub date: DateTime<Utc>,
}

/// First path segments claimed by fixed routes; an event with one of these
/// slugs could not be reached at `/<slug>`.
pub const RESERVED_SLUGS: [&str; 6] = [
    "account", "admin", "attendee", "health", "login", "logout",
];

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if RESERVED_SLUGS.contains(&slug) {
        return Err(ValidationError::new("reserved_slug")
            .with_message("This slug is used by the site itself".into()));
    }

    let well_formed = !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("Use lowercase letters, digits and dashes".into()))
    }
}
