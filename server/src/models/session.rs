use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Login session; the token is the value of the `session` cookie.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
