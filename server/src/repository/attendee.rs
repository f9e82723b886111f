use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{Attendee, ListedAttendee, NewAttendee};

pub async fn insert(pool: &SqlitePool, new: &NewAttendee) -> Result<Attendee, sqlx::Error> {
    sqlx::query_as::<_, Attendee>(
        "INSERT INTO attendees (event_id, user_id, name, client_id, timestamp) \
         VALUES (?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(new.event_id())
    .bind(new.user_id())
    .bind(new.name())
    .bind(new.client_id())
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Attendee>, sqlx::Error> {
    sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Attendees of an event in sign-up order, with linked user names.
pub async fn for_event(pool: &SqlitePool, event_id: i64) -> Result<Vec<ListedAttendee>, sqlx::Error> {
    sqlx::query_as::<_, ListedAttendee>(
        "SELECT a.*, u.name AS user_name FROM attendees a \
         LEFT JOIN users u ON u.id = a.user_id \
         WHERE a.event_id = ? ORDER BY a.timestamp, a.id",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}

/// A user's attendance history in sign-up order.
pub async fn for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Attendee>, sqlx::Error> {
    sqlx::query_as::<_, Attendee>(
        "SELECT * FROM attendees WHERE user_id = ? ORDER BY timestamp, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM attendees WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
