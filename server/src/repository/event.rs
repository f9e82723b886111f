use sqlx::SqlitePool;

use crate::models::{Event, EventInput};

/// The event with the latest date.
pub async fn latest(pool: &SqlitePool) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date DESC, id DESC LIMIT 1")
        .fetch_optional(pool)
        .await
}

/// Every event carrying `slug`; callers decide what more than one means.
pub async fn with_slug(pool: &SqlitePool, slug: &str) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = ?")
        .bind(slug)
        .fetch_all(pool)
        .await
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date DESC, id DESC")
        .fetch_all(pool)
        .await
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, input: &EventInput) -> Result<Event, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        "INSERT INTO events (slug, name, location_id, text, date) VALUES (?, ?, ?, ?, ?) \
         RETURNING *",
    )
    .bind(&input.slug)
    .bind(&input.name)
    .bind(input.location_id)
    .bind(&input.text)
    .bind(input.date)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: &EventInput,
) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        "UPDATE events SET slug = ?, name = ?, location_id = ?, text = ?, date = ? \
         WHERE id = ? RETURNING *",
    )
    .bind(&input.slug)
    .bind(&input.name)
    .bind(input.location_id)
    .bind(&input.text)
    .bind(input.date)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
