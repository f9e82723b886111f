use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::Session;

pub async fn insert(pool: &SqlitePool, token: &str, user_id: i64) -> Result<Session, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        "INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(token)
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn find(pool: &SqlitePool, token: &str) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await
}

pub async fn delete(pool: &SqlitePool, token: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
