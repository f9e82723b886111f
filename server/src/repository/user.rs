use sqlx::SqlitePool;

use crate::models::{User, UserInput};

pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY login")
        .fetch_all(pool)
        .await
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_login(pool: &SqlitePool, login: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE login = ?")
        .bind(login)
        .fetch_optional(pool)
        .await
}

/// Inserts a user with an already hashed (or empty) password.
pub async fn insert(
    pool: &SqlitePool,
    input: &UserInput,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (login, password, name, email, is_admin, enabled) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(&input.login)
    .bind(password_hash)
    .bind(&input.name)
    .bind(&input.email)
    .bind(input.is_admin)
    .bind(input.enabled)
    .fetch_one(pool)
    .await
}

/// Updates profile fields; the password is left alone.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: &UserInput,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET login = ?, name = ?, email = ?, is_admin = ?, enabled = ? \
         WHERE id = ? RETURNING *",
    )
    .bind(&input.login)
    .bind(&input.name)
    .bind(&input.email)
    .bind(input.is_admin)
    .bind(input.enabled)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn set_password(pool: &SqlitePool, id: i64, password_hash: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Deletes a user but keeps their attendance: each row is detached from the
/// account, keeps the account's display name and is tied to `client_id`,
/// which no browser holds. Returns `None` when the user does not exist,
/// otherwise the number of attendee rows kept.
pub async fn delete(
    pool: &SqlitePool,
    id: i64,
    client_id: &str,
) -> Result<Option<u64>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let kept = sqlx::query(
        "UPDATE attendees SET name = (SELECT name FROM users WHERE id = ?), \
         client_id = ?, user_id = NULL WHERE user_id = ?",
    )
    .bind(id)
    .bind(client_id)
    .bind(id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let deleted = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        tx.rollback().await?;
        return Ok(None);
    }
    tx.commit().await?;
    Ok(Some(kept))
}
