use sqlx::SqlitePool;

use crate::models::{Location, LocationInput};

pub async fn list(pool: &SqlitePool) -> Result<Vec<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>("SELECT * FROM locations ORDER BY name, id")
        .fetch_all(pool)
        .await
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, input: &LocationInput) -> Result<Location, sqlx::Error> {
    sqlx::query_as::<_, Location>(
        "INSERT INTO locations (name, address, lat, lng, url) VALUES (?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.address)
    .bind(input.lat)
    .bind(input.lng)
    .bind(&input.url)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: &LocationInput,
) -> Result<Option<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>(
        "UPDATE locations SET name = ?, address = ?, lat = ?, lng = ?, url = ? \
         WHERE id = ? RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.address)
    .bind(input.lat)
    .bind(input.lng)
    .bind(&input.url)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM locations WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
