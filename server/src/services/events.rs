use sqlx::SqlitePool;
use tracing::debug;

use crate::models::Event;
use crate::repository;
use crate::utils::error::AppError;

/// The most recent event when `slug` is `None`, otherwise the single event
/// with that slug. Zero or several matches are both not-found.
pub async fn resolve(pool: &SqlitePool, slug: Option<&str>) -> Result<Event, AppError> {
    match slug {
        None => repository::event::latest(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No event has been published yet".to_string())),
        Some(slug) => {
            let mut matches = repository::event::with_slug(pool, slug).await?;
            debug!(slug, matches = matches.len(), "Resolved event slug");
            match (matches.pop(), matches.is_empty()) {
                (Some(event), true) => Ok(event),
                _ => Err(AppError::NotFound(format!("Event '{slug}' was not found"))),
            }
        }
    }
}
