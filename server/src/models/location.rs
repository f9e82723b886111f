use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub url: Option<String>,
}

/// Admin create/update payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocationInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
    #[validate(url)]
    pub url: Option<String>,
}
