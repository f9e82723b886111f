//! JSON record editor over locations, events and users, restricted to
//! administrators.

use axum::async_trait;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::config::ClientId;
use crate::extract::AdminUser;
use crate::models::{Event, EventInput, Location, LocationInput, User, UserInput};
use crate::repository;
use crate::services::identity::hash_password;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

/// One editable record kind.
#[async_trait]
pub trait AdminResource: Send + Sync + 'static {
    /// Path segment under `/admin`.
    const PATH: &'static str;
    const LABEL: &'static str;

    type Record: Serialize + Send;
    type Input: DeserializeOwned + Validate + Send + 'static;

    async fn list(state: &AppState) -> Result<Vec<Self::Record>, AppError>;
    async fn find(state: &AppState, id: i64) -> Result<Option<Self::Record>, AppError>;
    async fn create(state: &AppState, input: Self::Input) -> Result<Self::Record, AppError>;
    async fn update(
        state: &AppState,
        id: i64,
        input: Self::Input,
    ) -> Result<Option<Self::Record>, AppError>;
    async fn delete(state: &AppState, id: i64) -> Result<bool, AppError>;
}

pub struct Locations;
pub struct Events;
pub struct Users;

#[async_trait]
impl AdminResource for Locations {
    const PATH: &'static str = "locations";
    const LABEL: &'static str = "Location";

    type Record = Location;
    type Input = LocationInput;

    async fn list(state: &AppState) -> Result<Vec<Location>, AppError> {
        Ok(repository::location::list(&state.pool).await?)
    }

    async fn find(state: &AppState, id: i64) -> Result<Option<Location>, AppError> {
        Ok(repository::location::find(&state.pool, id).await?)
    }

    async fn create(state: &AppState, input: LocationInput) -> Result<Location, AppError> {
        repository::location::insert(&state.pool, &input)
            .await
            .map_err(|e| AppError::from_write(e, Self::LABEL))
    }

    async fn update(
        state: &AppState,
        id: i64,
        input: LocationInput,
    ) -> Result<Option<Location>, AppError> {
        repository::location::update(&state.pool, id, &input)
            .await
            .map_err(|e| AppError::from_write(e, Self::LABEL))
    }

    async fn delete(state: &AppState, id: i64) -> Result<bool, AppError> {
        Ok(repository::location::delete(&state.pool, id).await?)
    }
}

#[async_trait]
impl AdminResource for Events {
    const PATH: &'static str = "events";
    const LABEL: &'static str = "Event";

    type Record = Event;
    type Input = EventInput;

    async fn list(state: &AppState) -> Result<Vec<Event>, AppError> {
        Ok(repository::event::list(&state.pool).await?)
    }

    async fn find(state: &AppState, id: i64) -> Result<Option<Event>, AppError> {
        Ok(repository::event::find(&state.pool, id).await?)
    }

    async fn create(state: &AppState, input: EventInput) -> Result<Event, AppError> {
        repository::event::insert(&state.pool, &input)
            .await
            .map_err(|e| AppError::from_write(e, "Event with this slug"))
    }

    async fn update(state: &AppState, id: i64, input: EventInput) -> Result<Option<Event>, AppError> {
        repository::event::update(&state.pool, id, &input)
            .await
            .map_err(|e| AppError::from_write(e, "Event with this slug"))
    }

    async fn delete(state: &AppState, id: i64) -> Result<bool, AppError> {
        Ok(repository::event::delete(&state.pool, id).await?)
    }
}

#[async_trait]
impl AdminResource for Users {
    const PATH: &'static str = "users";
    const LABEL: &'static str = "User";

    type Record = User;
    type Input = UserInput;

    async fn list(state: &AppState) -> Result<Vec<User>, AppError> {
        Ok(repository::user::list(&state.pool).await?)
    }

    async fn find(state: &AppState, id: i64) -> Result<Option<User>, AppError> {
        Ok(repository::user::find(&state.pool, id).await?)
    }

    async fn create(state: &AppState, input: UserInput) -> Result<User, AppError> {
        // No password means the account cannot log in until one is set.
        let hash = match input.password.as_deref() {
            Some(password) => hash_password(password)?,
            None => String::new(),
        };
        repository::user::insert(&state.pool, &input, &hash)
            .await
            .map_err(|e| AppError::from_write(e, "User with this login"))
    }

    async fn update(state: &AppState, id: i64, input: UserInput) -> Result<Option<User>, AppError> {
        let user = repository::user::update(&state.pool, id, &input)
            .await
            .map_err(|e| AppError::from_write(e, "User with this login"))?;
        if let (Some(user), Some(password)) = (&user, input.password.as_deref()) {
            state.identity().change_password(user.id, password).await?;
        }
        Ok(user)
    }

    async fn delete(state: &AppState, id: i64) -> Result<bool, AppError> {
        let orphaned = ClientId::generate();
        let kept = repository::user::delete(&state.pool, id, orphaned.as_str()).await?;
        if let Some(kept) = kept {
            info!(user_id = id, kept_attendees = kept, "Detached attendance of deleted user");
        }
        Ok(kept.is_some())
    }
}

fn not_found<R: AdminResource>(id: i64) -> AppError {
    AppError::NotFound(format!("{} {id} was not found", R::LABEL))
}

async fn list<R: AdminResource>(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Response, AppError> {
    let records = R::list(&state).await?;
    Ok(success(records, format!("{} list", R::LABEL)))
}

async fn show<R: AdminResource>(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let record = R::find(&state, id).await?.ok_or_else(|| not_found::<R>(id))?;
    Ok(success(record, format!("{} loaded", R::LABEL)))
}

async fn create<R: AdminResource>(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(input): Json<R::Input>,
) -> Result<Response, AppError> {
    input.validate()?;
    let record = R::create(&state, input).await?;
    info!(admin = %admin.login, resource = R::PATH, "Admin created record");
    Ok(created(record, format!("{} created", R::LABEL)))
}

async fn update<R: AdminResource>(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(input): Json<R::Input>,
) -> Result<Response, AppError> {
    input.validate()?;
    let record = R::update(&state, id, input)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    info!(admin = %admin.login, resource = R::PATH, id, "Admin updated record");
    Ok(success(record, format!("{} updated", R::LABEL)))
}

async fn remove<R: AdminResource>(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if !R::delete(&state, id).await? {
        return Err(not_found::<R>(id));
    }
    info!(admin = %admin.login, resource = R::PATH, id, "Admin deleted record");
    Ok(empty_success(format!("{} deleted", R::LABEL)))
}

fn resource<R: AdminResource>() -> Router<AppState> {
    let collection = format!("/admin/{}", R::PATH);
    let member = format!("{collection}/:id");
    Router::new()
        .route(&collection, get(list::<R>).post(create::<R>))
        .route(
            &member,
            get(show::<R>).put(update::<R>).delete(remove::<R>),
        )
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(resource::<Locations>())
        .merge(resource::<Events>())
        .merge(resource::<Users>())
}
