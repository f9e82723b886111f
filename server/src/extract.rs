//! Request extractors for the two identities a request can carry.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::config::ClientId;
use crate::models::User;
use crate::services::attendance::Requester;
use crate::state::AppState;
use crate::utils::cookies::SESSION_COOKIE;
use crate::utils::error::AppError;

#[async_trait]
impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClientId>()
            .cloned()
            .ok_or_else(|| AppError::InternalServerError("client id layer not installed".into()))
    }
}

/// The logged-in user, resolved from the `session` cookie. `None` for
/// anonymous requests and for stale or disabled sessions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(session) = jar.get(SESSION_COOKIE) else {
            return Ok(CurrentUser(None));
        };
        let user = state.identity().session_user(session.value()).await?;
        Ok(CurrentUser(user))
    }
}

impl CurrentUser {
    pub fn required(self) -> Result<User, AppError> {
        self.0
            .ok_or_else(|| AppError::AuthError("Login required".to_string()))
    }
}

/// A logged-in administrator; rejects with 401 when anonymous and 403 when
/// the user lacks the admin flag.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state)
            .await?
            .required()?;
        if !user.is_admin {
            return Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Requester {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let client_id = ClientId::from_request_parts(parts, state).await?;
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        Ok(Requester { user, client_id })
    }
}
