use axum::extract::State;
use axum::response::Response;
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::CurrentUser;
use crate::models::{Attendee, User};
use crate::state::AppState;
use crate::utils::cookies::{site_cookie, SESSION_COOKIE};
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordForm {
    #[validate(length(min = 8, message = "Use at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AccountView {
    pub user: User,
    pub attended: Vec<Attendee>,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Response), AppError> {
    let identity = state.identity();
    let user = identity
        .authenticate(&form.login, &form.password)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid login or password".to_string()))?;

    let token = identity.open_session(&user).await?;
    let cookie = site_cookie(
        SESSION_COOKIE,
        token,
        state.config.cookie_max_age_secs(),
        state.config.secure_cookies,
    );
    Ok((jar.add(cookie), success(user, "Logged in")))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), AppError> {
    if let Some(session) = jar.get(SESSION_COOKIE) {
        state.identity().close_session(session.value()).await?;
    }

    let removal = Cookie::build(SESSION_COOKIE).path("/");
    Ok((jar.remove(removal), empty_success("Logged out")))
}

pub async fn show_account(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Response, AppError> {
    let user = current.required()?;
    let attended = state.attendance().history_of(&user).await?;
    Ok(success(AccountView { user, attended }, "Account loaded"))
}

pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<PasswordForm>,
) -> Result<Response, AppError> {
    let user = current.required()?;
    form.validate()?;
    state
        .identity()
        .change_password(user.id, &form.password)
        .await?;
    Ok(empty_success("Password changed"))
}
