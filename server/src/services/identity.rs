//! Password authentication, user loading and login sessions.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::models::User;
use crate::repository;
use crate::utils::error::AppError;

const SESSION_TOKEN_BYTES: usize = 32;

/// Outcome of comparing a candidate password with the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    /// Matched an Argon2 hash.
    Hashed,
    /// Matched a legacy plain-text value; the caller should rehash.
    Legacy,
    Mismatch,
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalServerError(format!("password hashing failed: {e}")))
}

/// An empty stored password never matches. Values that are not PHC strings
/// are compared as plain text only when `allow_legacy` is set.
pub fn check_password(stored: &str, candidate: &str, allow_legacy: bool) -> PasswordCheck {
    if stored.is_empty() {
        return PasswordCheck::Mismatch;
    }
    match PasswordHash::new(stored) {
        Ok(parsed) => {
            if Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok()
            {
                PasswordCheck::Hashed
            } else {
                PasswordCheck::Mismatch
            }
        }
        Err(_) if allow_legacy && stored == candidate => PasswordCheck::Legacy,
        Err(_) => PasswordCheck::Mismatch,
    }
}

#[derive(Clone)]
pub struct IdentityService {
    pool: SqlitePool,
    allow_legacy: bool,
}

impl IdentityService {
    pub fn new(pool: SqlitePool, allow_legacy: bool) -> Self {
        Self { pool, allow_legacy }
    }

    /// The enabled user with this login and password, if any.
    ///
    /// With legacy passwords allowed, a plain-text match rewrites the stored
    /// password as a hash, so this may write to the database.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<Option<User>, AppError> {
        let Some(user) = repository::user::find_by_login(&self.pool, login).await? else {
            debug!(login, "Unknown login");
            return Ok(None);
        };
        if !user.enabled {
            debug!(login, "Login refused for disabled user");
            return Ok(None);
        }

        match check_password(&user.password, password, self.allow_legacy) {
            PasswordCheck::Hashed => Ok(Some(user)),
            PasswordCheck::Legacy => {
                warn!(user_id = user.id, "Plain-text password accepted, rehashing");
                self.change_password(user.id, password).await?;
                Ok(Some(user))
            }
            PasswordCheck::Mismatch => {
                debug!(login, "Password mismatch");
                Ok(None)
            }
        }
    }

    /// The enabled user with this id, if any.
    pub async fn load_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = repository::user::find(&self.pool, id).await?;
        Ok(user.filter(|u| u.enabled))
    }

    /// Stores a freshly salted hash of `new_password`.
    pub async fn change_password(&self, user_id: i64, new_password: &str) -> Result<(), AppError> {
        let hash = hash_password(new_password)?;
        repository::user::set_password(&self.pool, user_id, &hash).await?;
        info!(user_id, "Password changed");
        Ok(())
    }

    /// Creates a session for `user` and returns its token.
    pub async fn open_session(&self, user: &User) -> Result<String, AppError> {
        let mut raw = [0u8; SESSION_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut raw);
        let token = URL_SAFE_NO_PAD.encode(raw);

        repository::session::insert(&self.pool, &token, user.id).await?;
        info!(user_id = user.id, "Session opened");
        Ok(token)
    }

    /// The user behind a session token, if the session and the user are
    /// still valid.
    pub async fn session_user(&self, token: &str) -> Result<Option<User>, AppError> {
        match repository::session::find(&self.pool, token).await? {
            Some(session) => self.load_user(session.user_id).await,
            None => Ok(None),
        }
    }

    pub async fn close_session(&self, token: &str) -> Result<(), AppError> {
        if repository::session::delete(&self.pool, token).await? {
            info!("Session closed");
        }
        Ok(())
    }
}
