use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub login: String,
    /// Argon2 PHC string, or legacy plain text awaiting migration.
    #[serde(skip)]
    pub password: String,
    pub name: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub enabled: bool,
}

/// Admin create/update payload. `password` is plain text and is hashed
/// before it is stored; omit it to keep the current one.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserInput {
    #[validate(length(min = 1, message = "Login is required"))]
    pub login: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[validate(length(min = 1))]
    pub password: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_never_serialized() {
        let user = User {
            id: 7,
            login: "jan".into(),
            password: "$argon2id$secret".into(),
            name: "Jan".into(),
            email: None,
            is_admin: false,
            enabled: true,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["login"], "jan");
    }

    #[test]
    fn test_input_defaults() {
        let input: UserInput =
            serde_json::from_str(r#"{"login":"jan","name":"Jan"}"#).unwrap();
        assert!(input.enabled);
        assert!(!input.is_admin);
        assert!(input.password.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_bad_email_rejected() {
        let input: UserInput =
            serde_json::from_str(r#"{"login":"jan","name":"Jan","email":"nope"}"#).unwrap();
        assert!(input.validate().is_err());
    }
}
