use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{check_email, require_non_blank, ValidationError};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("email", &self.email)?;
        check_email("email", Some(&self.email))?;
        if self.password.len() < 8 {
            return Err(ValidationError::field("password", "Password must be at least 8 characters"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 3,
            email: "admin@example.com".to_string(),
            hashed_password: "$2b$12$secret".to_string(),
            full_name: None,
            is_active: true,
            is_superuser: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["email"], "admin@example.com");
    }

    #[test]
    fn short_password_is_rejected() {
        let create = UserCreate {
            email: "a@b.org".to_string(),
            password: "short".to_string(),
            full_name: None,
            is_superuser: false,
        };
        assert!(create.validate().is_err());
    }
}
