pub mod business;
pub mod education;
pub mod enums;
pub mod life_event;
pub mod masjid;
pub mod member;
pub mod restaurant;
pub mod user;

pub use business::{Business, BusinessCreate, BusinessUpdate, BusinessWithOwner};
pub use education::{Education, EducationCreate, EducationUpdate};
pub use enums::*;
pub use life_event::{LifeEvent, LifeEventCreate, LifeEventUpdate};
pub use masjid::{Masjid, MasjidCreate, MasjidUpdate, MasjidWithRelations, MemberBasic};
pub use member::{Member, MemberCreate, MemberUpdate, MemberWithRelations};
pub use restaurant::{Restaurant, RestaurantCreate, RestaurantMenu, RestaurantMenuCreate, RestaurantUpdate};
pub use user::{User, UserCreate};

use std::collections::HashMap;

/// Payload rejected before reaching the database.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub field_errors: HashMap<String, String>,
}

impl ValidationError {
    pub fn field(field: &str, problem: impl Into<String>) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), problem.into());
        Self { message: "Invalid field value".to_string(), field_errors }
    }
}

pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::field(field, "This field is required"));
    }
    Ok(())
}

pub(crate) fn check_email(field: &str, value: Option<&str>) -> Result<(), ValidationError> {
    if let Some(email) = value {
        let valid = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
            None => false,
        };
        if !valid {
            return Err(ValidationError::field(field, "Invalid email format"));
        }
    }
    Ok(())
}

/// Serde helpers for partial updates.
///
/// With `#[serde(default, deserialize_with = "patch::double_option")]` an
/// `Option<Option<T>>` field reads as `None` when the key is absent,
/// `Some(None)` for an explicit `null` and `Some(Some(v))` otherwise.
pub mod patch {
    use serde::{Deserialize, Deserializer};

    pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }

    /// Overwrite `target` when the patch carried a value for it.
    pub fn apply<T>(target: &mut T, value: Option<T>) {
        if let Some(v) = value {
            *target = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patched {
        #[serde(default, deserialize_with = "patch::double_option")]
        date_of_death: Option<Option<String>>,
    }

    #[test]
    fn double_option_distinguishes_absent_from_null() {
        let absent: Patched = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.date_of_death, None);
        let null: Patched = serde_json::from_str(r#"{"date_of_death": null}"#).unwrap();
        assert_eq!(null.date_of_death, Some(None));
        let set: Patched = serde_json::from_str(r#"{"date_of_death": "2020-01-01"}"#).unwrap();
        assert_eq!(set.date_of_death, Some(Some("2020-01-01".to_string())));
    }

    #[test]
    fn email_check() {
        assert!(check_email("email", Some("a@b.com")).is_ok());
        assert!(check_email("email", None).is_ok());
        assert!(check_email("email", Some("nope")).is_err());
        assert!(check_email("email", Some("a@.com")).is_err());
    }
}
