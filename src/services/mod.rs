pub mod businesses;
pub mod educations;
pub mod life_events;
pub mod masjids;
pub mod members;
pub mod restaurants;
pub mod users;

pub use businesses::BusinessService;
pub use educations::EducationService;
pub use life_events::LifeEventService;
pub use masjids::MasjidService;
pub use members::MemberService;
pub use restaurants::RestaurantService;
pub use users::UserService;

use serde::Serialize;

use crate::auth::AuthError;
use crate::database::models::ValidationError;
use crate::database::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Body returned by delete endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deleted {
    pub detail: String,
}

impl Deleted {
    pub fn new(label: &str) -> Self {
        Self { detail: format!("{} deleted successfully", label) }
    }
}

/// Offset window for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(skip: i64, limit: i64) -> Result<Self, ValidationError> {
        if skip < 0 {
            return Err(ValidationError::field("skip", "Must be zero or greater"));
        }
        if limit <= 0 {
            return Err(ValidationError::field("limit", "Must be greater than zero"));
        }
        Ok(Self { skip, limit })
    }
}

/// `%term%` for ILIKE, or `None` when the term is blank.
pub(crate) fn like_pattern(search: Option<&str>) -> Option<String> {
    search.map(str::trim).filter(|s| !s.is_empty()).map(|s| format!("%{}%", s))
}

/// Fail with `NotFound("<label> not found")` unless `exists` holds.
pub(crate) fn require_found(exists: bool, label: &str) -> ServiceResult<()> {
    if exists {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("{} not found", label)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(like_pattern(Some("  ")), None);
        assert_eq!(like_pattern(None), None);
        assert_eq!(like_pattern(Some(" Ali ")).as_deref(), Some("%Ali%"));
    }

    #[test]
    fn page_rejects_negative_window() {
        assert!(Page::new(-1, 10).is_err());
        assert!(Page::new(0, 0).is_err());
        assert_eq!(Page::new(5, 20).unwrap(), Page { skip: 5, limit: 20 });
    }

    #[test]
    fn deleted_message_names_the_entity() {
        assert_eq!(Deleted::new("Member").detail, "Member deleted successfully");
    }
}
