use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enums::BusinessCategory;
use super::{check_email, patch, require_non_blank, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub category: BusinessCategory,
    pub description: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: String,
    pub city: Option<String>,
    pub parish: Option<String>,
    pub postal_code: Option<String>,
    pub operating_hours: Option<String>,
    pub year_established: Option<i32>,
    pub number_of_employees: Option<i32>,
    pub halal_certified: bool,
    pub accepts_zakat: bool,
    pub social_media: Option<String>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<i64>,
}

/// Business row joined with its owner's name and phone.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BusinessWithOwner {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub business: Business,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessCreate {
    pub name: String,
    pub owner_id: i64,
    pub category: BusinessCategory,
    pub description: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: String,
    pub city: Option<String>,
    pub parish: Option<String>,
    pub postal_code: Option<String>,
    pub operating_hours: Option<String>,
    pub year_established: Option<i32>,
    pub number_of_employees: Option<i32>,
    #[serde(default)]
    pub halal_certified: bool,
    #[serde(default)]
    pub accepts_zakat: bool,
    pub social_media: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub notes: Option<String>,
}

fn default_true() -> bool {
    true
}

impl BusinessCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("name", &self.name)?;
        require_non_blank("address", &self.address)?;
        check_email("email", self.email.as_deref())?;
        check_counts(self.number_of_employees)
    }
}

fn check_counts(number_of_employees: Option<i32>) -> Result<(), ValidationError> {
    match number_of_employees {
        Some(n) if n < 0 => Err(ValidationError::field("number_of_employees", "Must not be negative")),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessUpdate {
    pub name: Option<String>,
    pub owner_id: Option<i64>,
    pub category: Option<BusinessCategory>,
    pub address: Option<String>,
    pub halal_certified: Option<bool>,
    pub accepts_zakat: Option<bool>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub parish: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub postal_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub operating_hours: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub year_established: Option<Option<i32>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub number_of_employees: Option<Option<i32>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub social_media: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub notes: Option<Option<String>>,
}

impl BusinessUpdate {
    pub fn apply(self, b: &mut Business) -> Result<(), ValidationError> {
        patch::apply(&mut b.name, self.name);
        patch::apply(&mut b.owner_id, self.owner_id);
        patch::apply(&mut b.category, self.category);
        patch::apply(&mut b.address, self.address);
        patch::apply(&mut b.halal_certified, self.halal_certified);
        patch::apply(&mut b.accepts_zakat, self.accepts_zakat);
        patch::apply(&mut b.is_active, self.is_active);
        patch::apply(&mut b.description, self.description);
        patch::apply(&mut b.phone_number, self.phone_number);
        patch::apply(&mut b.email, self.email);
        patch::apply(&mut b.website, self.website);
        patch::apply(&mut b.city, self.city);
        patch::apply(&mut b.parish, self.parish);
        patch::apply(&mut b.postal_code, self.postal_code);
        patch::apply(&mut b.operating_hours, self.operating_hours);
        patch::apply(&mut b.year_established, self.year_established);
        patch::apply(&mut b.number_of_employees, self.number_of_employees);
        patch::apply(&mut b.social_media, self.social_media);
        patch::apply(&mut b.notes, self.notes);

        require_non_blank("name", &b.name)?;
        require_non_blank("address", &b.address)?;
        check_email("email", b.email.as_deref())?;
        check_counts(b.number_of_employees)
    }
}
