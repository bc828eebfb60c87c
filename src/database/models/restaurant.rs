use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enums::MenuFileType;
use super::{check_email, patch, require_non_blank, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub parish: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub is_halal_certified: bool,
    pub has_halal_options: bool,
    pub has_vegetarian_options: bool,
    pub has_vegan_options: bool,
    /// Comma-separated list
    pub cuisine_types: Option<String>,
    pub opening_hours: Option<String>,
    pub description: Option<String>,
    pub business_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Menu file metadata. The file itself lives outside the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RestaurantMenu {
    pub id: i64,
    pub restaurant_id: i64,
    pub file_name: String,
    pub file_path: String,
    pub file_type: MenuFileType,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantMenuCreate {
    pub file_name: String,
    pub file_type: MenuFileType,
}

impl RestaurantMenuCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("file_name", &self.file_name)?;
        if self.file_name.contains('/') || self.file_name.contains('\\') {
            return Err(ValidationError::field("file_name", "File name must not contain path separators"));
        }
        if self.file_name.trim().chars().all(|c| c == '.') {
            return Err(ValidationError::field("file_name", "File name must not be a relative path"));
        }
        Ok(())
    }

    /// Storage path for this menu under the restaurant's upload directory.
    pub fn file_path(&self, restaurant_id: i64) -> String {
        format!("uploads/restaurants/{}/{}", restaurant_id, self.file_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub address: String,
    pub parish: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub is_halal_certified: bool,
    #[serde(default)]
    pub has_halal_options: bool,
    #[serde(default)]
    pub has_vegetarian_options: bool,
    #[serde(default)]
    pub has_vegan_options: bool,
    pub cuisine_types: Option<String>,
    pub opening_hours: Option<String>,
    pub description: Option<String>,
    pub business_id: Option<i64>,
}

impl RestaurantCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("name", &self.name)?;
        require_non_blank("address", &self.address)?;
        require_non_blank("parish", &self.parish)?;
        check_email("email", self.email.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub parish: Option<String>,
    pub is_halal_certified: Option<bool>,
    pub has_halal_options: Option<bool>,
    pub has_vegetarian_options: Option<bool>,
    pub has_vegan_options: Option<bool>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub cuisine_types: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub opening_hours: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub business_id: Option<Option<i64>>,
}

impl RestaurantUpdate {
    pub fn apply(self, r: &mut Restaurant) -> Result<(), ValidationError> {
        patch::apply(&mut r.name, self.name);
        patch::apply(&mut r.address, self.address);
        patch::apply(&mut r.parish, self.parish);
        patch::apply(&mut r.is_halal_certified, self.is_halal_certified);
        patch::apply(&mut r.has_halal_options, self.has_halal_options);
        patch::apply(&mut r.has_vegetarian_options, self.has_vegetarian_options);
        patch::apply(&mut r.has_vegan_options, self.has_vegan_options);
        patch::apply(&mut r.phone, self.phone);
        patch::apply(&mut r.email, self.email);
        patch::apply(&mut r.website, self.website);
        patch::apply(&mut r.cuisine_types, self.cuisine_types);
        patch::apply(&mut r.opening_hours, self.opening_hours);
        patch::apply(&mut r.description, self.description);
        patch::apply(&mut r.business_id, self.business_id);

        require_non_blank("name", &r.name)?;
        require_non_blank("address", &r.address)?;
        require_non_blank("parish", &r.parish)?;
        check_email("email", r.email.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_path_is_scoped_to_restaurant() {
        let menu = RestaurantMenuCreate { file_name: "lunch.pdf".to_string(), file_type: MenuFileType::Pdf };
        assert!(menu.validate().is_ok());
        assert_eq!(menu.file_path(12), "uploads/restaurants/12/lunch.pdf");
    }

    #[test]
    fn menu_rejects_traversal() {
        let menu = RestaurantMenuCreate { file_name: "../../etc/passwd".to_string(), file_type: MenuFileType::Image };
        assert!(menu.validate().is_err());
    }

    #[test]
    fn menu_rejects_dot_names() {
        for name in [".", "..", "...", " .. "] {
            let menu = RestaurantMenuCreate { file_name: name.to_string(), file_type: MenuFileType::Pdf };
            assert!(menu.validate().is_err(), "{:?} accepted", name);
        }
        let menu = RestaurantMenuCreate { file_name: ".menu.pdf".to_string(), file_type: MenuFileType::Pdf };
        assert!(menu.validate().is_ok());
    }

    #[test]
    fn unknown_menu_type_fails_to_parse() {
        let parsed: Result<RestaurantMenuCreate, _> =
            serde_json::from_str(r#"{"file_name": "menu.docx", "file_type": "document"}"#);
        assert!(parsed.is_err());
    }
}
