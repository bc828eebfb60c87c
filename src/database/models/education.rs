use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enums::{EducationCategory, EducationType};
use super::{patch, require_non_blank, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Education {
    pub id: i64,
    pub member_id: i64,
    pub education_type: EducationType,
    pub category: EducationCategory,
    pub degree_name: String,
    pub institution: String,
    pub location: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub is_ongoing: bool,
    pub field_of_study: Option<String>,
    pub grade: Option<String>,
    pub achievements: Option<String>,
    pub islamic_qualification_details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EducationCreate {
    pub member_id: i64,
    pub education_type: EducationType,
    pub category: EducationCategory,
    pub degree_name: String,
    pub institution: String,
    pub location: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    #[serde(default)]
    pub is_ongoing: bool,
    pub field_of_study: Option<String>,
    pub grade: Option<String>,
    pub achievements: Option<String>,
    pub islamic_qualification_details: Option<String>,
}

impl EducationCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("degree_name", &self.degree_name)?;
        require_non_blank("institution", &self.institution)?;
        validate_years(self.start_year, self.end_year, self.is_ongoing)
    }
}

/// `end_year` may not precede `start_year`, and an ongoing course has no end year.
pub fn validate_years(start_year: Option<i32>, end_year: Option<i32>, is_ongoing: bool) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start_year, end_year) {
        if end < start {
            return Err(ValidationError::field("end_year", "End year must be after start year"));
        }
    }
    if is_ongoing && end_year.is_some() {
        return Err(ValidationError::field("is_ongoing", "Cannot be ongoing if end year is specified"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationUpdate {
    pub education_type: Option<EducationType>,
    pub category: Option<EducationCategory>,
    pub degree_name: Option<String>,
    pub institution: Option<String>,
    pub is_ongoing: Option<bool>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub start_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub end_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub field_of_study: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub grade: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub achievements: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub islamic_qualification_details: Option<Option<String>>,
}

impl EducationUpdate {
    /// Apply the patch, then check the merged record.
    pub fn apply(self, e: &mut Education) -> Result<(), ValidationError> {
        patch::apply(&mut e.education_type, self.education_type);
        patch::apply(&mut e.category, self.category);
        patch::apply(&mut e.degree_name, self.degree_name);
        patch::apply(&mut e.institution, self.institution);
        patch::apply(&mut e.is_ongoing, self.is_ongoing);
        patch::apply(&mut e.location, self.location);
        patch::apply(&mut e.start_year, self.start_year);
        patch::apply(&mut e.end_year, self.end_year);
        patch::apply(&mut e.field_of_study, self.field_of_study);
        patch::apply(&mut e.grade, self.grade);
        patch::apply(&mut e.achievements, self.achievements);
        patch::apply(&mut e.islamic_qualification_details, self.islamic_qualification_details);

        require_non_blank("degree_name", &e.degree_name)?;
        require_non_blank("institution", &e.institution)?;
        validate_years(e.start_year, e.end_year, e.is_ongoing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_before_start_is_rejected() {
        let err = validate_years(Some(2010), Some(2008), false).unwrap_err();
        assert!(err.field_errors.contains_key("end_year"));
    }

    #[test]
    fn ongoing_with_end_year_is_rejected() {
        assert!(validate_years(Some(2020), Some(2024), true).is_err());
        assert!(validate_years(Some(2020), None, true).is_ok());
        assert!(validate_years(None, Some(2001), false).is_ok());
    }
}
