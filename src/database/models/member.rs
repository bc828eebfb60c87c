use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enums::{Gender, MaritalStatus, SalaryPeriod};
use super::life_event::LifeEvent;
use super::{check_email, patch, require_non_blank, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: i64,
    pub muslim_name: String,
    pub legal_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub date_of_conversion: Option<NaiveDate>,
    pub marital_status: Option<MaritalStatus>,
    pub present_address: Option<String>,
    pub permanent_address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub workplace: Option<String>,
    pub occupation: Option<String>,
    pub salary: Option<f64>,
    pub salary_period: Option<SalaryPeriod>,
    pub spouse_id: Option<i64>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub burial_location: Option<String>,
    pub date_of_death: Option<NaiveDate>,
    pub notes: Option<String>,
    pub masjid_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<i64>,
}

impl Member {
    /// Active members have no recorded date of death.
    pub fn is_active(&self) -> bool {
        self.date_of_death.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberWithRelations {
    #[serde(flatten)]
    pub member: Member,
    pub life_events: Vec<LifeEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberCreate {
    pub muslim_name: String,
    pub legal_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub date_of_conversion: Option<NaiveDate>,
    pub marital_status: Option<MaritalStatus>,
    pub present_address: Option<String>,
    pub permanent_address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub workplace: Option<String>,
    pub occupation: Option<String>,
    pub salary: Option<f64>,
    pub salary_period: Option<SalaryPeriod>,
    pub spouse_id: Option<i64>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub burial_location: Option<String>,
    pub date_of_death: Option<NaiveDate>,
    pub notes: Option<String>,
    pub masjid_id: Option<i64>,
}

impl MemberCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("muslim_name", &self.muslim_name)?;
        require_non_blank("legal_name", &self.legal_name)?;
        check_email("email", self.email.as_deref())?;
        validate_dates(self.date_of_birth, self.date_of_death)
    }
}

fn validate_dates(date_of_birth: NaiveDate, date_of_death: Option<NaiveDate>) -> Result<(), ValidationError> {
    match date_of_death {
        Some(death) if death < date_of_birth => {
            Err(ValidationError::field("date_of_death", "Date of death cannot precede date of birth"))
        }
        _ => Ok(()),
    }
}

/// Partial update. Nullable columns use `Option<Option<_>>` so an explicit
/// `null` clears the value while an absent key leaves it untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberUpdate {
    pub muslim_name: Option<String>,
    pub legal_name: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub date_of_conversion: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub marital_status: Option<Option<MaritalStatus>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub present_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub permanent_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub workplace: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub occupation: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub salary: Option<Option<f64>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub salary_period: Option<Option<SalaryPeriod>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub spouse_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub father_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub mother_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub burial_location: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub date_of_death: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub masjid_id: Option<Option<i64>>,
}

impl MemberUpdate {
    pub fn apply(self, m: &mut Member) -> Result<(), ValidationError> {
        patch::apply(&mut m.muslim_name, self.muslim_name);
        patch::apply(&mut m.legal_name, self.legal_name);
        patch::apply(&mut m.gender, self.gender);
        patch::apply(&mut m.date_of_birth, self.date_of_birth);
        patch::apply(&mut m.date_of_conversion, self.date_of_conversion);
        patch::apply(&mut m.marital_status, self.marital_status);
        patch::apply(&mut m.present_address, self.present_address);
        patch::apply(&mut m.permanent_address, self.permanent_address);
        patch::apply(&mut m.phone_number, self.phone_number);
        patch::apply(&mut m.email, self.email);
        patch::apply(&mut m.workplace, self.workplace);
        patch::apply(&mut m.occupation, self.occupation);
        patch::apply(&mut m.salary, self.salary);
        patch::apply(&mut m.salary_period, self.salary_period);
        patch::apply(&mut m.spouse_id, self.spouse_id);
        patch::apply(&mut m.father_name, self.father_name);
        patch::apply(&mut m.mother_name, self.mother_name);
        patch::apply(&mut m.burial_location, self.burial_location);
        patch::apply(&mut m.date_of_death, self.date_of_death);
        patch::apply(&mut m.notes, self.notes);
        patch::apply(&mut m.masjid_id, self.masjid_id);

        require_non_blank("muslim_name", &m.muslim_name)?;
        require_non_blank("legal_name", &m.legal_name)?;
        check_email("email", m.email.as_deref())?;
        validate_dates(m.date_of_birth, m.date_of_death)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample() -> Member {
        Member {
            id: 1,
            muslim_name: "Abdullah".to_string(),
            legal_name: "John Brown".to_string(),
            gender: Gender::Male,
            date_of_birth: NaiveDate::from_ymd_opt(1980, 5, 1).unwrap(),
            date_of_conversion: None,
            marital_status: Some(MaritalStatus::Married),
            present_address: None,
            permanent_address: None,
            phone_number: Some("876-555-0100".to_string()),
            email: None,
            workplace: None,
            occupation: None,
            salary: None,
            salary_period: None,
            spouse_id: None,
            father_name: None,
            mother_name: None,
            burial_location: None,
            date_of_death: Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
            notes: None,
            masjid_id: None,
            created_at: Utc::now(),
            updated_at: None,
            created_by: None,
        }
    }

    #[test]
    fn explicit_null_clears_date_of_death() {
        let mut member = sample();
        let patch: MemberUpdate = serde_json::from_str(r#"{"date_of_death": null}"#).unwrap();
        patch.apply(&mut member).unwrap();
        assert!(member.is_active());
    }

    #[test]
    fn absent_fields_are_untouched() {
        let mut member = sample();
        let patch: MemberUpdate = serde_json::from_str(r#"{"occupation": "Teacher"}"#).unwrap();
        patch.apply(&mut member).unwrap();
        assert_eq!(member.occupation.as_deref(), Some("Teacher"));
        assert_eq!(member.marital_status, Some(MaritalStatus::Married));
        assert!(!member.is_active());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut member = sample();
        let patch: MemberUpdate = serde_json::from_str(r#"{"legal_name": "  "}"#).unwrap();
        let err = patch.apply(&mut member).unwrap_err();
        assert!(err.field_errors.contains_key("legal_name"));
    }
}
