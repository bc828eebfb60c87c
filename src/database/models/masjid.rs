use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enums::MasjidType;
use super::{check_email, patch, require_non_blank, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Masjid {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub masjid_type: MasjidType,
    pub address: String,
    pub city: Option<String>,
    pub parish: String,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub imam_id: Option<i64>,
    pub established_year: Option<i32>,
    pub capacity: Option<i32>,
    pub facilities: Option<String>,
    pub prayer_times_info: Option<String>,
    pub jummah_time: Option<String>,
    pub activities: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<i64>,
}

/// Id and names only, for imam and shura listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MemberBasic {
    pub id: i64,
    pub muslim_name: String,
    pub legal_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MasjidWithRelations {
    #[serde(flatten)]
    pub masjid: Masjid,
    pub imam: Option<MemberBasic>,
    pub shura_members: Vec<MemberBasic>,
    pub affiliated_members_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MasjidCreate {
    pub name: String,
    #[serde(rename = "type", default = "default_type")]
    pub masjid_type: MasjidType,
    pub address: String,
    pub city: Option<String>,
    pub parish: String,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub imam_id: Option<i64>,
    pub established_year: Option<i32>,
    pub capacity: Option<i32>,
    pub facilities: Option<String>,
    pub prayer_times_info: Option<String>,
    pub jummah_time: Option<String>,
    pub activities: Option<String>,
    #[serde(default)]
    pub shura_member_ids: Vec<i64>,
}

fn default_type() -> MasjidType {
    MasjidType::Masjid
}

impl MasjidCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("name", &self.name)?;
        require_non_blank("address", &self.address)?;
        require_non_blank("parish", &self.parish)?;
        check_email("email", self.email.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MasjidUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub masjid_type: Option<MasjidType>,
    pub address: Option<String>,
    pub parish: Option<String>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub postal_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub imam_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub established_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub capacity: Option<Option<i32>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub facilities: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub prayer_times_info: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub jummah_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub activities: Option<Option<String>>,
    /// Replaces the whole shura set when present
    pub shura_member_ids: Option<Vec<i64>>,
}

impl MasjidUpdate {
    /// Apply column changes, handing back the new shura set if one was given.
    pub fn apply(self, m: &mut Masjid) -> Result<Option<Vec<i64>>, ValidationError> {
        patch::apply(&mut m.name, self.name);
        patch::apply(&mut m.masjid_type, self.masjid_type);
        patch::apply(&mut m.address, self.address);
        patch::apply(&mut m.parish, self.parish);
        patch::apply(&mut m.city, self.city);
        patch::apply(&mut m.postal_code, self.postal_code);
        patch::apply(&mut m.phone, self.phone);
        patch::apply(&mut m.email, self.email);
        patch::apply(&mut m.website, self.website);
        patch::apply(&mut m.imam_id, self.imam_id);
        patch::apply(&mut m.established_year, self.established_year);
        patch::apply(&mut m.capacity, self.capacity);
        patch::apply(&mut m.facilities, self.facilities);
        patch::apply(&mut m.prayer_times_info, self.prayer_times_info);
        patch::apply(&mut m.jummah_time, self.jummah_time);
        patch::apply(&mut m.activities, self.activities);

        require_non_blank("name", &m.name)?;
        require_non_blank("address", &m.address)?;
        require_non_blank("parish", &m.parish)?;
        check_email("email", m.email.as_deref())?;
        Ok(self.shura_member_ids)
    }
}
