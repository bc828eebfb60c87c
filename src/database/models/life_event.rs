use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enums::EventType;
use super::patch;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LifeEvent {
    pub id: i64,
    pub member_id: i64,
    pub event_type: EventType,
    pub event_date: NaiveDate,
    pub event_location: Option<String>,
    pub description: Option<String>,
    /// Second member involved (e.g. the spouse in a marriage)
    pub related_member_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LifeEventCreate {
    pub member_id: i64,
    pub event_type: EventType,
    pub event_date: NaiveDate,
    pub event_location: Option<String>,
    pub description: Option<String>,
    pub related_member_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LifeEventUpdate {
    pub member_id: Option<i64>,
    pub event_type: Option<EventType>,
    pub event_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub event_location: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub related_member_id: Option<Option<i64>>,
}

impl LifeEventUpdate {
    pub fn apply(self, e: &mut LifeEvent) {
        patch::apply(&mut e.member_id, self.member_id);
        patch::apply(&mut e.event_type, self.event_type);
        patch::apply(&mut e.event_date, self.event_date);
        patch::apply(&mut e.event_location, self.event_location);
        patch::apply(&mut e.description, self.description);
        patch::apply(&mut e.related_member_id, self.related_member_id);
    }
}
