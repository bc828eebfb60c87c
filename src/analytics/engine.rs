use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::clock::Clock;
use super::store::AnalyticsStore;
use crate::database::models::EventType;
use crate::database::DatabaseError;

const RECENT_EVENT_LIMIT: i64 = 10;
const TOP_CATEGORY_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBucket {
    UpTo18,
    From19To30,
    From31To45,
    From46To60,
    Over60,
}

impl AgeBucket {
    /// Negative ages (birth dates after today) fall in the youngest bucket.
    pub fn for_age(age: i64) -> Self {
        match age {
            i64::MIN..=18 => AgeBucket::UpTo18,
            19..=30 => AgeBucket::From19To30,
            31..=45 => AgeBucket::From31To45,
            46..=60 => AgeBucket::From46To60,
            _ => AgeBucket::Over60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::UpTo18 => "0-18",
            AgeBucket::From19To30 => "19-30",
            AgeBucket::From31To45 => "31-45",
            AgeBucket::From46To60 => "46-60",
            AgeBucket::Over60 => "60+",
        }
    }
}

/// Whole years as `floor(days / 365)`, ignoring leap days.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i64 {
    (today - date_of_birth).num_days().div_euclid(365)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AgeDistribution {
    #[serde(rename = "0-18")]
    pub up_to_18: i64,
    #[serde(rename = "19-30")]
    pub from_19_to_30: i64,
    #[serde(rename = "31-45")]
    pub from_31_to_45: i64,
    #[serde(rename = "46-60")]
    pub from_46_to_60: i64,
    #[serde(rename = "60+")]
    pub over_60: i64,
}

impl AgeDistribution {
    pub fn from_birth_dates(dates: &[NaiveDate], today: NaiveDate) -> Self {
        let mut dist = Self::default();
        for dob in dates {
            dist.record(AgeBucket::for_age(age_in_years(*dob, today)));
        }
        dist
    }

    pub fn record(&mut self, bucket: AgeBucket) {
        match bucket {
            AgeBucket::UpTo18 => self.up_to_18 += 1,
            AgeBucket::From19To30 => self.from_19_to_30 += 1,
            AgeBucket::From31To45 => self.from_31_to_45 += 1,
            AgeBucket::From46To60 => self.from_46_to_60 += 1,
            AgeBucket::Over60 => self.over_60 += 1,
        }
    }

    pub fn get(&self, bucket: AgeBucket) -> i64 {
        match bucket {
            AgeBucket::UpTo18 => self.up_to_18,
            AgeBucket::From19To30 => self.from_19_to_30,
            AgeBucket::From31To45 => self.from_31_to_45,
            AgeBucket::From46To60 => self.from_46_to_60,
            AgeBucket::Over60 => self.over_60,
        }
    }

    pub fn total(&self) -> i64 {
        self.up_to_18 + self.from_19_to_30 + self.from_31_to_45 + self.from_46_to_60 + self.over_60
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentEvent {
    pub id: i64,
    pub event_type: EventType,
    pub event_date: NaiveDate,
    pub member_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_members: i64,
    pub active_members: i64,
    pub deceased_members: i64,
    pub total_businesses: i64,
    pub active_businesses: i64,
    pub halal_certified_businesses: i64,
    pub zakat_accepting_businesses: i64,
    pub marital_status_distribution: BTreeMap<String, i64>,
    pub conversions_this_year: i64,
    pub age_distribution: AgeDistribution,
    pub business_category_distribution: BTreeMap<String, i64>,
    pub event_type_distribution: BTreeMap<String, i64>,
    pub recent_events: Vec<RecentEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberStatistics {
    pub average_salary: Option<f64>,
    pub employment_rate: f64,
    /// Active owners over active members
    pub business_ownership_rate: f64,
    /// Every distinct owner, deceased included
    pub members_with_businesses: i64,
    pub conversions_by_year: BTreeMap<i32, i64>,
    pub top_business_categories: Vec<CategoryCount>,
}

/// `part / whole * 100`, or `0.0` when `whole` is zero.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Highest counts first; equal counts by label ascending.
pub fn top_categories(mut counts: Vec<(String, i64)>, limit: usize) -> Vec<CategoryCount> {
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
        .into_iter()
        .take(limit)
        .map(|(category, count)| CategoryCount { category, count })
        .collect()
}

/// Dashboard and member-statistics summaries over a read-only store.
pub struct AnalyticsEngine<'a> {
    store: &'a dyn AnalyticsStore,
    clock: &'a dyn Clock,
}

impl<'a> AnalyticsEngine<'a> {
    pub fn new(store: &'a dyn AnalyticsStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary, DatabaseError> {
        let today = self.clock.today();
        let members = self.store.member_totals().await?;
        let businesses = self.store.business_totals().await?;

        let recent_events = self
            .store
            .recent_life_events(RECENT_EVENT_LIMIT)
            .await?
            .into_iter()
            .map(|e| RecentEvent { id: e.id, event_type: e.event_type, event_date: e.event_date, member_id: e.member_id })
            .collect();

        let birth_dates = self.store.active_birth_dates().await?;
        let age_distribution = AgeDistribution::from_birth_dates(&birth_dates, today);
        debug!(
            "Dashboard: {} members ({} active), {} birth dates bucketed",
            members.total,
            members.active,
            age_distribution.total()
        );

        Ok(DashboardSummary {
            total_members: members.total,
            active_members: members.active,
            deceased_members: members.total - members.active,
            total_businesses: businesses.total,
            active_businesses: businesses.active,
            halal_certified_businesses: businesses.halal_certified,
            zakat_accepting_businesses: businesses.accepts_zakat,
            marital_status_distribution: self.store.marital_status_counts().await?.into_iter().collect(),
            conversions_this_year: self.store.conversions_in_year(today.year()).await?,
            age_distribution,
            business_category_distribution: self.store.business_category_counts().await?.into_iter().collect(),
            event_type_distribution: self.store.event_type_counts().await?.into_iter().collect(),
            recent_events,
        })
    }

    pub async fn member_statistics(&self) -> Result<MemberStatistics, DatabaseError> {
        let active = self.store.member_totals().await?.active;
        let employed = self.store.employed_active_members().await?;
        let active_owners = self.store.active_business_owners().await?;

        Ok(MemberStatistics {
            average_salary: self.store.average_salary().await?,
            employment_rate: percentage(employed, active),
            business_ownership_rate: percentage(active_owners, active),
            members_with_businesses: self.store.business_owners().await?,
            conversions_by_year: self.store.conversions_by_year().await?.into_iter().collect(),
            top_business_categories: top_categories(self.store.business_category_counts().await?, TOP_CATEGORY_LIMIT),
        })
    }
}
