use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use sqlx::{FromRow, PgPool};

use crate::database::models::{Business, LifeEvent, Member};
use crate::database::{DatabaseError, Repository};
use crate::filter::FilterData;

#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow)]
pub struct MemberTotals {
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow)]
pub struct BusinessTotals {
    pub total: i64,
    pub active: i64,
    pub halal_certified: i64,
    pub accepts_zakat: i64,
}

/// Read-only queries the aggregation engine needs.
///
/// Histograms come back as `(label, count)` pairs containing only labels
/// that occur; NULL labels are never reported.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Both counts come from one statement so they describe the same snapshot.
    async fn member_totals(&self) -> Result<MemberTotals, DatabaseError>;
    async fn marital_status_counts(&self) -> Result<Vec<(String, i64)>, DatabaseError>;
    async fn conversions_in_year(&self, year: i32) -> Result<i64, DatabaseError>;
    async fn conversions_by_year(&self) -> Result<Vec<(i32, i64)>, DatabaseError>;
    /// Newest first by `event_date`, then by `id`.
    async fn recent_life_events(&self, limit: i64) -> Result<Vec<LifeEvent>, DatabaseError>;
    async fn event_type_counts(&self) -> Result<Vec<(String, i64)>, DatabaseError>;
    async fn active_birth_dates(&self) -> Result<Vec<NaiveDate>, DatabaseError>;
    async fn business_totals(&self) -> Result<BusinessTotals, DatabaseError>;
    async fn business_category_counts(&self) -> Result<Vec<(String, i64)>, DatabaseError>;
    async fn average_salary(&self) -> Result<Option<f64>, DatabaseError>;
    /// Active members with a workplace on record.
    async fn employed_active_members(&self) -> Result<i64, DatabaseError>;
    /// Distinct members owning at least one business, living or not.
    async fn business_owners(&self) -> Result<i64, DatabaseError>;
    /// Distinct active members owning at least one business.
    async fn active_business_owners(&self) -> Result<i64, DatabaseError>;
}

pub struct PgAnalyticsStore {
    pool: PgPool,
    members: Repository<Member>,
    life_events: Repository<LifeEvent>,
    businesses: Repository<Business>,
}

impl PgAnalyticsStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            members: Repository::new("members", pool.clone()),
            life_events: Repository::new("life_events", pool.clone()),
            businesses: Repository::new("businesses", pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl AnalyticsStore for PgAnalyticsStore {
    async fn member_totals(&self) -> Result<MemberTotals, DatabaseError> {
        let totals = sqlx::query_as::<_, MemberTotals>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE date_of_death IS NULL) AS active
             FROM members",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    async fn marital_status_counts(&self) -> Result<Vec<(String, i64)>, DatabaseError> {
        self.members.count_by("marital_status", FilterData::default()).await
    }

    async fn conversions_in_year(&self, year: i32) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM members WHERE EXTRACT(YEAR FROM date_of_conversion)::int = $1",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn conversions_by_year(&self) -> Result<Vec<(i32, i64)>, DatabaseError> {
        let rows: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT EXTRACT(YEAR FROM date_of_conversion)::int AS year, COUNT(*) AS count
             FROM members
             WHERE date_of_conversion IS NOT NULL
             GROUP BY 1
             ORDER BY 1",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn recent_life_events(&self, limit: i64) -> Result<Vec<LifeEvent>, DatabaseError> {
        let filter = FilterData::default().order_by("event_date desc, id desc").page(0, limit);
        self.life_events.select_any(filter).await
    }

    async fn event_type_counts(&self) -> Result<Vec<(String, i64)>, DatabaseError> {
        self.life_events.count_by("event_type", FilterData::default()).await
    }

    async fn active_birth_dates(&self) -> Result<Vec<NaiveDate>, DatabaseError> {
        let dates = sqlx::query_scalar("SELECT date_of_birth FROM members WHERE date_of_death IS NULL")
            .fetch_all(&self.pool)
            .await?;
        Ok(dates)
    }

    async fn business_totals(&self) -> Result<BusinessTotals, DatabaseError> {
        let totals = sqlx::query_as::<_, BusinessTotals>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE is_active) AS active,
                    COUNT(*) FILTER (WHERE halal_certified) AS halal_certified,
                    COUNT(*) FILTER (WHERE accepts_zakat) AS accepts_zakat
             FROM businesses",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    async fn business_category_counts(&self) -> Result<Vec<(String, i64)>, DatabaseError> {
        self.businesses.count_by("category", FilterData::default()).await
    }

    async fn average_salary(&self) -> Result<Option<f64>, DatabaseError> {
        let avg: Option<f64> = sqlx::query_scalar("SELECT AVG(salary) FROM members WHERE salary IS NOT NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(avg)
    }

    async fn employed_active_members(&self) -> Result<i64, DatabaseError> {
        self.members
            .count(FilterData::with_where(json!({
                "workplace": { "$ne": null },
                "date_of_death": null
            })))
            .await
    }

    async fn business_owners(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT owner_id) FROM businesses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn active_business_owners(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT b.owner_id)
             FROM businesses b
             JOIN members m ON m.id = b.owner_id
             WHERE m.date_of_death IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
