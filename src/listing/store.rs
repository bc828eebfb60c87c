use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::database::models::{BusinessCategory, BusinessWithOwner, Restaurant, RestaurantMenu};
use crate::database::DatabaseError;

use super::view::DedicatedRestaurant;

/// Source rows for the unified listing.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Every `restaurants` row with menus attached, ordered by id.
    async fn dedicated_restaurants(&self) -> Result<Vec<DedicatedRestaurant>, DatabaseError>;
    /// Active businesses in the restaurant category, ordered by id.
    async fn restaurant_businesses(&self) -> Result<Vec<BusinessWithOwner>, DatabaseError>;
}

#[derive(FromRow)]
struct DedicatedRow {
    #[sqlx(flatten)]
    restaurant: Restaurant,
    business_name: Option<String>,
    owner_name: Option<String>,
}

const DEDICATED_SELECT: &str = "SELECT r.*, b.name AS business_name, m.legal_name AS owner_name
     FROM restaurants r
     LEFT JOIN businesses b ON b.id = r.business_id
     LEFT JOIN members m ON m.id = b.owner_id";

pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One dedicated restaurant with its menus and business names.
    pub async fn find_dedicated(&self, id: i64) -> Result<Option<DedicatedRestaurant>, DatabaseError> {
        let row: Option<DedicatedRow> = sqlx::query_as(&format!("{} WHERE r.id = $1", DEDICATED_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_menus(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn attach_menus(&self, rows: Vec<DedicatedRow>) -> Result<Vec<DedicatedRestaurant>, DatabaseError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.restaurant.id).collect();
        let menus: Vec<RestaurantMenu> =
            sqlx::query_as("SELECT * FROM restaurant_menus WHERE restaurant_id = ANY($1) ORDER BY id")
                .bind(&ids)
                .fetch_all(&self.pool)
                .await?;

        let mut by_restaurant: HashMap<i64, Vec<RestaurantMenu>> = HashMap::new();
        for menu in menus {
            by_restaurant.entry(menu.restaurant_id).or_default().push(menu);
        }

        Ok(rows
            .into_iter()
            .map(|row| DedicatedRestaurant {
                menu_files: by_restaurant.remove(&row.restaurant.id).unwrap_or_default(),
                restaurant: row.restaurant,
                business_name: row.business_name,
                owner_name: row.owner_name,
            })
            .collect())
    }
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn dedicated_restaurants(&self) -> Result<Vec<DedicatedRestaurant>, DatabaseError> {
        let rows: Vec<DedicatedRow> = sqlx::query_as(&format!("{} ORDER BY r.id", DEDICATED_SELECT))
            .fetch_all(&self.pool)
            .await?;
        self.attach_menus(rows).await
    }

    async fn restaurant_businesses(&self) -> Result<Vec<BusinessWithOwner>, DatabaseError> {
        let rows = sqlx::query_as::<_, BusinessWithOwner>(
            "SELECT b.*, m.legal_name AS owner_name, m.phone_number AS owner_phone
             FROM businesses b
             LEFT JOIN members m ON m.id = b.owner_id
             WHERE b.category = $1 AND b.is_active
             ORDER BY b.id",
        )
        .bind(BusinessCategory::Restaurant)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
