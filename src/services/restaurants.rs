use sqlx::PgPool;
use tracing::info;

use crate::database::models::{
    Business, Restaurant, RestaurantCreate, RestaurantMenu, RestaurantMenuCreate, RestaurantUpdate,
};
use crate::database::{DatabaseError, Repository};
use crate::listing::{self, ListingQuery, PgListingStore, RestaurantView};

use super::{require_found, Deleted, ServiceError, ServiceResult};

pub struct RestaurantService {
    pool: PgPool,
    restaurants: Repository<Restaurant>,
    businesses: Repository<Business>,
    listing: PgListingStore,
}

impl RestaurantService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            restaurants: Repository::new("restaurants", pool.clone()),
            businesses: Repository::new("businesses", pool.clone()),
            listing: PgListingStore::new(pool.clone()),
            pool,
        }
    }

    /// Dedicated restaurants merged with restaurant-category businesses.
    pub async fn list(&self, query: &ListingQuery) -> ServiceResult<Vec<RestaurantView>> {
        Ok(listing::list_restaurants(&self.listing, query).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<RestaurantView> {
        match self.listing.find_dedicated(id).await? {
            Some(dedicated) => Ok(RestaurantView::Dedicated(dedicated)),
            None => Err(ServiceError::NotFound("Restaurant not found".to_string())),
        }
    }

    pub async fn create(&self, input: RestaurantCreate) -> ServiceResult<RestaurantView> {
        input.validate()?;
        if let Some(business_id) = input.business_id {
            require_found(self.businesses.exists(business_id).await?, "Business")?;
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO restaurants (
                name, address, parish, phone, email, website, is_halal_certified, has_halal_options,
                has_vegetarian_options, has_vegan_options, cuisine_types, opening_hours, description,
                business_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.parish)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.website)
        .bind(input.is_halal_certified)
        .bind(input.has_halal_options)
        .bind(input.has_vegetarian_options)
        .bind(input.has_vegan_options)
        .bind(&input.cuisine_types)
        .bind(&input.opening_hours)
        .bind(&input.description)
        .bind(input.business_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        info!("Created restaurant {} ({})", id, input.name);
        self.get(id).await
    }

    pub async fn update(&self, id: i64, patch: RestaurantUpdate) -> ServiceResult<RestaurantView> {
        let mut restaurant = self.restaurants.select_id(id, "Restaurant").await?;
        let business_changed = patch.business_id.is_some();
        patch.apply(&mut restaurant)?;
        if let Some(business_id) = restaurant.business_id.filter(|_| business_changed) {
            require_found(self.businesses.exists(business_id).await?, "Business")?;
        }

        sqlx::query(
            "UPDATE restaurants SET
                name = $2, address = $3, parish = $4, phone = $5, email = $6, website = $7,
                is_halal_certified = $8, has_halal_options = $9, has_vegetarian_options = $10,
                has_vegan_options = $11, cuisine_types = $12, opening_hours = $13,
                description = $14, business_id = $15, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(restaurant.id)
        .bind(&restaurant.name)
        .bind(&restaurant.address)
        .bind(&restaurant.parish)
        .bind(&restaurant.phone)
        .bind(&restaurant.email)
        .bind(&restaurant.website)
        .bind(restaurant.is_halal_certified)
        .bind(restaurant.has_halal_options)
        .bind(restaurant.has_vegetarian_options)
        .bind(restaurant.has_vegan_options)
        .bind(&restaurant.cuisine_types)
        .bind(&restaurant.opening_hours)
        .bind(&restaurant.description)
        .bind(restaurant.business_id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        self.get(id).await
    }

    /// Menus go with the restaurant through the cascading foreign key.
    pub async fn delete(&self, id: i64) -> ServiceResult<Deleted> {
        self.restaurants.delete_id(id, "Restaurant").await?;
        info!("Deleted restaurant {}", id);
        Ok(Deleted::new("Restaurant"))
    }

    /// Record menu metadata. The file itself is stored elsewhere.
    pub async fn add_menu(&self, restaurant_id: i64, input: RestaurantMenuCreate) -> ServiceResult<RestaurantMenu> {
        input.validate()?;
        require_found(self.restaurants.exists(restaurant_id).await?, "Restaurant")?;

        let menu = sqlx::query_as::<_, RestaurantMenu>(
            "INSERT INTO restaurant_menus (restaurant_id, file_name, file_path, file_type)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(restaurant_id)
        .bind(&input.file_name)
        .bind(input.file_path(restaurant_id))
        .bind(input.file_type)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(menu)
    }

    pub async fn delete_menu(&self, restaurant_id: i64, menu_id: i64) -> ServiceResult<Deleted> {
        let result = sqlx::query("DELETE FROM restaurant_menus WHERE id = $1 AND restaurant_id = $2")
            .bind(menu_id)
            .bind(restaurant_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        require_found(result.rows_affected() > 0, "Menu")?;
        Ok(Deleted::new("Menu"))
    }
}
