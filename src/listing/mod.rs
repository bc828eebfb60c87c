//! Unified restaurant listing.
//!
//! Restaurants exist in two places: dedicated `restaurants` rows and
//! businesses filed under the restaurant category. The listing presents
//! both as one de-duplicated, filtered, paginated sequence.

pub mod merge;
pub mod store;
pub mod view;

pub use merge::{merge, ListingQuery, DEFAULT_LIMIT};
pub use store::{ListingStore, PgListingStore};
pub use view::{DedicatedRestaurant, DerivedRestaurant, RestaurantResponse, RestaurantSource, RestaurantView};

use crate::database::DatabaseError;

/// Load both sources and merge them.
pub async fn list_restaurants(
    store: &dyn ListingStore,
    query: &ListingQuery,
) -> Result<Vec<RestaurantView>, DatabaseError> {
    let dedicated = store.dedicated_restaurants().await?;
    let businesses = store.restaurant_businesses().await?;
    Ok(merge(dedicated, businesses, query))
}
