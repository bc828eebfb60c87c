use std::collections::HashSet;

use crate::database::models::{BusinessCategory, BusinessWithOwner, ValidationError};

use super::view::{DedicatedRestaurant, DerivedRestaurant, RestaurantView};

pub const DEFAULT_LIMIT: i64 = 100;

/// Filters and window applied to the merged listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Lowercased, trimmed search term. `None` matches everything.
    search: Option<String>,
    halal_only: bool,
    skip: i64,
    limit: i64,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self { search: None, halal_only: false, skip: 0, limit: DEFAULT_LIMIT }
    }
}

impl ListingQuery {
    pub fn new(search: Option<&str>, halal_only: bool, skip: i64, limit: i64) -> Result<Self, ValidationError> {
        if skip < 0 {
            return Err(ValidationError::field("skip", "Must be zero or greater"));
        }
        if limit <= 0 {
            return Err(ValidationError::field("limit", "Must be greater than zero"));
        }
        let search = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
        Ok(Self { search, halal_only, skip, limit })
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Case-insensitive substring match over name, address, parish and
    /// cuisine types, then the halal filter.
    pub fn matches(&self, view: &RestaurantView) -> bool {
        if self.halal_only && !(view.is_halal_certified() || view.has_halal_options()) {
            return false;
        }
        let Some(term) = &self.search else {
            return true;
        };
        [Some(view.name()), Some(view.address()), view.parish(), view.cuisine_types()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(term.as_str()))
    }
}

/// Merge dedicated restaurants with restaurant-category businesses.
///
/// A business referenced by any dedicated row is never listed on its own,
/// whether or not that row survives the filters. Dedicated entries come
/// first ordered by id, then derived entries ordered by business id. The
/// window is taken after de-duplication and filtering.
pub fn merge(
    mut dedicated: Vec<DedicatedRestaurant>,
    mut businesses: Vec<BusinessWithOwner>,
    query: &ListingQuery,
) -> Vec<RestaurantView> {
    dedicated.sort_by_key(|d| d.restaurant.id);
    businesses.sort_by_key(|b| b.business.id);

    let linked: HashSet<i64> = dedicated.iter().filter_map(|d| d.restaurant.business_id).collect();

    let derived = businesses
        .into_iter()
        .filter(|b| b.business.category == BusinessCategory::Restaurant && b.business.is_active)
        .filter(|b| !linked.contains(&b.business.id))
        .map(|business| RestaurantView::Derived(DerivedRestaurant { business }));

    dedicated
        .into_iter()
        .map(RestaurantView::Dedicated)
        .chain(derived)
        .filter(|view| query.matches(view))
        .skip(query.skip as usize)
        .take(query.limit as usize)
        .collect()
}
