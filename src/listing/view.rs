use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::{BusinessWithOwner, Restaurant, RestaurantMenu};

/// A `restaurants` row with its menus and linked business names.
#[derive(Debug, Clone)]
pub struct DedicatedRestaurant {
    pub restaurant: Restaurant,
    pub menu_files: Vec<RestaurantMenu>,
    pub business_name: Option<String>,
    pub owner_name: Option<String>,
}

/// An active restaurant-category business with no `restaurants` row of its own.
#[derive(Debug, Clone)]
pub struct DerivedRestaurant {
    pub business: BusinessWithOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestaurantSource {
    Dedicated,
    Derived,
}

/// One entry of the unified restaurant listing.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "RestaurantResponse")]
pub enum RestaurantView {
    Dedicated(DedicatedRestaurant),
    Derived(DerivedRestaurant),
}

/// Derived entries have no restaurant id of their own.
pub const PLACEHOLDER_ID: i64 = 0;

impl RestaurantView {
    pub fn source(&self) -> RestaurantSource {
        match self {
            RestaurantView::Dedicated(_) => RestaurantSource::Dedicated,
            RestaurantView::Derived(_) => RestaurantSource::Derived,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            RestaurantView::Dedicated(d) => d.restaurant.id,
            RestaurantView::Derived(_) => PLACEHOLDER_ID,
        }
    }

    pub fn business_id(&self) -> Option<i64> {
        match self {
            RestaurantView::Dedicated(d) => d.restaurant.business_id,
            RestaurantView::Derived(d) => Some(d.business.business.id),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RestaurantView::Dedicated(d) => &d.restaurant.name,
            RestaurantView::Derived(d) => &d.business.business.name,
        }
    }

    pub fn address(&self) -> &str {
        match self {
            RestaurantView::Dedicated(d) => &d.restaurant.address,
            RestaurantView::Derived(d) => &d.business.business.address,
        }
    }

    pub fn parish(&self) -> Option<&str> {
        match self {
            RestaurantView::Dedicated(d) => Some(&d.restaurant.parish),
            RestaurantView::Derived(d) => d.business.business.parish.as_deref(),
        }
    }

    pub fn cuisine_types(&self) -> Option<&str> {
        match self {
            RestaurantView::Dedicated(d) => d.restaurant.cuisine_types.as_deref(),
            RestaurantView::Derived(_) => None,
        }
    }

    pub fn is_halal_certified(&self) -> bool {
        match self {
            RestaurantView::Dedicated(d) => d.restaurant.is_halal_certified,
            RestaurantView::Derived(d) => d.business.business.halal_certified,
        }
    }

    pub fn has_halal_options(&self) -> bool {
        match self {
            RestaurantView::Dedicated(d) => d.restaurant.has_halal_options,
            RestaurantView::Derived(d) => d.business.business.halal_certified,
        }
    }
}

/// Wire shape shared by both sources.
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantResponse {
    pub id: i64,
    pub source: RestaurantSource,
    pub name: String,
    pub address: String,
    pub parish: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub is_halal_certified: bool,
    pub has_halal_options: bool,
    pub has_vegetarian_options: bool,
    pub has_vegan_options: bool,
    pub cuisine_types: Option<String>,
    pub opening_hours: Option<String>,
    pub description: Option<String>,
    pub business_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub menu_files: Vec<RestaurantMenu>,
    pub business_name: Option<String>,
    pub owner_name: Option<String>,
}

impl From<RestaurantView> for RestaurantResponse {
    fn from(view: RestaurantView) -> Self {
        match view {
            RestaurantView::Dedicated(d) => {
                let r = d.restaurant;
                RestaurantResponse {
                    id: r.id,
                    source: RestaurantSource::Dedicated,
                    name: r.name,
                    address: r.address,
                    parish: r.parish,
                    phone: r.phone,
                    email: r.email,
                    website: r.website,
                    is_halal_certified: r.is_halal_certified,
                    has_halal_options: r.has_halal_options,
                    has_vegetarian_options: r.has_vegetarian_options,
                    has_vegan_options: r.has_vegan_options,
                    cuisine_types: r.cuisine_types,
                    opening_hours: r.opening_hours,
                    description: r.description,
                    business_id: r.business_id,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                    menu_files: d.menu_files,
                    business_name: d.business_name,
                    owner_name: d.owner_name,
                }
            }
            RestaurantView::Derived(d) => {
                let owner_name = d.business.owner_name;
                let b = d.business.business;
                RestaurantResponse {
                    id: PLACEHOLDER_ID,
                    source: RestaurantSource::Derived,
                    business_name: Some(b.name.clone()),
                    name: b.name,
                    address: b.address,
                    parish: b.parish.unwrap_or_default(),
                    phone: b.phone_number,
                    email: b.email,
                    website: b.website,
                    is_halal_certified: b.halal_certified,
                    has_halal_options: b.halal_certified,
                    has_vegetarian_options: false,
                    has_vegan_options: false,
                    cuisine_types: None,
                    opening_hours: b.operating_hours,
                    description: b.description,
                    business_id: Some(b.id),
                    created_at: b.created_at,
                    updated_at: b.updated_at,
                    menu_files: Vec::new(),
                    owner_name,
                }
            }
        }
    }
}
