//! In-memory stores and row builders for unit tests.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, TimeZone, Utc};

use crate::analytics::store::{AnalyticsStore, BusinessTotals, MemberTotals};
use crate::database::models::{
    Business, BusinessCategory, BusinessWithOwner, EventType, Gender, LifeEvent, Member, Restaurant, RestaurantMenu,
};
use crate::database::DatabaseError;
use crate::listing::{DedicatedRestaurant, ListingStore};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn created_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Living member with only the required fields set.
pub fn member(id: i64, date_of_birth: NaiveDate) -> Member {
    Member {
        id,
        muslim_name: format!("Abdullah {}", id),
        legal_name: format!("Member {}", id),
        gender: Gender::Male,
        date_of_birth,
        date_of_conversion: None,
        marital_status: None,
        present_address: None,
        permanent_address: None,
        phone_number: None,
        email: None,
        workplace: None,
        occupation: None,
        salary: None,
        salary_period: None,
        spouse_id: None,
        father_name: None,
        mother_name: None,
        burial_location: None,
        date_of_death: None,
        notes: None,
        masjid_id: None,
        created_at: created_at(),
        updated_at: None,
        created_by: None,
    }
}

pub fn life_event(id: i64, member_id: i64, event_type: EventType, event_date: NaiveDate) -> LifeEvent {
    LifeEvent {
        id,
        member_id,
        event_type,
        event_date,
        event_location: None,
        description: None,
        related_member_id: None,
        created_at: created_at(),
        created_by: None,
    }
}

/// Active business without certifications.
pub fn business(id: i64, owner_id: i64, name: &str, category: BusinessCategory) -> Business {
    Business {
        id,
        name: name.to_string(),
        owner_id,
        category,
        description: None,
        phone_number: None,
        email: None,
        website: None,
        address: format!("{} Main Street", id),
        city: None,
        parish: Some("Kingston".to_string()),
        postal_code: None,
        operating_hours: None,
        year_established: None,
        number_of_employees: None,
        halal_certified: false,
        accepts_zakat: false,
        social_media: None,
        is_active: true,
        notes: None,
        created_at: created_at(),
        updated_at: None,
        created_by: None,
    }
}

pub fn with_owner(business: Business, owner_name: &str) -> BusinessWithOwner {
    BusinessWithOwner { business, owner_name: Some(owner_name.to_string()), owner_phone: None }
}

pub fn restaurant(id: i64, name: &str) -> Restaurant {
    Restaurant {
        id,
        name: name.to_string(),
        address: format!("{} Market Street", id),
        parish: "St. Andrew".to_string(),
        phone: None,
        email: None,
        website: None,
        is_halal_certified: false,
        has_halal_options: false,
        has_vegetarian_options: false,
        has_vegan_options: false,
        cuisine_types: None,
        opening_hours: None,
        description: None,
        business_id: None,
        created_at: created_at(),
        updated_at: None,
    }
}

pub fn dedicated(restaurant: Restaurant) -> DedicatedRestaurant {
    DedicatedRestaurant { restaurant, menu_files: Vec::new(), business_name: None, owner_name: None }
}

/// Vectors of rows answering store queries the way Postgres would.
#[derive(Default)]
pub struct MemoryStore {
    pub members: Vec<Member>,
    pub life_events: Vec<LifeEvent>,
    pub businesses: Vec<Business>,
    pub restaurants: Vec<Restaurant>,
    pub menus: Vec<RestaurantMenu>,
}

impl MemoryStore {
    fn active_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.date_of_death.is_none())
    }

    fn owner_name(&self, owner_id: i64) -> Option<String> {
        self.members.iter().find(|m| m.id == owner_id).map(|m| m.legal_name.clone())
    }
}

fn histogram<'a>(labels: impl Iterator<Item = Option<&'a str>>) -> Vec<(String, i64)> {
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for label in labels.flatten() {
        *counts.entry(label.to_string()).or_default() += 1;
    }
    counts.into_iter().collect()
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn member_totals(&self) -> Result<MemberTotals, DatabaseError> {
        Ok(MemberTotals { total: self.members.len() as i64, active: self.active_members().count() as i64 })
    }

    async fn marital_status_counts(&self) -> Result<Vec<(String, i64)>, DatabaseError> {
        Ok(histogram(self.members.iter().map(|m| m.marital_status.map(|s| s.as_str()))))
    }

    async fn conversions_in_year(&self, year: i32) -> Result<i64, DatabaseError> {
        Ok(self
            .members
            .iter()
            .filter(|m| m.date_of_conversion.map(|d| d.year()) == Some(year))
            .count() as i64)
    }

    async fn conversions_by_year(&self) -> Result<Vec<(i32, i64)>, DatabaseError> {
        let mut years: BTreeMap<i32, i64> = BTreeMap::new();
        for d in self.members.iter().filter_map(|m| m.date_of_conversion) {
            *years.entry(d.year()).or_default() += 1;
        }
        Ok(years.into_iter().collect())
    }

    async fn recent_life_events(&self, limit: i64) -> Result<Vec<LifeEvent>, DatabaseError> {
        let mut events = self.life_events.clone();
        events.sort_by(|a, b| b.event_date.cmp(&a.event_date).then_with(|| b.id.cmp(&a.id)));
        events.truncate(limit as usize);
        Ok(events)
    }

    async fn event_type_counts(&self) -> Result<Vec<(String, i64)>, DatabaseError> {
        Ok(histogram(self.life_events.iter().map(|e| Some(e.event_type.as_str()))))
    }

    async fn active_birth_dates(&self) -> Result<Vec<NaiveDate>, DatabaseError> {
        Ok(self.active_members().map(|m| m.date_of_birth).collect())
    }

    async fn business_totals(&self) -> Result<BusinessTotals, DatabaseError> {
        let count = |pred: fn(&Business) -> bool| self.businesses.iter().filter(|b| pred(b)).count() as i64;
        Ok(BusinessTotals {
            total: self.businesses.len() as i64,
            active: count(|b| b.is_active),
            halal_certified: count(|b| b.halal_certified),
            accepts_zakat: count(|b| b.accepts_zakat),
        })
    }

    async fn business_category_counts(&self) -> Result<Vec<(String, i64)>, DatabaseError> {
        Ok(histogram(self.businesses.iter().map(|b| Some(b.category.as_str()))))
    }

    async fn average_salary(&self) -> Result<Option<f64>, DatabaseError> {
        let salaries: Vec<f64> = self.members.iter().filter_map(|m| m.salary).collect();
        if salaries.is_empty() {
            return Ok(None);
        }
        Ok(Some(salaries.iter().sum::<f64>() / salaries.len() as f64))
    }

    async fn employed_active_members(&self) -> Result<i64, DatabaseError> {
        Ok(self.active_members().filter(|m| m.workplace.is_some()).count() as i64)
    }

    async fn business_owners(&self) -> Result<i64, DatabaseError> {
        let owners: HashSet<i64> = self.businesses.iter().map(|b| b.owner_id).collect();
        Ok(owners.len() as i64)
    }

    async fn active_business_owners(&self) -> Result<i64, DatabaseError> {
        let active: HashSet<i64> = self.active_members().map(|m| m.id).collect();
        let owners: HashSet<i64> = self.businesses.iter().map(|b| b.owner_id).filter(|id| active.contains(id)).collect();
        Ok(owners.len() as i64)
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn dedicated_restaurants(&self) -> Result<Vec<DedicatedRestaurant>, DatabaseError> {
        let mut rows: Vec<DedicatedRestaurant> = self
            .restaurants
            .iter()
            .map(|r| {
                let linked = r.business_id.and_then(|id| self.businesses.iter().find(|b| b.id == id));
                DedicatedRestaurant {
                    restaurant: r.clone(),
                    menu_files: self.menus.iter().filter(|m| m.restaurant_id == r.id).cloned().collect(),
                    business_name: linked.map(|b| b.name.clone()),
                    owner_name: linked.and_then(|b| self.owner_name(b.owner_id)),
                }
            })
            .collect();
        rows.sort_by_key(|d| d.restaurant.id);
        Ok(rows)
    }

    async fn restaurant_businesses(&self) -> Result<Vec<BusinessWithOwner>, DatabaseError> {
        let mut rows: Vec<BusinessWithOwner> = self
            .businesses
            .iter()
            .filter(|b| b.category == BusinessCategory::Restaurant && b.is_active)
            .map(|b| BusinessWithOwner { business: b.clone(), owner_name: self.owner_name(b.owner_id), owner_phone: None })
            .collect();
        rows.sort_by_key(|b| b.business.id);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::MenuFileType;
    use crate::listing::{list_restaurants, ListingQuery, RestaurantSource};

    #[tokio::test]
    async fn listing_over_store_attaches_menus_and_owner() {
        let mut store = MemoryStore::default();
        store.members.push(member(1, date(1980, 1, 1)));
        store.businesses.push(business(5, 1, "Cedar House Ltd", BusinessCategory::Restaurant));
        store.businesses.push(business(6, 1, "Spice Route", BusinessCategory::Restaurant));
        let mut cedar = restaurant(2, "Cedar House");
        cedar.business_id = Some(5);
        store.restaurants.push(cedar);
        store.menus.push(RestaurantMenu {
            id: 1,
            restaurant_id: 2,
            file_name: "dinner.pdf".to_string(),
            file_path: "uploads/restaurants/2/dinner.pdf".to_string(),
            file_type: MenuFileType::Pdf,
            uploaded_at: created_at(),
        });

        let views = list_restaurants(&store, &ListingQuery::default()).await.unwrap();
        assert_eq!(views.len(), 2);

        let json = serde_json::to_value(&views[0]).unwrap();
        assert_eq!(json["business_name"], "Cedar House Ltd");
        assert_eq!(json["owner_name"], "Member 1");
        assert_eq!(json["menu_files"][0]["file_name"], "dinner.pdf");
        assert_eq!(views[1].source(), RestaurantSource::Derived);
        assert_eq!(views[1].business_id(), Some(6));
    }
}
