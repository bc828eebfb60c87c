pub mod analytics;
pub mod businesses;
pub mod educations;
pub mod life_events;
pub mod masjids;
pub mod members;
pub mod restaurants;
pub mod users;
