//! Dashboard aggregation over members, businesses and life events.

pub mod clock;
pub mod engine;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{AgeBucket, AgeDistribution, AnalyticsEngine, DashboardSummary, MemberStatistics};
pub use store::{AnalyticsStore, PgAnalyticsStore};
