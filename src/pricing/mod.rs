//! Pricing engine module for venue bookings.
//!
//! Turns a guest's selections (room, package, guests, add-ons) into an
//! itemized quote using the active pricing rules for the room.

pub mod calculators;
pub mod format;
pub mod invoice;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod store;

// Re-export commonly used items
pub use calculators::{calculate_breakdown, round_money, LineItem, PricingBreakdown};
pub use format::format_gbp;
pub use routes::router;
pub use services::{compute_breakdown, try_compute_breakdown, PricingError};
pub use store::{CachedRuleStore, InMemoryRuleStore, PgRuleStore, RuleStore};
