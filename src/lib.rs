//! Venue booking service: pricing engine, booking wizard validation and the
//! HTTP surface the booking wizard and admin back office call.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pricing;
pub mod routes;

use std::sync::Arc;

use cache::AppCache;
use pricing::store::{CachedRuleStore, RuleStore};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Where quotes read their pricing rules from
    pub rules: Arc<dyn RuleStore>,
    pub cache: AppCache,
}

impl AppState {
    pub fn new(rules: Arc<dyn RuleStore>, cache: AppCache) -> Self {
        Self { rules, cache }
    }

    /// Wrap `store` in a read-through cache backed by `cache`
    pub fn cached(store: Arc<dyn RuleStore>, cache: AppCache) -> Self {
        let rules = Arc::new(CachedRuleStore::new(store, cache.clone()));
        Self::new(rules, cache)
    }
}
