//! In-memory caching using moka
//!
//! Pricing rules change rarely (an admin edits them a few times a season), so
//! each room's active rules are cached and refreshed by a background warmer.

use moka::future::Cache;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::models::RoomChoice;
use crate::pricing::models::PricingRule;
use crate::pricing::store::RuleStore;

pub const DEFAULT_RULE_TTL: Duration = Duration::from_secs(5 * 60);

/// Application cache
#[derive(Clone)]
pub struct AppCache {
    /// Active pricing rules (room -> rules)
    pub rules: Cache<RoomChoice, Arc<Vec<PricingRule>>>,
}

impl AppCache {
    /// Create a new cache with the given rule TTL
    pub fn new(rule_ttl: Duration) -> Self {
        Self {
            // One entry per room
            rules: Cache::builder()
                .max_capacity(16)
                .time_to_live(rule_ttl)
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            rules_size: self.rules.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.rules.invalidate_all();
        info!("All caches invalidated");
    }

    /// Invalidate a single room's rules
    pub async fn invalidate_room(&self, room_choice: RoomChoice) {
        self.rules.invalidate(&room_choice).await;
        info!("Cache invalidated for room: {}", room_choice);
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(DEFAULT_RULE_TTL)
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub rules_size: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes on every `every` tick.
pub async fn start_cache_warmer(cache: AppCache, store: Arc<dyn RuleStore>, every: Duration) {
    let mut interval = interval(every);
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, store.as_ref()).await;
    }
}

/// Load every room's active rules into the cache
pub async fn warm_cache(cache: &AppCache, store: &dyn RuleStore) {
    info!("Starting cache warm-up...");

    let rules = match store.fetch_all_active_rules().await {
        Ok(rules) => rules,
        Err(e) => {
            warn!("Failed to warm pricing rule cache: {}", e);
            return;
        }
    };

    let mut by_room: HashMap<RoomChoice, Vec<PricingRule>> = RoomChoice::ALL
        .into_iter()
        .map(|room| (room, Vec::new()))
        .collect();
    for rule in rules {
        by_room.entry(rule.room_choice).or_default().push(rule);
    }

    for (room, rules) in by_room {
        cache.rules.insert(room, Arc::new(rules)).await;
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
