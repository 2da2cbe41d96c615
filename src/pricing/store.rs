//! Rule store: where the engine reads active pricing rules from.
//!
//! The store is constructed once at startup and handed to whatever needs it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::AppCache;
use crate::error::AppError;
use crate::models::RoomChoice;

use super::models::{PricingRule, PricingRuleRow};
use super::queries;

#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Active rules for `room_choice`
    async fn fetch_active_rules(&self, room_choice: RoomChoice)
        -> Result<Vec<PricingRule>, AppError>;

    /// Active rules for every room
    async fn fetch_all_active_rules(&self) -> Result<Vec<PricingRule>, AppError>;
}

/// Postgres-backed store
#[derive(Clone)]
pub struct PgRuleStore {
    pool: PgPool,
}

impl PgRuleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleStore for PgRuleStore {
    async fn fetch_active_rules(
        &self,
        room_choice: RoomChoice,
    ) -> Result<Vec<PricingRule>, AppError> {
        let rows = queries::find_active_rules(&self.pool, room_choice).await?;
        Ok(into_rules(rows))
    }

    async fn fetch_all_active_rules(&self) -> Result<Vec<PricingRule>, AppError> {
        let rows = queries::get_all_active_rules(&self.pool).await?;
        Ok(into_rules(rows))
    }
}

/// Rows naming an unknown room are dropped rather than failing the read.
fn into_rules(rows: Vec<PricingRuleRow>) -> Vec<PricingRule> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match PricingRule::try_from(row) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    warn!(rule_id = %id, "Skipping pricing rule: {}", e);
                    None
                }
            }
        })
        .collect()
}

/// Read-through cache in front of another store
#[derive(Clone)]
pub struct CachedRuleStore {
    inner: Arc<dyn RuleStore>,
    cache: AppCache,
}

impl CachedRuleStore {
    pub fn new(inner: Arc<dyn RuleStore>, cache: AppCache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl RuleStore for CachedRuleStore {
    async fn fetch_active_rules(
        &self,
        room_choice: RoomChoice,
    ) -> Result<Vec<PricingRule>, AppError> {
        if let Some(cached) = self.cache.rules.get(&room_choice).await {
            debug!("Cache HIT for pricing rules: {}", room_choice);
            return Ok((*cached).clone());
        }

        debug!("Cache MISS for pricing rules: {}", room_choice);
        let rules = self.inner.fetch_active_rules(room_choice).await?;
        self.cache
            .rules
            .insert(room_choice, Arc::new(rules.clone()))
            .await;
        Ok(rules)
    }

    async fn fetch_all_active_rules(&self) -> Result<Vec<PricingRule>, AppError> {
        self.inner.fetch_all_active_rules().await
    }
}

/// In-process store for tests and local runs without a database
#[derive(Default)]
pub struct InMemoryRuleStore {
    rules: RwLock<Vec<PricingRule>>,
    failing: AtomicBool,
    fetch_calls: AtomicU64,
}

impl InMemoryRuleStore {
    pub fn new(rules: Vec<PricingRule>) -> Self {
        Self {
            rules: RwLock::new(rules),
            ..Self::default()
        }
    }

    pub async fn replace(&self, rules: Vec<PricingRule>) {
        *self.rules.write().await = rules;
    }

    /// Make every read fail, as a lost database connection would
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    pub fn fetch_calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::Relaxed)
    }

    fn check_available(&self) -> Result<(), AppError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        if self.failing.load(Ordering::Relaxed) {
            return Err(AppError::Internal("rule store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RuleStore for InMemoryRuleStore {
    async fn fetch_active_rules(
        &self,
        room_choice: RoomChoice,
    ) -> Result<Vec<PricingRule>, AppError> {
        self.check_available()?;
        Ok(self
            .rules
            .read()
            .await
            .iter()
            .filter(|rule| rule.active && rule.room_choice == room_choice)
            .cloned()
            .collect())
    }

    async fn fetch_all_active_rules(&self) -> Result<Vec<PricingRule>, AppError> {
        self.check_available()?;
        Ok(self
            .rules
            .read()
            .await
            .iter()
            .filter(|rule| rule.active)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn sample_rules() -> Vec<PricingRule> {
        vec![
            PricingRule::new(RoomChoice::FunctionRoom, dec!(300)),
            PricingRule::new(RoomChoice::FunctionRoom, dec!(650)).with_package("Wedding Package 2"),
            PricingRule::new(RoomChoice::Lounge, dec!(150)),
            PricingRule::new(RoomChoice::Lounge, dec!(175)).inactive(),
        ]
    }

    #[tokio::test]
    async fn test_in_memory_store_filters_room_and_active() {
        let store = InMemoryRuleStore::new(sample_rules());

        let lounge = store.fetch_active_rules(RoomChoice::Lounge).await.unwrap();
        assert_eq!(lounge.len(), 1);
        assert_eq!(lounge[0].base_price, dec!(150));

        let all = store.fetch_all_active_rules().await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_in_memory_store_failure() {
        let store = InMemoryRuleStore::new(sample_rules());
        store.set_failing(true);
        assert!(store.fetch_active_rules(RoomChoice::Lounge).await.is_err());
        store.set_failing(false);
        assert!(store.fetch_active_rules(RoomChoice::Lounge).await.is_ok());
        assert_eq!(store.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_cached_store_reads_through_once() {
        let inner = Arc::new(InMemoryRuleStore::new(sample_rules()));
        let cached = CachedRuleStore::new(inner.clone(), AppCache::default());

        let first = cached.fetch_active_rules(RoomChoice::FunctionRoom).await.unwrap();
        let second = cached.fetch_active_rules(RoomChoice::FunctionRoom).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_cached_store_does_not_cache_failures() {
        let inner = Arc::new(InMemoryRuleStore::new(sample_rules()));
        let cached = CachedRuleStore::new(inner.clone(), AppCache::default());

        inner.set_failing(true);
        assert!(cached.fetch_active_rules(RoomChoice::Lounge).await.is_err());

        inner.set_failing(false);
        let rules = cached.fetch_active_rules(RoomChoice::Lounge).await.unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_into_rules_drops_unknown_rooms() {
        let row = |room: &str| PricingRuleRow {
            id: Uuid::new_v4(),
            name: "rule".to_string(),
            room_choice: room.to_string(),
            package: None,
            base_price: dec!(100),
            per_guest_price: None,
            add_on_late_bar: None,
            add_on_resident_dj: None,
            add_on_food_price: None,
            active: Some(true),
        };

        let rules = into_rules(vec![row("Lounge (max 50 guests)"), row("Garden")]);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].room_choice, RoomChoice::Lounge);
    }
}
