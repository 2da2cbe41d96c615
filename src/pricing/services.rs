//! Pricing service functions with rule store access.
//!
//! `try_compute_breakdown` reports why a configuration could not be priced;
//! `compute_breakdown` is the fail-soft variant used for live quotes, where
//! any failure degrades to the zero breakdown so the booking flow never blocks.

use tracing::{debug, warn};

use crate::models::{BookingConfiguration, RoomChoice};

use super::calculators::{price_with_rule, resolve_rule, PricingBreakdown};
use super::store::RuleStore;

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("No room selected")]
    MissingRoomChoice,

    #[error("Pricing rules unavailable for {room_choice}: {message}")]
    RuleStoreUnavailable {
        room_choice: RoomChoice,
        message: String,
    },

    #[error("No active pricing rule for {room_choice} (package: {package:?})")]
    NoMatchingRule {
        room_choice: RoomChoice,
        package: Option<String>,
    },
}

/// Price a configuration, reporting why it could not be priced.
pub async fn try_compute_breakdown(
    store: &dyn RuleStore,
    config: &BookingConfiguration,
) -> Result<PricingBreakdown, PricingError> {
    let room_choice = config.room_choice.ok_or(PricingError::MissingRoomChoice)?;
    let package = config.selected_package();

    let rules = store
        .fetch_active_rules(room_choice)
        .await
        .map_err(|e| PricingError::RuleStoreUnavailable {
            room_choice,
            message: e.to_string(),
        })?;

    let matched =
        resolve_rule(&rules, room_choice, package).ok_or_else(|| PricingError::NoMatchingRule {
            room_choice,
            package: package.map(str::to_string),
        })?;

    Ok(price_with_rule(config, room_choice, matched))
}

/// Price a configuration, falling back to the zero breakdown.
pub async fn compute_breakdown(
    store: &dyn RuleStore,
    config: &BookingConfiguration,
) -> PricingBreakdown {
    match try_compute_breakdown(store, config).await {
        Ok(breakdown) => breakdown,
        Err(PricingError::MissingRoomChoice) => {
            debug!("No room selected yet, returning zero breakdown");
            PricingBreakdown::zero()
        }
        Err(e) => {
            warn!("Pricing unavailable, returning zero breakdown: {}", e);
            PricingBreakdown::zero()
        }
    }
}
