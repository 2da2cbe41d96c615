//! Database models for pricing queries.
//!
//! `PricingRuleRow` mirrors the `pricing_rules` table and is decoded with sqlx's
//! FromRow derive. The engine works on the typed `PricingRule`.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{RoomChoice, UnknownRoomChoice};

/// Row from pricing_rules
#[derive(Debug, Clone, FromRow)]
pub struct PricingRuleRow {
    pub id: Uuid,
    pub name: String,
    pub room_choice: String,
    pub package: Option<String>,
    pub base_price: Decimal,
    pub per_guest_price: Option<Decimal>,
    pub add_on_late_bar: Option<Decimal>,
    pub add_on_resident_dj: Option<Decimal>,
    pub add_on_food_price: Option<Decimal>,
    pub active: Option<bool>,
}

/// Pricing rule for a room, optionally scoped to a named package.
///
/// A rule without a package is the room's default rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingRule {
    pub id: Uuid,
    pub name: String,
    pub room_choice: RoomChoice,
    pub package: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub per_guest_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub add_on_late_bar: Option<Decimal>,
    /// Carried for display only; DJ fees are paid in cash and never priced.
    #[serde(with = "rust_decimal::serde::str_option")]
    pub add_on_resident_dj: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub add_on_food_price: Option<Decimal>,
    pub active: bool,
}

impl PricingRule {
    /// New active default rule for `room_choice`
    pub fn new(room_choice: RoomChoice, base_price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("{} - Base Hire", room_choice),
            room_choice,
            package: None,
            base_price,
            per_guest_price: None,
            add_on_late_bar: None,
            add_on_resident_dj: None,
            add_on_food_price: None,
            active: true,
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        let package = package.into();
        self.name = package.clone();
        self.package = Some(package);
        self
    }

    pub fn with_per_guest_price(mut self, amount: Decimal) -> Self {
        self.per_guest_price = Some(amount);
        self
    }

    pub fn with_late_bar(mut self, amount: Decimal) -> Self {
        self.add_on_late_bar = Some(amount);
        self
    }

    pub fn with_resident_dj(mut self, amount: Decimal) -> Self {
        self.add_on_resident_dj = Some(amount);
        self
    }

    pub fn with_food(mut self, amount: Decimal) -> Self {
        self.add_on_food_price = Some(amount);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn is_default(&self) -> bool {
        self.package.is_none()
    }

    /// Exact, case-sensitive package match
    pub fn matches_package(&self, package: &str) -> bool {
        self.package.as_deref() == Some(package)
    }
}

impl TryFrom<PricingRuleRow> for PricingRule {
    type Error = UnknownRoomChoice;

    fn try_from(row: PricingRuleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            room_choice: row.room_choice.parse()?,
            package: row.package,
            base_price: row.base_price,
            per_guest_price: row.per_guest_price,
            add_on_late_bar: row.add_on_late_bar,
            add_on_resident_dj: row.add_on_resident_dj,
            add_on_food_price: row.add_on_food_price,
            active: row.active.unwrap_or(false),
        })
    }
}
