//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access. Rule lookup happens in
//! `services`; everything here works on an already-fetched slice of rules.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::models::{BookingConfiguration, RoomChoice};

use super::models::PricingRule;

/// Packages whose name contains this marker include the late bar at no charge.
pub const WEDDING_PACKAGE_MARKER: &str = "Wedding Package";

pub const LATE_BAR_DESCRIPTION: &str = "Late Bar";
pub const FOOD_DESCRIPTION: &str = "Food & Catering";

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Only used where an amount leaves the engine for persistence (deposits);
/// breakdown components are summed at full precision.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use moline_venue::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Whether the selected package already bundles late bar access.
pub fn package_bundles_late_bar(package: Option<&str>) -> bool {
    package.is_some_and(|p| p.contains(WEDDING_PACKAGE_MARKER))
}

/// One priced entry in a breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub description: String,
    pub amount: Decimal,
}

impl LineItem {
    fn new(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount,
        }
    }
}

/// Itemized quote for one booking configuration.
///
/// `line_items` is in display order: base, guests, late bar, food.
/// `resident_dj_price` is always zero and never billed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingBreakdown {
    pub base_price: Decimal,
    pub guest_price: Decimal,
    pub late_bar_price: Decimal,
    pub resident_dj_price: Decimal,
    pub food_price: Decimal,
    pub subtotal: Decimal,
    pub line_items: Vec<LineItem>,
}

impl PricingBreakdown {
    /// "Not priced yet": all components zero, no line items
    pub fn zero() -> Self {
        Self::default()
    }

    /// True when a rule was resolved, even if it priced the booking at zero
    pub fn is_priced(&self) -> bool {
        !self.line_items.is_empty()
    }
}

/// How a rule was picked for a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMatch<'a> {
    /// Exact match on the selected package
    Package(&'a PricingRule),
    /// The room's default rule (no package)
    Default(&'a PricingRule),
}

impl<'a> RuleMatch<'a> {
    pub fn rule(&self) -> &'a PricingRule {
        match self {
            RuleMatch::Package(rule) | RuleMatch::Default(rule) => rule,
        }
    }
}

/// Pick the rule for `room` and `package`.
///
/// Resolution order:
/// 1. Active rule whose package equals `package` exactly
/// 2. Active default rule for the room
///
/// The first match wins when the store holds duplicates.
pub fn resolve_rule<'a>(
    rules: &'a [PricingRule],
    room: RoomChoice,
    package: Option<&str>,
) -> Option<RuleMatch<'a>> {
    let candidates = || {
        rules
            .iter()
            .filter(move |rule| rule.active && rule.room_choice == room)
    };

    if let Some(package) = package {
        if let Some(rule) = candidates().find(|rule| rule.matches_package(package)) {
            return Some(RuleMatch::Package(rule));
        }
    }

    candidates()
        .find(|rule| rule.is_default())
        .map(RuleMatch::Default)
}

/// Assemble the breakdown for a configuration against a resolved rule.
pub fn price_with_rule(
    config: &BookingConfiguration,
    room: RoomChoice,
    matched: RuleMatch<'_>,
) -> PricingBreakdown {
    let rule = matched.rule();
    let mut breakdown = PricingBreakdown::zero();

    // Base price is always listed, even when zero
    breakdown.base_price = rule.base_price;
    let base_description = match matched {
        RuleMatch::Package(rule) => rule.package.clone().unwrap_or_default(),
        RuleMatch::Default(_) => format!("{} - Base Hire", room),
    };
    breakdown
        .line_items
        .push(LineItem::new(base_description, breakdown.base_price));

    if let Some(per_guest) = non_zero(rule.per_guest_price) {
        if config.guests > 0 {
            breakdown.guest_price = Decimal::from(config.guests) * per_guest;
            breakdown.line_items.push(LineItem::new(
                format!(
                    "{} guests @ £{} per person",
                    config.guests,
                    per_guest.normalize()
                ),
                breakdown.guest_price,
            ));
        }
    }

    if config.late_bar && !package_bundles_late_bar(config.selected_package()) {
        if let Some(late_bar) = non_zero(rule.add_on_late_bar) {
            breakdown.late_bar_price = late_bar;
            breakdown
                .line_items
                .push(LineItem::new(LATE_BAR_DESCRIPTION, late_bar));
        }
    }

    // Resident DJ is settled in cash on the night: never itemized or totalled.
    breakdown.resident_dj_price = Decimal::ZERO;

    if config.food_required {
        if let Some(food) = non_zero(rule.add_on_food_price) {
            breakdown.food_price = food;
            breakdown.line_items.push(LineItem::new(FOOD_DESCRIPTION, food));
        }
    }

    breakdown.subtotal = breakdown.base_price
        + breakdown.guest_price
        + breakdown.late_bar_price
        + breakdown.food_price;

    breakdown
}

/// Price a configuration against the active rules for its room.
///
/// Returns the zero breakdown when no room is selected or no rule resolves.
pub fn calculate_breakdown(config: &BookingConfiguration, rules: &[PricingRule]) -> PricingBreakdown {
    let Some(room) = config.room_choice else {
        return PricingBreakdown::zero();
    };

    match resolve_rule(rules, room, config.selected_package()) {
        Some(matched) => price_with_rule(config, room, matched),
        None => PricingBreakdown::zero(),
    }
}

fn non_zero(amount: Option<Decimal>) -> Option<Decimal> {
    amount.filter(|a| !a.is_zero())
}
