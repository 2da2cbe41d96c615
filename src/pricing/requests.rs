//! Request DTOs for pricing API endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{BookingConfiguration, RoomChoice};

/// Quote request, as posted by the wizard on every form change
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteRequest {
    pub room_choice: Option<RoomChoice>,
    pub package: Option<String>,
    pub guests: u32,
    pub late_bar: bool,
    pub resident_dj: bool,
    pub food_required: bool,
}

impl From<QuoteRequest> for BookingConfiguration {
    fn from(req: QuoteRequest) -> Self {
        Self {
            room_choice: req.room_choice,
            package: req.package.filter(|p| !p.trim().is_empty()),
            guests: req.guests,
            late_bar: req.late_bar,
            resident_dj: req.resident_dj,
            food_required: req.food_required,
        }
    }
}

/// Request for booking totals and the draft invoice
#[derive(Debug, Deserialize)]
pub struct TotalsRequest {
    pub quote: QuoteRequest,
    /// Generated when absent
    #[serde(default)]
    pub booking_reference: Option<String>,
    /// Defaults to today (UTC)
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
}

/// Query for listing rules
#[derive(Debug, Deserialize)]
pub struct RulesQuery {
    pub room: RoomChoice,
}

/// Query for invalidating cached rules; all rooms when `room` is absent
#[derive(Debug, Default, Deserialize)]
pub struct InvalidateQuery {
    #[serde(default)]
    pub room: Option<RoomChoice>,
}
