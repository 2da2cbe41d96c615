//! Booking wizard route handlers

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{
    BookingConfiguration, BookingDraft, FieldErrors, RoomChoice, WizardStep, PACKAGES,
};
use crate::pricing::requests::QuoteRequest;
use crate::pricing::{compute_breakdown, format_gbp};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/booking/validate-step", post(validate_step))
        .route("/api/booking/packages", get(packages))
        .route("/booking/pricing-summary", get(pricing_summary))
}

#[derive(Debug, Deserialize)]
pub struct ValidateStepRequest {
    pub step: WizardStep,
    #[serde(default)]
    pub draft: BookingDraft,
}

#[derive(Debug, Serialize)]
pub struct ValidateStepResponse {
    pub step: u8,
    pub valid: bool,
    pub errors: FieldErrors,
}

/// Check the fields of one wizard step before the guest moves on
async fn validate_step(Json(req): Json<ValidateStepRequest>) -> Json<ValidateStepResponse> {
    let errors = req.draft.validate_step(req.step).err().unwrap_or_default();
    Json(ValidateStepResponse {
        step: req.step.number(),
        valid: errors.is_empty(),
        errors,
    })
}

#[derive(Debug, Deserialize)]
pub struct PackagesQuery {
    pub room: RoomChoice,
}

#[derive(Debug, Serialize)]
pub struct PackagesResponse {
    pub room_choice: RoomChoice,
    pub packages: Vec<&'static str>,
}

/// Packages the wizard offers for a room (none for the Lounge)
async fn packages(Query(query): Query<PackagesQuery>) -> Json<PackagesResponse> {
    let packages = if query.room.offers_packages() {
        PACKAGES.to_vec()
    } else {
        Vec::new()
    };
    Json(PackagesResponse {
        room_choice: query.room,
        packages,
    })
}

/// Live pricing panel shown beside the wizard
#[derive(Template)]
#[template(path = "booking/pricing_summary.html")]
struct PricingSummaryTemplate {
    has_pricing: bool,
    line_items: Vec<SummaryLine>,
    total: String,
    show_dj_note: bool,
}

struct SummaryLine {
    description: String,
    amount: String,
}

async fn pricing_summary(
    State(state): State<AppState>,
    Query(req): Query<QuoteRequest>,
) -> Result<Html<String>> {
    let config = BookingConfiguration::from(req);
    let breakdown = compute_breakdown(state.rules.as_ref(), &config).await;

    let template = PricingSummaryTemplate {
        has_pricing: !breakdown.subtotal.is_zero(),
        line_items: breakdown
            .line_items
            .iter()
            .map(|item| SummaryLine {
                description: item.description.clone(),
                amount: format_gbp(item.amount),
            })
            .collect(),
        total: format_gbp(breakdown.subtotal),
        show_dj_note: config.resident_dj && config.room_choice == Some(RoomChoice::FunctionRoom),
    };

    Ok(Html(template.render()?))
}
