//! HTTP handlers for the pricing API, mounted under `/api/pricing`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::cache::CacheStats;
use crate::error::{ErrorResponse, Result};
use crate::models::BookingConfiguration;
use crate::AppState;

use super::invoice::{booking_reference, BookingTotals, InvoiceDraft};
use super::models::PricingRule;
use super::requests::{InvalidateQuery, QuoteRequest, RulesQuery, TotalsRequest};
use super::responses::{BreakdownResponse, TotalsResponse};
use super::services::{compute_breakdown, try_compute_breakdown, PricingError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote))
        .route("/resolve", post(resolve))
        .route("/totals", post(totals))
        .route("/rules", get(list_rules))
        .route("/cache/stats", get(cache_stats))
        .route("/cache/invalidate", post(invalidate_cache))
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let (status, error_type, details) = match &self {
            PricingError::MissingRoomChoice => (StatusCode::BAD_REQUEST, "missing_room_choice", None),
            PricingError::NoMatchingRule {
                room_choice,
                package,
            } => (
                StatusCode::NOT_FOUND,
                "no_matching_rule",
                Some(json!({ "room_choice": room_choice, "package": package })),
            ),
            PricingError::RuleStoreUnavailable { room_choice, .. } => {
                tracing::error!("{}", self);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "rule_store_unavailable",
                    Some(json!({ "room_choice": room_choice })),
                )
            }
        };

        let body = ErrorResponse {
            details,
            ..ErrorResponse::new(error_type, self.to_string())
        };
        (status, Json(body)).into_response()
    }
}

/// Live quote. Always answers; unpriceable input gets the zero breakdown.
async fn quote(State(state): State<AppState>, Json(req): Json<QuoteRequest>) -> Json<BreakdownResponse> {
    let config = BookingConfiguration::from(req);
    let breakdown = compute_breakdown(state.rules.as_ref(), &config).await;
    Json(BreakdownResponse::from(&breakdown))
}

/// Strict quote: reports why a configuration could not be priced.
async fn resolve(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> std::result::Result<Json<BreakdownResponse>, PricingError> {
    let config = BookingConfiguration::from(req);
    let breakdown = try_compute_breakdown(state.rules.as_ref(), &config).await?;
    Ok(Json(BreakdownResponse::from(&breakdown)))
}

/// Booking totals, deposit and the draft invoice for a submitted booking.
async fn totals(State(state): State<AppState>, Json(req): Json<TotalsRequest>) -> Json<TotalsResponse> {
    let config = BookingConfiguration::from(req.quote);
    let breakdown = compute_breakdown(state.rules.as_ref(), &config).await;

    let issued_on = req.issued_on.unwrap_or_else(|| Utc::now().date_naive());
    let reference = req
        .booking_reference
        .unwrap_or_else(|| booking_reference(issued_on.year(), Uuid::new_v4()));

    let totals = BookingTotals::from_breakdown(&breakdown);
    let invoice = InvoiceDraft::from_breakdown(&breakdown, &reference, issued_on);

    Json(TotalsResponse::new(
        reference,
        &breakdown,
        &totals,
        invoice.as_ref(),
    ))
}

async fn list_rules(
    State(state): State<AppState>,
    Query(query): Query<RulesQuery>,
) -> Result<Json<Vec<PricingRule>>> {
    let rules = state.rules.fetch_active_rules(query.room).await?;
    Ok(Json(rules))
}

async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

async fn invalidate_cache(
    State(state): State<AppState>,
    Query(query): Query<InvalidateQuery>,
) -> StatusCode {
    match query.room {
        Some(room) => state.cache.invalidate_room(room).await,
        None => state.cache.invalidate_all(),
    }
    StatusCode::NO_CONTENT
}
