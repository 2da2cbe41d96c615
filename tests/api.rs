use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use moline_venue::cache::AppCache;
use moline_venue::models::RoomChoice;
use moline_venue::pricing::models::PricingRule;
use moline_venue::pricing::InMemoryRuleStore;
use moline_venue::{routes, AppState};

fn venue_rules() -> Vec<PricingRule> {
    vec![
        PricingRule::new(RoomChoice::FunctionRoom, dec!(300.00))
            .with_per_guest_price(dec!(2.00))
            .with_late_bar(dec!(40.00))
            .with_resident_dj(dec!(150.00))
            .with_food(dec!(500.00)),
        PricingRule::new(RoomChoice::FunctionRoom, dec!(650.00))
            .with_package("Wedding Package 2")
            .with_late_bar(dec!(40.00)),
    ]
}

fn app_with(store: Arc<InMemoryRuleStore>) -> Router {
    routes::router(AppState::cached(store, AppCache::default()))
}

fn app() -> Router {
    app_with(Arc::new(InMemoryRuleStore::new(venue_rules())))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn quote_prices_function_room_with_add_ons() {
    let (status, body) = post_json(
        app(),
        "/api/pricing/quote",
        json!({
            "room_choice": "Function Room (max 100 guests)",
            "guests": 80,
            "late_bar": true,
            "resident_dj": true,
            "food_required": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subtotal"], "1000.00");
    assert_eq!(body["formattedSubtotal"], "£1,000.00");
    assert_eq!(body["residentDjPrice"], "0");

    let items = body["lineItems"].as_array().unwrap();
    let descriptions: Vec<&str> = items
        .iter()
        .map(|i| i["description"].as_str().unwrap())
        .collect();
    assert_eq!(
        descriptions,
        vec![
            "Function Room (max 100 guests) - Base Hire",
            "80 guests @ £2 per person",
            "Late Bar",
            "Food & Catering",
        ]
    );
    assert_eq!(items[1]["amount"], "160.00");
}

#[tokio::test]
async fn quote_without_room_is_zero_state() {
    let (status, body) = post_json(app(), "/api/pricing/quote", json!({ "guests": 40 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subtotal"], "0");
    assert_eq!(body["priced"], false);
    assert!(body["lineItems"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn quote_survives_store_outage() {
    let store = Arc::new(InMemoryRuleStore::new(venue_rules()));
    store.set_failing(true);

    let (status, body) = post_json(
        app_with(store),
        "/api/pricing/quote",
        json!({ "room_choice": "function_room", "guests": 10 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subtotal"], "0");
    assert!(body["lineItems"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn resolve_reports_missing_rule() {
    let (status, body) = post_json(
        app(),
        "/api/pricing/resolve",
        json!({ "room_choice": "lounge", "guests": 10 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "no_matching_rule");
    assert_eq!(body["details"]["room_choice"], "Lounge (max 50 guests)");
}

#[tokio::test]
async fn resolve_reports_missing_room() {
    let (status, body) = post_json(app(), "/api/pricing/resolve", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "missing_room_choice");
}

#[tokio::test]
async fn resolve_prices_wedding_package() {
    let (status, body) = post_json(
        app(),
        "/api/pricing/resolve",
        json!({
            "room_choice": "function_room",
            "package": "Wedding Package 2",
            "late_bar": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subtotal"], "650.00");
    assert_eq!(body["lineItems"].as_array().unwrap().len(), 1);
    assert_eq!(body["lineItems"][0]["description"], "Wedding Package 2");
}

#[tokio::test]
async fn totals_include_deposit_and_invoice() {
    let (status, body) = post_json(
        app(),
        "/api/pricing/totals",
        json!({
            "quote": {
                "room_choice": "function_room",
                "guests": 80,
                "late_bar": true,
                "food_required": true
            },
            "booking_reference": "BK-2026-ABCD1234",
            "issued_on": "2026-10-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking_reference"], "BK-2026-ABCD1234");
    assert_eq!(body["total_amount"]["formatted"], "£1,000.00");
    assert_eq!(body["deposit_amount"]["formatted"], "£200.00");
    assert_eq!(body["invoice"]["status"], "draft");
    assert_eq!(body["invoice"]["due_date"], "2026-11-14");
    assert_eq!(body["invoice"]["notes"], "Booking reference: BK-2026-ABCD1234");
    assert_eq!(body["invoice"]["line_items"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn totals_for_unpriced_booking_have_no_invoice() {
    let (status, body) = post_json(app(), "/api/pricing/totals", json!({ "quote": {} })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["invoice"].is_null());
    assert!(body["booking_reference"].as_str().unwrap().starts_with("BK-"));
}

#[tokio::test]
async fn rules_listing_reads_active_rules() {
    let (status, body) = get_text(app(), "/api/pricing/rules?room=function_room").await;
    assert_eq!(status, StatusCode::OK);
    let rules: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(rules.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn cache_invalidation_forces_reload() {
    let store = Arc::new(InMemoryRuleStore::new(venue_rules()));
    let app = app_with(store.clone());
    let quote = json!({ "room_choice": "lounge" });

    let (_, before) = post_json(app.clone(), "/api/pricing/quote", quote.clone()).await;
    assert_eq!(before["priced"], false);

    store
        .replace(vec![PricingRule::new(RoomChoice::Lounge, dec!(150.00))])
        .await;
    let (status, _) = post_json(app.clone(), "/api/pricing/cache/invalidate?room=lounge", Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, after) = post_json(app, "/api/pricing/quote", quote).await;
    assert_eq!(after["subtotal"], "150.00");
}

#[tokio::test]
async fn validate_step_reports_field_errors() {
    let (status, body) = post_json(
        app(),
        "/api/booking/validate-step",
        json!({
            "step": 4,
            "draft": { "room_choice": "lounge", "guests": 60, "event_date": "2026-12-12" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 4);
    assert_eq!(body["valid"], false);
    assert_eq!(
        body["errors"]["guests"][0],
        "Number of guests exceeds maximum capacity of selected room"
    );
}

#[tokio::test]
async fn pricing_summary_renders_line_items() {
    let (status, html) = get_text(
        app(),
        "/booking/pricing-summary?room_choice=function_room&guests=80&late_bar=true&resident_dj=true",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Late Bar"));
    assert!(html.contains("£160.00"));
    assert!(html.contains("£500.00"));
    assert!(html.contains("Resident DJ is payable on the evening"));
}

#[tokio::test]
async fn pricing_summary_prompts_until_priced() {
    let (status, html) = get_text(app(), "/booking/pricing-summary").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Complete your selections to see pricing"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _) = get_text(app(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn packages_only_offered_for_function_room() {
    let (_, body) = get_text(app(), "/api/booking/packages?room=function_room").await;
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["packages"].as_array().unwrap().len(), 6);

    let (_, body) = get_text(app(), "/api/booking/packages?room=lounge").await;
    let body: Value = serde_json::from_str(&body).unwrap();
    assert!(body["packages"].as_array().unwrap().is_empty());
}
