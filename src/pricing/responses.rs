//! Response DTOs for pricing API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{LineItem, PricingBreakdown};
use super::format::{format_gbp, CURRENCY};
use super::invoice::{BookingTotals, InvoiceDraft, InvoiceLineDraft};

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    pub formatted: String,
}

impl MoneyResponse {
    pub fn gbp(amount: Decimal) -> Self {
        Self {
            amount,
            currency: CURRENCY.to_string(),
            formatted: format_gbp(amount),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LineItemResponse {
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub formatted: String,
}

impl From<&LineItem> for LineItemResponse {
    fn from(item: &LineItem) -> Self {
        Self {
            description: item.description.clone(),
            amount: item.amount,
            formatted: format_gbp(item.amount),
        }
    }
}

/// Response for a quote
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub guest_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub late_bar_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub resident_dj_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub food_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    pub formatted_subtotal: String,
    pub currency: String,
    /// False for the "not priced yet" zero state
    pub priced: bool,
    pub line_items: Vec<LineItemResponse>,
}

impl From<&PricingBreakdown> for BreakdownResponse {
    fn from(b: &PricingBreakdown) -> Self {
        Self {
            base_price: b.base_price,
            guest_price: b.guest_price,
            late_bar_price: b.late_bar_price,
            resident_dj_price: b.resident_dj_price,
            food_price: b.food_price,
            subtotal: b.subtotal,
            formatted_subtotal: format_gbp(b.subtotal),
            currency: CURRENCY.to_string(),
            priced: b.is_priced(),
            line_items: b.line_items.iter().map(LineItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceLineResponse {
    pub description: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
}

impl From<&InvoiceLineDraft> for InvoiceLineResponse {
    fn from(line: &InvoiceLineDraft) -> Self {
        Self {
            description: line.description.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDraftResponse {
    pub status: String,
    pub subtotal: MoneyResponse,
    pub tax_amount: MoneyResponse,
    pub discount_amount: MoneyResponse,
    pub total_amount: MoneyResponse,
    pub due_date: NaiveDate,
    pub notes: String,
    pub line_items: Vec<InvoiceLineResponse>,
}

impl From<&InvoiceDraft> for InvoiceDraftResponse {
    fn from(draft: &InvoiceDraft) -> Self {
        Self {
            status: draft.status.clone(),
            subtotal: MoneyResponse::gbp(draft.subtotal),
            tax_amount: MoneyResponse::gbp(draft.tax_amount),
            discount_amount: MoneyResponse::gbp(draft.discount_amount),
            total_amount: MoneyResponse::gbp(draft.total_amount),
            due_date: draft.due_date,
            notes: draft.notes.clone(),
            line_items: draft.line_items.iter().map(InvoiceLineResponse::from).collect(),
        }
    }
}

/// Response for booking totals
#[derive(Debug, Clone, Serialize)]
pub struct TotalsResponse {
    pub booking_reference: String,
    pub total_amount: MoneyResponse,
    pub deposit_amount: MoneyResponse,
    pub breakdown: BreakdownResponse,
    pub invoice: Option<InvoiceDraftResponse>,
}

impl TotalsResponse {
    pub fn new(
        booking_reference: String,
        breakdown: &PricingBreakdown,
        totals: &BookingTotals,
        invoice: Option<&InvoiceDraft>,
    ) -> Self {
        Self {
            booking_reference,
            total_amount: MoneyResponse::gbp(totals.total_amount),
            deposit_amount: MoneyResponse::gbp(totals.deposit_amount),
            breakdown: BreakdownResponse::from(breakdown),
            invoice: invoice.map(InvoiceDraftResponse::from),
        }
    }
}
