//! Booking totals and draft invoices derived from a breakdown.
//!
//! The invoicing collaborator persists these; nothing here touches storage.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::calculators::{round_money, PricingBreakdown};

/// Share of the total taken as a deposit when the booking is made
pub const DEPOSIT_RATE: Decimal = dec!(0.20);

/// Days between invoice issue and due date
pub const INVOICE_DUE_DAYS: i64 = 30;

pub const INVOICE_STATUS_DRAFT: &str = "draft";

/// Amounts stored on the booking record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingTotals {
    pub total_amount: Decimal,
    pub deposit_amount: Decimal,
}

impl BookingTotals {
    pub fn from_breakdown(breakdown: &PricingBreakdown) -> Self {
        Self {
            total_amount: breakdown.subtotal,
            deposit_amount: round_money(breakdown.subtotal * DEPOSIT_RATE, 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceLineDraft {
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Draft invoice raised alongside a new booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub status: String,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub due_date: NaiveDate,
    pub notes: String,
    pub line_items: Vec<InvoiceLineDraft>,
}

impl InvoiceDraft {
    /// Build a draft from a quote. Unpriced (zero subtotal) bookings get no invoice.
    pub fn from_breakdown(
        breakdown: &PricingBreakdown,
        booking_reference: &str,
        issued_on: NaiveDate,
    ) -> Option<Self> {
        if breakdown.subtotal.is_zero() {
            return None;
        }

        let tax_amount = Decimal::ZERO;
        let discount_amount = Decimal::ZERO;

        Some(Self {
            status: INVOICE_STATUS_DRAFT.to_string(),
            subtotal: breakdown.subtotal,
            tax_amount,
            discount_amount,
            total_amount: breakdown.subtotal + tax_amount - discount_amount,
            due_date: issued_on + Duration::days(INVOICE_DUE_DAYS),
            notes: format!("Booking reference: {}", booking_reference),
            line_items: breakdown
                .line_items
                .iter()
                .map(|item| InvoiceLineDraft {
                    description: item.description.clone(),
                    quantity: 1,
                    unit_price: item.amount,
                })
                .collect(),
        })
    }
}

/// Human-facing booking reference, e.g. `BK-2026-3F2A9C1B`
pub fn booking_reference(year: i32, token: Uuid) -> String {
    let hex = token.simple().to_string();
    format!("BK-{}-{}", year, hex[..8].to_uppercase())
}
