//! GBP display formatting.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

pub const CURRENCY: &str = "GBP";
const SYMBOL: char = '£';

/// Format an amount the way en-GB locales display pounds: `£1,234.50`.
///
/// Rounds half away from zero to two places; negative amounts get a leading
/// minus sign (`-£5.00`).
pub fn format_gbp(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();
    let (whole, pence) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        SYMBOL,
        group_thousands(whole),
        pence
    )
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
