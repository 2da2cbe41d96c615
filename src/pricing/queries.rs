//! Database queries for pricing engine.
//!
//! Read-only: the engine never writes pricing rules.

use sqlx::PgPool;

use crate::error::AppError;
use crate::models::RoomChoice;

use super::models::PricingRuleRow;

/// Active rules for one room, oldest first
pub async fn find_active_rules(
    pool: &PgPool,
    room_choice: RoomChoice,
) -> Result<Vec<PricingRuleRow>, AppError> {
    let rows = sqlx::query_as::<_, PricingRuleRow>(
        r#"
        SELECT
            id, name, room_choice, package,
            base_price, per_guest_price,
            add_on_late_bar, add_on_resident_dj, add_on_food_price,
            active
        FROM pricing_rules
        WHERE room_choice = $1
          AND active = true
        ORDER BY created_at ASC NULLS LAST, id
        "#,
    )
    .bind(room_choice.label())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All active rules (for cache warming)
pub async fn get_all_active_rules(pool: &PgPool) -> Result<Vec<PricingRuleRow>, AppError> {
    let rows = sqlx::query_as::<_, PricingRuleRow>(
        r#"
        SELECT
            id, name, room_choice, package,
            base_price, per_guest_price,
            add_on_late_bar, add_on_resident_dj, add_on_food_price,
            active
        FROM pricing_rules
        WHERE active = true
        ORDER BY room_choice, created_at ASC NULLS LAST, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
