//! Freeze state storage. Every mutation is a single conditional UPDATE so two
//! requests racing on the same user cannot both spend or both earn a credit.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::freeze::FreezeState;
use crate::streak::milestone::MAX_FREEZE_CREDITS;

pub async fn ensure_row(db: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO streak_freezes (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}

/// Missing rows read as the empty state of a brand-new user.
pub async fn load(db: &PgPool, user_id: Uuid) -> Result<FreezeState, sqlx::Error> {
    let state = sqlx::query_as::<_, FreezeState>("SELECT * FROM streak_freezes WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?;

    Ok(state.unwrap_or_default())
}

/// Grants one credit for `milestone` if the user is below the cap and the
/// stored milestone still equals `expected_last`. `None` means nothing was
/// written.
pub async fn award_credit(
    db: &PgPool,
    user_id: Uuid,
    milestone: i32,
    expected_last: i32,
) -> Result<Option<FreezeState>, sqlx::Error> {
    sqlx::query_as::<_, FreezeState>(
        r#"
        UPDATE streak_freezes SET
            credits = credits + 1,
            total_earned = total_earned + 1,
            last_earned_milestone = $2,
            last_earned_at = NOW()
        WHERE user_id = $1
            AND credits < $4
            AND last_earned_milestone = $3
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(milestone)
    .bind(expected_last)
    .bind(MAX_FREEZE_CREDITS)
    .fetch_optional(db)
    .await
}

/// Spends one credit on `date`. `None` means no credit was left or the date
/// was frozen concurrently.
pub async fn consume_credit(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<Option<FreezeState>, sqlx::Error> {
    sqlx::query_as::<_, FreezeState>(
        r#"
        UPDATE streak_freezes SET
            credits = credits - 1,
            used_dates = array_append(used_dates, $2),
            total_used = total_used + 1,
            manual_activations = manual_activations + 1
        WHERE user_id = $1
            AND credits > 0
            AND NOT ($2 = ANY(used_dates))
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(db)
    .await
}

pub async fn reset_milestone(db: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE streak_freezes SET last_earned_milestone = 0 WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}
