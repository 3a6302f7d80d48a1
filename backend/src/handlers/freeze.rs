use axum::{extract::State, Extension, Json};
use chrono::{Datelike, Utc};

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::dto::{ActivateFreezeRequest, ActivateFreezeResponse, EarnFreezeResponse};
use crate::error::{AppError, AppResult};
use crate::models::freeze::FreezeState;
use crate::streak::{compute_snapshot, dates::to_iso, rebase_milestone, should_earn_credit};
use crate::AppState;

pub async fn get_freeze(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<FreezeState>> {
    let freeze = db::freeze::load(&state.db, auth_user.id).await?;
    Ok(Json(freeze))
}

/// Recomputes the streak server-side and awards at most one credit for the
/// smallest uncredited milestone.
pub async fn earn_freeze(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<EarnFreezeResponse>> {
    let today = Utc::now().date_naive();

    db::freeze::ensure_row(&state.db, auth_user.id).await?;
    let days = db::days::day_records(&state.db, auth_user.id).await?;
    let freeze = db::freeze::load(&state.db, auth_user.id).await?;

    let snapshot = compute_snapshot(&days, today.year(), &freeze, today);
    let stored = freeze.last_earned_milestone.max(0) as u32;
    let last = rebase_milestone(
        snapshot.current_streak,
        stored,
        freeze.last_earned_at.map(|at| at.date_naive()),
        snapshot.streak_started,
    );
    if last != stored {
        tracing::debug!(
            user_id = %auth_user.id,
            stored,
            streak_started = ?snapshot.streak_started,
            "Streak broke, milestone rebased"
        );
        db::freeze::reset_milestone(&state.db, auth_user.id).await?;
    }

    let decision = should_earn_credit(snapshot.current_streak, last);
    let Some(milestone) = decision.milestone else {
        return Ok(Json(EarnFreezeResponse {
            message: "No new milestone reached".into(),
            credits: freeze.credits,
            is_new: false,
            milestone: None,
        }));
    };

    if !freeze.can_award() {
        return Ok(Json(EarnFreezeResponse {
            message: "Already at max freeze credits".into(),
            credits: freeze.credits,
            is_new: false,
            milestone: None,
        }));
    }

    match db::freeze::award_credit(&state.db, auth_user.id, milestone as i32, last as i32).await? {
        Some(updated) => {
            tracing::info!(
                user_id = %auth_user.id,
                milestone,
                credits = updated.credits,
                "Freeze credit earned"
            );
            Ok(Json(EarnFreezeResponse {
                message: format!("Freeze credit earned! {}-day milestone reached", milestone),
                credits: updated.credits,
                is_new: true,
                milestone: Some(milestone),
            }))
        }
        None => {
            // Another request got there first; report whatever is stored now.
            let latest = db::freeze::load(&state.db, auth_user.id).await?;
            tracing::warn!(user_id = %auth_user.id, milestone, "Freeze award lost a race");
            Ok(Json(EarnFreezeResponse {
                message: "No freeze credit awarded".into(),
                credits: latest.credits,
                is_new: false,
                milestone: None,
            }))
        }
    }
}

pub async fn activate_freeze(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ActivateFreezeRequest>,
) -> AppResult<Json<ActivateFreezeResponse>> {
    let today = Utc::now().date_naive();

    let freeze = db::freeze::load(&state.db, auth_user.id).await?;
    let logs_on_date = db::days::count_logs_on(&state.db, auth_user.id, body.date).await?;
    freeze.check_activation(body.date, today, logs_on_date)?;

    let Some(updated) = db::freeze::consume_credit(&state.db, auth_user.id, body.date).await?
    else {
        // State moved between the check and the write; report the precise reason.
        let latest = db::freeze::load(&state.db, auth_user.id).await?;
        latest.check_activation(body.date, today, logs_on_date)?;
        return Err(AppError::Conflict("Freeze state changed, please retry".into()));
    };

    tracing::info!(
        user_id = %auth_user.id,
        date = %to_iso(body.date),
        credits = updated.credits,
        "Freeze activated"
    );

    Ok(Json(ActivateFreezeResponse {
        message: "Freeze activated successfully!".into(),
        credits: updated.credits,
        date: body.date,
        is_manual: true,
    }))
}
