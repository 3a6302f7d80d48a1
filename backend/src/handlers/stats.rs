use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Datelike, Utc};

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::dto::{StatsResponse, YearQuery};
use crate::error::AppResult;
use crate::streak::{compute_snapshot, titles::title_progress, year_totals};
use crate::AppState;

pub async fn get_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<StatsResponse>> {
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());

    let days = db::days::day_records(&state.db, auth_user.id).await?;
    let freeze = db::freeze::load(&state.db, auth_user.id).await?;

    let snapshot = compute_snapshot(&days, year, &freeze, today);

    tracing::debug!(
        user_id = %auth_user.id,
        year,
        current_streak = snapshot.current_streak,
        max_streak = snapshot.max_streak,
        liveness = ?snapshot.liveness,
        "Streak snapshot computed"
    );

    Ok(Json(StatsResponse {
        titles: title_progress(snapshot.current_streak),
        year_totals: year_totals(&days, year),
        year,
        snapshot,
    }))
}
