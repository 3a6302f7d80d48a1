use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::dto::{
    CreateLogRequest, DayDeletedResponse, DaysQuery, DaysResponse, ExportResponse, ExportStats,
    Pagination, YearQuery,
};
use crate::error::{AppError, AppResult};
use crate::models::day_record::{group_by_day, DayWithLogs};
use crate::models::user::User;
use crate::streak::{dates::to_iso, heatmap::HeatmapCell};
use crate::AppState;

const DEFAULT_PAGE_LIMIT: u32 = 1000;

/// Logs and diary entries may be written for today or any earlier day from
/// 2000 on.
pub(crate) fn is_loggable_date(date: NaiveDate, today: NaiveDate) -> bool {
    (2000..=2100).contains(&date.year()) && date <= today
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DeleteLogResponse {
    Day(DayWithLogs),
    Deleted(DayDeletedResponse),
}

pub async fn list_days(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DaysQuery>,
) -> AppResult<Json<DaysResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(1);

    let days = group_by_day(db::days::logs_for_user(&state.db, auth_user.id).await?);
    let total = days.len() as u32;

    let data = days
        .into_iter()
        .skip((page - 1).saturating_mul(limit) as usize)
        .take(limit as usize)
        .collect();

    Ok(Json(DaysResponse {
        data,
        pagination: Pagination::new(page, limit, total),
    }))
}

pub async fn add_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateLogRequest>,
) -> AppResult<Json<DayWithLogs>> {
    body.validate()?;

    let today = Utc::now().date_naive();
    if !is_loggable_date(body.date, today) {
        return Err(AppError::Validation(
            "Invalid date format or out of range".into(),
        ));
    }

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title must be 1-200 characters".into()));
    }

    let description = body
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let log = db::days::insert_log(
        &state.db,
        auth_user.id,
        body.date,
        title,
        description,
        body.category.unwrap_or_default(),
    )
    .await?;

    tracing::debug!(
        user_id = %auth_user.id,
        date = %to_iso(body.date),
        log_id = %log.id,
        "Activity logged"
    );

    let logs = db::days::logs_on(&state.db, auth_user.id, body.date).await?;
    Ok(Json(DayWithLogs {
        date: body.date,
        logs,
    }))
}

pub async fn delete_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((date, log_id)): Path<(NaiveDate, Uuid)>,
) -> AppResult<Json<DeleteLogResponse>> {
    if !db::days::delete_log(&state.db, auth_user.id, date, log_id).await? {
        return Err(AppError::NotFound("Log not found".into()));
    }

    let logs = db::days::logs_on(&state.db, auth_user.id, date).await?;
    let response = if logs.is_empty() {
        DeleteLogResponse::Deleted(DayDeletedResponse {
            date,
            deleted: true,
        })
    } else {
        DeleteLogResponse::Day(DayWithLogs { date, logs })
    };

    Ok(Json(response))
}

pub async fn export(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ExportResponse>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let streak_freeze = db::freeze::load(&state.db, auth_user.id).await?;

    let mut activities = group_by_day(db::days::logs_for_user(&state.db, auth_user.id).await?);
    activities.reverse();

    let stats = ExportStats {
        total_days: activities.len() as u32,
        total_logs: activities.iter().map(|d| d.record().log_count).sum(),
    };

    tracing::info!(user_id = %auth_user.id, days = stats.total_days, "Data exported");

    Ok(Json(ExportResponse {
        export_date: Utc::now(),
        user: user.into(),
        streak_freeze,
        activities,
        stats,
    }))
}

pub async fn get_heatmap(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<Vec<HeatmapCell>>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let days = db::days::day_records(&state.db, auth_user.id).await?;

    Ok(Json(crate::streak::heatmap::heatmap(&days, year)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn today_and_past_dates_are_loggable() {
        let today = d(2026, 3, 15);
        assert!(is_loggable_date(today, today));
        assert!(is_loggable_date(d(2001, 1, 1), today));
    }

    #[test]
    fn future_and_out_of_range_dates_are_not() {
        let today = d(2026, 3, 15);
        assert!(!is_loggable_date(d(2026, 3, 16), today));
        assert!(!is_loggable_date(d(1999, 12, 31), today));
    }
}
