use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::db::diary::DiaryFields;
use crate::dto::{
    clean_list, DiaryTimelineResponse, MessageResponse, PageQuery, Pagination,
    UpdateDiaryRequest, UpsertDiaryRequest,
};
use crate::error::{AppError, AppResult};
use crate::handlers::days::is_loggable_date;
use crate::models::diary::{diary_stats, DiaryEntry, DiaryStats};
use crate::streak::dates::to_iso;
use crate::AppState;

const TIMELINE_PAGE_LIMIT: u32 = 20;

/// First day of `year` and of the year after.
fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?,
    ))
}

pub async fn upsert_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpsertDiaryRequest>,
) -> AppResult<(StatusCode, Json<DiaryEntry>)> {
    body.validate()?;

    let today = Utc::now().date_naive();
    if !is_loggable_date(body.date, today) {
        return Err(AppError::Validation(
            "Invalid date format or out of range".into(),
        ));
    }

    let content = body.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Content required".into()));
    }

    let people = body.people.as_deref().map(clean_list);
    let fields = DiaryFields {
        title: body.title.as_deref().map(str::trim),
        mood: body.mood,
        mood_intensity: body.mood_intensity,
        people: people.as_deref(),
        gratitude: body.gratitude.as_deref().map(str::trim),
        reflection: body.reflection.as_deref().map(str::trim),
        ..Default::default()
    };

    let entry = db::diary::upsert(&state.db, auth_user.id, body.date, content, &fields).await?;

    tracing::debug!(
        user_id = %auth_user.id,
        date = %to_iso(body.date),
        entry_id = %entry.id,
        "Diary entry saved"
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_by_date(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<DiaryEntry>> {
    let entry = db::diary::on_date(&state.db, auth_user.id, date)
        .await?
        .ok_or(AppError::NotFound("No entry for this date".into()))?;

    Ok(Json(entry))
}

pub async fn list_year(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(year): Path<i32>,
) -> AppResult<Json<Vec<DiaryEntry>>> {
    let (from, until) =
        year_bounds(year).ok_or_else(|| AppError::Validation("Invalid year".into()))?;

    let entries = db::diary::between(&state.db, auth_user.id, from, until).await?;
    Ok(Json(entries))
}

pub async fn timeline(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<DiaryTimelineResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let offset = i64::from(page - 1) * i64::from(TIMELINE_PAGE_LIMIT);

    let data = db::diary::page(
        &state.db,
        auth_user.id,
        i64::from(TIMELINE_PAGE_LIMIT),
        offset,
    )
    .await?;
    let total = db::diary::count(&state.db, auth_user.id).await?;

    Ok(Json(DiaryTimelineResponse {
        data,
        pagination: Pagination::new(page, TIMELINE_PAGE_LIMIT, total as u32),
    }))
}

/// Entries written on today's month and day in any year, this year's included.
pub async fn on_this_day(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<DiaryEntry>>> {
    let today = Utc::now().date_naive();
    let entries =
        db::diary::on_this_day(&state.db, auth_user.id, today.month(), today.day()).await?;

    Ok(Json(entries))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<DiaryStats>> {
    let moods = db::diary::moods(&state.db, auth_user.id).await?;
    Ok(Json(diary_stats(&moods)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<UpdateDiaryRequest>,
) -> AppResult<Json<DiaryEntry>> {
    body.validate()?;

    let content = body.content.as_deref().map(str::trim);
    if content.is_some_and(str::is_empty) {
        return Err(AppError::Validation("Content required".into()));
    }

    let people = body.people.as_deref().map(clean_list);
    let fields = DiaryFields {
        title: body.title.as_deref().map(str::trim),
        content,
        mood: body.mood,
        mood_intensity: body.mood_intensity,
        people: people.as_deref(),
        gratitude: body.gratitude.as_deref().map(str::trim),
        reflection: body.reflection.as_deref().map(str::trim),
        is_pinned: body.is_pinned,
        is_favorite: body.is_favorite,
    };

    let entry = db::diary::update(&state.db, auth_user.id, entry_id, &fields)
        .await?
        .ok_or(AppError::NotFound("Entry not found".into()))?;

    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    if !db::diary::delete(&state.db, auth_user.id, entry_id).await? {
        return Err(AppError::NotFound("Entry not found".into()));
    }

    tracing::debug!(user_id = %auth_user.id, entry_id = %entry_id, "Diary entry deleted");

    Ok(Json(MessageResponse {
        message: "Entry deleted".into(),
    }))
}
