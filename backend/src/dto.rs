//! # DevTracker: Request/Response DTOs
//!
//! API contract types shared by the handlers.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON
//! - Field-level rules are expressed via `validator` derive macros

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::day_record::{DayWithLogs, LogCategory};
use crate::models::diary::{DiaryEntry, Mood};
use crate::models::freeze::FreezeState;
use crate::models::resource::{Resource, ResourcePriority, ResourceStatus, ResourceType};
use crate::models::user::UserProfile;
use crate::streak::engine::YearTotals;
use crate::streak::titles::TitleProgress;
use crate::streak::StreakSnapshot;

// ============================================================================
// Common
// ============================================================================

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u32) -> Self {
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Query for endpoints scoped to a reporting year. Default: today's year.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

/// Page number for lists with a fixed page size. Default: 1
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Trims every item and drops the ones left empty.
pub fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn validate_people(people: &[String]) -> Result<(), ValidationError> {
    if people.iter().any(|p| p.trim().chars().count() > 100) {
        return Err(ValidationError::new("person name max 100 characters"));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().any(|t| t.trim().chars().count() > 50) {
        return Err(ValidationError::new("tag max 50 characters"));
    }
    Ok(())
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/register
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Valid email required"))]
    #[validate(length(max = 254, message = "Email too long"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// POST /api/auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

// ============================================================================
// Days & logs
// ============================================================================

/// GET /api/days
#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct DaysResponse {
    pub data: Vec<DayWithLogs>,
    pub pagination: Pagination,
}

/// POST /api/log
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLogRequest {
    pub date: NaiveDate,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 1000, message = "Description max 1000 characters"))]
    pub description: Option<String>,

    /// Default: "other"
    pub category: Option<LogCategory>,
}

/// Returned by DELETE /api/log/{date}/{log_id} when the day's last log went away
#[derive(Debug, Serialize)]
pub struct DayDeletedResponse {
    pub date: NaiveDate,
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct ExportStats {
    pub total_days: u32,
    pub total_logs: u32,
}

/// GET /api/export
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub export_date: DateTime<Utc>,
    pub user: UserProfile,
    pub streak_freeze: FreezeState,
    pub activities: Vec<DayWithLogs>,
    pub stats: ExportStats,
}

// ============================================================================
// Stats
// ============================================================================

/// GET /api/stats. Snapshot fields sit at the top level next to the
/// figures for the requested year.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub snapshot: StreakSnapshot,
    pub year: i32,
    #[serde(flatten)]
    pub year_totals: YearTotals,
    pub titles: TitleProgress,
}

// ============================================================================
// Freeze
// ============================================================================

/// POST /api/freeze/earn
#[derive(Debug, Serialize)]
pub struct EarnFreezeResponse {
    pub message: String,
    pub credits: i32,
    pub is_new: bool,
    pub milestone: Option<u32>,
}

/// POST /api/freeze/activate
#[derive(Debug, Deserialize)]
pub struct ActivateFreezeRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ActivateFreezeResponse {
    pub message: String,
    pub credits: i32,
    pub date: NaiveDate,
    pub is_manual: bool,
}

// ============================================================================
// Diary
// ============================================================================

/// POST /api/diary. Creates the day's entry or updates it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertDiaryRequest {
    pub date: NaiveDate,

    #[validate(length(max = 200, message = "Title max 200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,

    /// Default: "neutral"
    pub mood: Option<Mood>,

    /// Default: 5
    #[validate(range(min = 1, max = 10, message = "Mood intensity must be 1-10"))]
    pub mood_intensity: Option<i32>,

    #[validate(custom = "validate_people")]
    pub people: Option<Vec<String>>,

    #[validate(length(max = 1000, message = "Gratitude max 1000 characters"))]
    pub gratitude: Option<String>,

    #[validate(length(max = 1000, message = "Reflection max 1000 characters"))]
    pub reflection: Option<String>,
}

/// PUT /api/diary/{id}
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDiaryRequest {
    #[validate(length(max = 200, message = "Title max 200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: Option<String>,

    pub mood: Option<Mood>,

    #[validate(range(min = 1, max = 10, message = "Mood intensity must be 1-10"))]
    pub mood_intensity: Option<i32>,

    #[validate(custom = "validate_people")]
    pub people: Option<Vec<String>>,

    #[validate(length(max = 1000, message = "Gratitude max 1000 characters"))]
    pub gratitude: Option<String>,

    #[validate(length(max = 1000, message = "Reflection max 1000 characters"))]
    pub reflection: Option<String>,

    pub is_pinned: Option<bool>,
    pub is_favorite: Option<bool>,
}

/// GET /api/diary/timeline
#[derive(Debug, Serialize)]
pub struct DiaryTimelineResponse {
    pub data: Vec<DiaryEntry>,
    pub pagination: Pagination,
}

// ============================================================================
// Resources
// ============================================================================

/// POST /api/resources
#[derive(Debug, Deserialize, Validate)]
pub struct CreateResourceRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub resource_type: ResourceType,

    #[validate(length(max = 1000, message = "Description max 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 500, message = "URL max 500 characters"))]
    pub url: Option<String>,

    #[validate(length(max = 100, message = "Category max 100 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 100, message = "Subcategory max 100 characters"))]
    pub subcategory: Option<String>,

    #[validate(custom = "validate_tags")]
    pub tags: Option<Vec<String>>,

    /// Default: "medium"
    pub priority: Option<ResourcePriority>,

    /// Default: "unread"
    pub status: Option<ResourceStatus>,

    pub source_date: Option<NaiveDate>,
}

/// PUT /api/resources/{id}
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateResourceRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 1000, message = "Description max 1000 characters"))]
    pub description: Option<String>,

    pub resource_type: Option<ResourceType>,

    #[validate(length(max = 500, message = "URL max 500 characters"))]
    pub url: Option<String>,

    #[validate(length(max = 100, message = "Category max 100 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 100, message = "Subcategory max 100 characters"))]
    pub subcategory: Option<String>,

    #[validate(custom = "validate_tags")]
    pub tags: Option<Vec<String>>,

    pub priority: Option<ResourcePriority>,
    pub status: Option<ResourceStatus>,

    #[validate(range(min = 0, max = 5, message = "Rating must be 0-5"))]
    pub rating: Option<i32>,

    #[validate(length(max = 2000, message = "Notes max 2000 characters"))]
    pub notes: Option<String>,

    pub source_date: Option<NaiveDate>,
}

/// POST /api/resources/{id}/rate
#[derive(Debug, Deserialize, Validate)]
pub struct RateResourceRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub rating: i32,
}

/// GET /api/resources
#[derive(Debug, Deserialize)]
pub struct ResourcesQuery {
    pub page: Option<u32>,
    pub status: Option<ResourceStatus>,
    pub resource_type: Option<ResourceType>,
    pub priority: Option<ResourcePriority>,
    pub tag: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResourcesResponse {
    pub data: Vec<Resource>,
    pub pagination: Pagination,
}

/// POST /api/resources/{id}/toggle-pin
#[derive(Debug, Serialize)]
pub struct PinResponse {
    pub id: Uuid,
    pub is_pinned: bool,
}
