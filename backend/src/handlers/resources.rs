use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::db::resources::{NewResource, ResourceChanges, ResourceFilter};
use crate::dto::{
    clean_list, CreateResourceRequest, MessageResponse, PageQuery, Pagination, PinResponse,
    RateResourceRequest, ResourcesQuery, ResourcesResponse, UpdateResourceRequest,
};
use crate::error::{AppError, AppResult};
use crate::models::resource::{
    contains_pattern, resource_stats, Resource, ResourceStats, ResourceStatus,
};
use crate::AppState;

const RESOURCE_PAGE_LIMIT: u32 = 50;

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim)
}

async fn paged(
    state: &AppState,
    user_id: Uuid,
    filter: &ResourceFilter<'_>,
    page: Option<u32>,
) -> AppResult<ResourcesResponse> {
    let page = page.unwrap_or(1).max(1);
    let offset = i64::from(page - 1) * i64::from(RESOURCE_PAGE_LIMIT);

    let data = db::resources::list(
        &state.db,
        user_id,
        filter,
        i64::from(RESOURCE_PAGE_LIMIT),
        offset,
    )
    .await?;
    let total = db::resources::count(&state.db, user_id, filter).await?;

    Ok(ResourcesResponse {
        data,
        pagination: Pagination::new(page, RESOURCE_PAGE_LIMIT, total as u32),
    })
}

pub async fn create_resource(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateResourceRequest>,
) -> AppResult<(StatusCode, Json<Resource>)> {
    body.validate()?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title required".into()));
    }

    let tags = body.tags.as_deref().map(clean_list).unwrap_or_default();
    let new = NewResource {
        title,
        description: trimmed(body.description.as_deref()).unwrap_or_default(),
        resource_type: body.resource_type,
        url: trimmed(body.url.as_deref()).unwrap_or_default(),
        category: trimmed(body.category.as_deref()).unwrap_or_default(),
        subcategory: trimmed(body.subcategory.as_deref()).unwrap_or_default(),
        tags: &tags,
        priority: body.priority.unwrap_or_default(),
        status: body.status.unwrap_or_default(),
        source_date: body.source_date,
    };

    let resource = db::resources::insert(&state.db, auth_user.id, &new).await?;

    tracing::debug!(user_id = %auth_user.id, resource_id = %resource.id, "Resource created");

    Ok((StatusCode::CREATED, Json(resource)))
}

pub async fn list_resources(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ResourcesQuery>,
) -> AppResult<Json<ResourcesResponse>> {
    let filter = ResourceFilter {
        status: query.status,
        resource_type: query.resource_type,
        priority: query.priority,
        tag: trimmed(query.tag.as_deref()).filter(|t| !t.is_empty()),
        search: None,
    };

    Ok(Json(paged(&state, auth_user.id, &filter, query.page).await?))
}

/// Non-archived resources whose title, description or a tag contains the
/// query, ignoring case.
pub async fn search_resources(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(query): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<ResourcesResponse>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Search query required".into()));
    }

    let pattern = contains_pattern(query);
    let filter = ResourceFilter {
        search: Some(&pattern),
        ..Default::default()
    };

    Ok(Json(paged(&state, auth_user.id, &filter, page.page).await?))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ResourceStats>> {
    let resources = db::resources::all(&state.db, auth_user.id).await?;
    Ok(Json(resource_stats(&resources)))
}

pub async fn get_resource(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(resource_id): Path<Uuid>,
) -> AppResult<Json<Resource>> {
    let resource = db::resources::find(&state.db, auth_user.id, resource_id)
        .await?
        .ok_or(AppError::NotFound("Resource not found".into()))?;

    Ok(Json(resource))
}

async fn apply_changes(
    state: &AppState,
    user_id: Uuid,
    resource_id: Uuid,
    changes: &ResourceChanges<'_>,
) -> AppResult<Resource> {
    db::resources::update(&state.db, user_id, resource_id, changes)
        .await?
        .ok_or(AppError::NotFound("Resource not found".into()))
}

pub async fn update_resource(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(resource_id): Path<Uuid>,
    Json(body): Json<UpdateResourceRequest>,
) -> AppResult<Json<Resource>> {
    body.validate()?;

    let title = trimmed(body.title.as_deref());
    if title.is_some_and(str::is_empty) {
        return Err(AppError::Validation("Title required".into()));
    }

    let tags = body.tags.as_deref().map(clean_list);
    let changes = ResourceChanges {
        title,
        description: trimmed(body.description.as_deref()),
        resource_type: body.resource_type,
        url: trimmed(body.url.as_deref()),
        category: trimmed(body.category.as_deref()),
        subcategory: trimmed(body.subcategory.as_deref()),
        tags: tags.as_deref(),
        priority: body.priority,
        status: body.status,
        rating: body.rating,
        notes: trimmed(body.notes.as_deref()),
        source_date: body.source_date,
        ..Default::default()
    };

    let resource = apply_changes(&state, auth_user.id, resource_id, &changes).await?;
    Ok(Json(resource))
}

pub async fn complete_resource(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(resource_id): Path<Uuid>,
) -> AppResult<Json<Resource>> {
    let changes = ResourceChanges {
        status: Some(ResourceStatus::Completed),
        ..Default::default()
    };

    let resource = apply_changes(&state, auth_user.id, resource_id, &changes).await?;
    tracing::debug!(user_id = %auth_user.id, resource_id = %resource_id, "Resource completed");
    Ok(Json(resource))
}

pub async fn rate_resource(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(resource_id): Path<Uuid>,
    Json(body): Json<RateResourceRequest>,
) -> AppResult<Json<Resource>> {
    body.validate()?;

    let changes = ResourceChanges {
        rating: Some(body.rating),
        ..Default::default()
    };

    let resource = apply_changes(&state, auth_user.id, resource_id, &changes).await?;
    Ok(Json(resource))
}

pub async fn toggle_pin(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(resource_id): Path<Uuid>,
) -> AppResult<Json<PinResponse>> {
    let is_pinned = db::resources::toggle_pin(&state.db, auth_user.id, resource_id)
        .await?
        .ok_or(AppError::NotFound("Resource not found".into()))?;

    Ok(Json(PinResponse {
        id: resource_id,
        is_pinned,
    }))
}

pub async fn delete_resource(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(resource_id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    if !db::resources::delete(&state.db, auth_user.id, resource_id).await? {
        return Err(AppError::NotFound("Resource not found".into()));
    }

    tracing::debug!(user_id = %auth_user.id, resource_id = %resource_id, "Resource deleted");

    Ok(Json(MessageResponse {
        message: "Resource deleted".into(),
    }))
}
