//! Resource library storage.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resource::{Resource, ResourcePriority, ResourceStatus, ResourceType};

#[derive(Debug)]
pub struct NewResource<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub resource_type: ResourceType,
    pub url: &'a str,
    pub category: &'a str,
    pub subcategory: &'a str,
    pub tags: &'a [String],
    pub priority: ResourcePriority,
    pub status: ResourceStatus,
    pub source_date: Option<NaiveDate>,
}

/// Partial update. `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ResourceChanges<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub resource_type: Option<ResourceType>,
    pub url: Option<&'a str>,
    pub category: Option<&'a str>,
    pub subcategory: Option<&'a str>,
    pub tags: Option<&'a [String]>,
    pub priority: Option<ResourcePriority>,
    pub status: Option<ResourceStatus>,
    pub rating: Option<i32>,
    pub notes: Option<&'a str>,
    pub source_date: Option<NaiveDate>,
}

/// Listing filters. Without a status, archived resources are hidden.
#[derive(Debug, Default)]
pub struct ResourceFilter<'a> {
    pub status: Option<ResourceStatus>,
    pub resource_type: Option<ResourceType>,
    pub priority: Option<ResourcePriority>,
    pub tag: Option<&'a str>,
    /// `ILIKE` pattern over title, description and tags.
    pub search: Option<&'a str>,
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    new: &NewResource<'_>,
) -> Result<Resource, sqlx::Error> {
    sqlx::query_as::<_, Resource>(
        r#"
        INSERT INTO resources (
            id, user_id, title, description, resource_type, url, category,
            subcategory, tags, priority, status, source_date
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id, title, description, resource_type, url, category, subcategory,
            tags, priority, status, rating, notes, is_pinned, source_date,
            completion_date, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(new.title)
    .bind(new.description)
    .bind(new.resource_type)
    .bind(new.url)
    .bind(new.category)
    .bind(new.subcategory)
    .bind(new.tags)
    .bind(new.priority)
    .bind(new.status)
    .bind(new.source_date)
    .fetch_one(db)
    .await
}

pub async fn find(
    db: &PgPool,
    user_id: Uuid,
    resource_id: Uuid,
) -> Result<Option<Resource>, sqlx::Error> {
    sqlx::query_as::<_, Resource>(
        r#"
        SELECT id, title, description, resource_type, url, category, subcategory,
            tags, priority, status, rating, notes, is_pinned, source_date,
            completion_date, created_at, updated_at
        FROM resources
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(resource_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Pinned first, then newest.
pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    filter: &ResourceFilter<'_>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Resource>, sqlx::Error> {
    sqlx::query_as::<_, Resource>(
        r#"
        SELECT id, title, description, resource_type, url, category, subcategory,
            tags, priority, status, rating, notes, is_pinned, source_date,
            completion_date, created_at, updated_at
        FROM resources
        WHERE user_id = $1
            AND (($2::resource_status IS NULL AND status <> 'archived') OR status = $2)
            AND ($3::resource_type IS NULL OR resource_type = $3)
            AND ($4::resource_priority IS NULL OR priority = $4)
            AND ($5::text IS NULL OR $5 = ANY(tags))
            AND ($6::text IS NULL
                OR title ILIKE $6
                OR description ILIKE $6
                OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $6))
        ORDER BY is_pinned DESC, created_at DESC
        LIMIT $7 OFFSET $8
        "#,
    )
    .bind(user_id)
    .bind(filter.status)
    .bind(filter.resource_type)
    .bind(filter.priority)
    .bind(filter.tag)
    .bind(filter.search)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn count(
    db: &PgPool,
    user_id: Uuid,
    filter: &ResourceFilter<'_>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM resources
        WHERE user_id = $1
            AND (($2::resource_status IS NULL AND status <> 'archived') OR status = $2)
            AND ($3::resource_type IS NULL OR resource_type = $3)
            AND ($4::resource_priority IS NULL OR priority = $4)
            AND ($5::text IS NULL OR $5 = ANY(tags))
            AND ($6::text IS NULL
                OR title ILIKE $6
                OR description ILIKE $6
                OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $6))
        "#,
    )
    .bind(user_id)
    .bind(filter.status)
    .bind(filter.resource_type)
    .bind(filter.priority)
    .bind(filter.tag)
    .bind(filter.search)
    .fetch_one(db)
    .await
}

/// Every resource, archived included.
pub async fn all(db: &PgPool, user_id: Uuid) -> Result<Vec<Resource>, sqlx::Error> {
    sqlx::query_as::<_, Resource>(
        r#"
        SELECT id, title, description, resource_type, url, category, subcategory,
            tags, priority, status, rating, notes, is_pinned, source_date,
            completion_date, created_at, updated_at
        FROM resources
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Moving into `completed` stamps `completion_date`; staying there keeps the
/// original stamp.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    resource_id: Uuid,
    changes: &ResourceChanges<'_>,
) -> Result<Option<Resource>, sqlx::Error> {
    sqlx::query_as::<_, Resource>(
        r#"
        UPDATE resources SET
            title = COALESCE($3, title),
            description = COALESCE($4, description),
            resource_type = COALESCE($5, resource_type),
            url = COALESCE($6, url),
            category = COALESCE($7, category),
            subcategory = COALESCE($8, subcategory),
            tags = COALESCE($9, tags),
            priority = COALESCE($10, priority),
            status = COALESCE($11, status),
            rating = COALESCE($12, rating),
            notes = COALESCE($13, notes),
            source_date = COALESCE($14, source_date),
            completion_date = CASE
                WHEN $11::resource_status = 'completed' AND status <> 'completed' THEN NOW()
                ELSE completion_date
            END,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING id, title, description, resource_type, url, category, subcategory,
            tags, priority, status, rating, notes, is_pinned, source_date,
            completion_date, created_at, updated_at
        "#,
    )
    .bind(resource_id)
    .bind(user_id)
    .bind(changes.title)
    .bind(changes.description)
    .bind(changes.resource_type)
    .bind(changes.url)
    .bind(changes.category)
    .bind(changes.subcategory)
    .bind(changes.tags)
    .bind(changes.priority)
    .bind(changes.status)
    .bind(changes.rating)
    .bind(changes.notes)
    .bind(changes.source_date)
    .fetch_optional(db)
    .await
}

/// Flips the pin and returns the new value.
pub async fn toggle_pin(
    db: &PgPool,
    user_id: Uuid,
    resource_id: Uuid,
) -> Result<Option<bool>, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        UPDATE resources SET is_pinned = NOT is_pinned, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING is_pinned
        "#,
    )
    .bind(resource_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Returns whether a resource was removed.
pub async fn delete(db: &PgPool, user_id: Uuid, resource_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM resources WHERE id = $1 AND user_id = $2")
        .bind(resource_id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}
