//! Activity log storage. A day record is never stored on its own; it is the
//! per-date grouping of `activity_logs`, so a day with no logs does not exist.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::day_record::{ActivityLog, DayRecord, LogCategory};

pub async fn day_records(db: &PgPool, user_id: Uuid) -> Result<Vec<DayRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (NaiveDate, i64)>(
        r#"
        SELECT log_date, COUNT(*) FROM activity_logs
        WHERE user_id = $1
        GROUP BY log_date
        ORDER BY log_date ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(date, count)| DayRecord {
            date,
            log_count: count as u32,
        })
        .collect())
}

pub async fn logs_for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<ActivityLog>, sqlx::Error> {
    sqlx::query_as::<_, ActivityLog>(
        r#"
        SELECT id, log_date, title, description, category, created_at
        FROM activity_logs
        WHERE user_id = $1
        ORDER BY log_date DESC, created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn logs_on(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<ActivityLog>, sqlx::Error> {
    sqlx::query_as::<_, ActivityLog>(
        r#"
        SELECT id, log_date, title, description, category, created_at
        FROM activity_logs
        WHERE user_id = $1 AND log_date = $2
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await
}

pub async fn count_logs_on(db: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM activity_logs WHERE user_id = $1 AND log_date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(db)
    .await
}

pub async fn insert_log(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
    title: &str,
    description: Option<&str>,
    category: LogCategory,
) -> Result<ActivityLog, sqlx::Error> {
    sqlx::query_as::<_, ActivityLog>(
        r#"
        INSERT INTO activity_logs (id, user_id, log_date, title, description, category)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, log_date, title, description, category, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(date)
    .bind(title)
    .bind(description)
    .bind(category)
    .fetch_one(db)
    .await
}

/// Returns whether a log was removed.
pub async fn delete_log(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
    log_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM activity_logs WHERE id = $1 AND user_id = $2 AND log_date = $3",
    )
    .bind(log_id)
    .bind(user_id)
    .bind(date)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
