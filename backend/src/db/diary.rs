//! Diary storage. `(user_id, entry_date)` is unique, so writing a day that
//! already has an entry updates it in place.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::diary::{DiaryEntry, Mood};

/// Fields a write may carry. `None` keeps the stored value, or the column
/// default for a new entry.
#[derive(Debug, Default)]
pub struct DiaryFields<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub mood: Option<Mood>,
    pub mood_intensity: Option<i32>,
    pub people: Option<&'a [String]>,
    pub gratitude: Option<&'a str>,
    pub reflection: Option<&'a str>,
    pub is_pinned: Option<bool>,
    pub is_favorite: Option<bool>,
}

pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
    content: &str,
    fields: &DiaryFields<'_>,
) -> Result<DiaryEntry, sqlx::Error> {
    sqlx::query_as::<_, DiaryEntry>(
        r#"
        INSERT INTO diary_entries (
            id, user_id, entry_date, title, content, mood, mood_intensity,
            people, gratitude, reflection
        )
        VALUES (
            $1, $2, $3, COALESCE($4, ''), $5, COALESCE($6, 'neutral'::diary_mood),
            COALESCE($7, 5), COALESCE($8, '{}'::text[]), COALESCE($9, ''), COALESCE($10, '')
        )
        ON CONFLICT (user_id, entry_date) DO UPDATE SET
            title = COALESCE($4, diary_entries.title),
            content = EXCLUDED.content,
            mood = COALESCE($6, diary_entries.mood),
            mood_intensity = COALESCE($7, diary_entries.mood_intensity),
            people = COALESCE($8, diary_entries.people),
            gratitude = COALESCE($9, diary_entries.gratitude),
            reflection = COALESCE($10, diary_entries.reflection),
            updated_at = NOW()
        RETURNING id, entry_date, title, content, mood, mood_intensity, people,
            gratitude, reflection, is_pinned, is_favorite, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(date)
    .bind(fields.title)
    .bind(content)
    .bind(fields.mood)
    .bind(fields.mood_intensity)
    .bind(fields.people)
    .bind(fields.gratitude)
    .bind(fields.reflection)
    .fetch_one(db)
    .await
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    entry_id: Uuid,
    fields: &DiaryFields<'_>,
) -> Result<Option<DiaryEntry>, sqlx::Error> {
    sqlx::query_as::<_, DiaryEntry>(
        r#"
        UPDATE diary_entries SET
            title = COALESCE($3, title),
            content = COALESCE($4, content),
            mood = COALESCE($5, mood),
            mood_intensity = COALESCE($6, mood_intensity),
            people = COALESCE($7, people),
            gratitude = COALESCE($8, gratitude),
            reflection = COALESCE($9, reflection),
            is_pinned = COALESCE($10, is_pinned),
            is_favorite = COALESCE($11, is_favorite),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING id, entry_date, title, content, mood, mood_intensity, people,
            gratitude, reflection, is_pinned, is_favorite, created_at, updated_at
        "#,
    )
    .bind(entry_id)
    .bind(user_id)
    .bind(fields.title)
    .bind(fields.content)
    .bind(fields.mood)
    .bind(fields.mood_intensity)
    .bind(fields.people)
    .bind(fields.gratitude)
    .bind(fields.reflection)
    .bind(fields.is_pinned)
    .bind(fields.is_favorite)
    .fetch_optional(db)
    .await
}

pub async fn on_date(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<Option<DiaryEntry>, sqlx::Error> {
    sqlx::query_as::<_, DiaryEntry>(
        r#"
        SELECT id, entry_date, title, content, mood, mood_intensity, people,
            gratitude, reflection, is_pinned, is_favorite, created_at, updated_at
        FROM diary_entries
        WHERE user_id = $1 AND entry_date = $2
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(db)
    .await
}

/// Entries dated in `[from, until)`, newest first.
pub async fn between(
    db: &PgPool,
    user_id: Uuid,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<DiaryEntry>, sqlx::Error> {
    sqlx::query_as::<_, DiaryEntry>(
        r#"
        SELECT id, entry_date, title, content, mood, mood_intensity, people,
            gratitude, reflection, is_pinned, is_favorite, created_at, updated_at
        FROM diary_entries
        WHERE user_id = $1 AND entry_date >= $2 AND entry_date < $3
        ORDER BY entry_date DESC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(until)
    .fetch_all(db)
    .await
}

pub async fn page(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<DiaryEntry>, sqlx::Error> {
    sqlx::query_as::<_, DiaryEntry>(
        r#"
        SELECT id, entry_date, title, content, mood, mood_intensity, people,
            gratitude, reflection, is_pinned, is_favorite, created_at, updated_at
        FROM diary_entries
        WHERE user_id = $1
        ORDER BY entry_date DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn count(db: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM diary_entries WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await
}

/// Entries from any year that fall on `month`/`day`.
pub async fn on_this_day(
    db: &PgPool,
    user_id: Uuid,
    month: u32,
    day: u32,
) -> Result<Vec<DiaryEntry>, sqlx::Error> {
    sqlx::query_as::<_, DiaryEntry>(
        r#"
        SELECT id, entry_date, title, content, mood, mood_intensity, people,
            gratitude, reflection, is_pinned, is_favorite, created_at, updated_at
        FROM diary_entries
        WHERE user_id = $1
            AND EXTRACT(MONTH FROM entry_date)::int = $2
            AND EXTRACT(DAY FROM entry_date)::int = $3
        ORDER BY entry_date DESC
        "#,
    )
    .bind(user_id)
    .bind(month as i32)
    .bind(day as i32)
    .fetch_all(db)
    .await
}

pub async fn moods(db: &PgPool, user_id: Uuid) -> Result<Vec<(Mood, i32)>, sqlx::Error> {
    sqlx::query_as::<_, (Mood, i32)>(
        "SELECT mood, mood_intensity FROM diary_entries WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Returns whether an entry was removed.
pub async fn delete(db: &PgPool, user_id: Uuid, entry_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM diary_entries WHERE id = $1 AND user_id = $2")
        .bind(entry_id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}
