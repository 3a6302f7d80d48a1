use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "resource_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Article,
    Video,
    Tutorial,
    Documentation,
    Tool,
    Code,
    Book,
    Course,
    Podcast,
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "resource_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourcePriority {
    High,
    Medium,
    Low,
}

impl Default for ResourcePriority {
    fn default() -> Self {
        Self::Medium
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Unread,
    Reading,
    Completed,
    Reviewed,
    Archived,
}

impl Default for ResourceStatus {
    fn default() -> Self {
        Self::Unread
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub resource_type: ResourceType,
    pub url: String,
    pub category: String,
    pub subcategory: String,
    pub tags: Vec<String>,
    pub priority: ResourcePriority,
    pub status: ResourceStatus,
    pub rating: i32,
    pub notes: String,
    pub is_pinned: bool,
    pub source_date: Option<NaiveDate>,
    pub completion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceStats {
    pub total_resources: u32,
    pub unread_count: u32,
    pub reading_count: u32,
    pub completed_count: u32,
    pub reviewed_count: u32,
    pub archived_count: u32,
    /// Over every resource, unrated ones (0) included.
    pub avg_rating: Option<f64>,
    pub by_type: BTreeMap<ResourceType, u32>,
    pub by_priority: BTreeMap<ResourcePriority, u32>,
}

/// Archived resources are counted too.
pub fn resource_stats(resources: &[Resource]) -> ResourceStats {
    let mut stats = ResourceStats {
        total_resources: resources.len() as u32,
        ..Default::default()
    };

    for resource in resources {
        let counter = match resource.status {
            ResourceStatus::Unread => &mut stats.unread_count,
            ResourceStatus::Reading => &mut stats.reading_count,
            ResourceStatus::Completed => &mut stats.completed_count,
            ResourceStatus::Reviewed => &mut stats.reviewed_count,
            ResourceStatus::Archived => &mut stats.archived_count,
        };
        *counter += 1;
        *stats.by_type.entry(resource.resource_type).or_default() += 1;
        *stats.by_priority.entry(resource.priority).or_default() += 1;
    }

    if !resources.is_empty() {
        let sum: i64 = resources.iter().map(|r| i64::from(r.rating)).sum();
        stats.avg_rating = Some(sum as f64 / resources.len() as f64);
    }

    stats
}

/// Case-insensitive substring pattern for `ILIKE`, with LIKE wildcards in the
/// query taken literally.
pub fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(kind: ResourceType, status: ResourceStatus, rating: i32) -> Resource {
        let now = Utc::now();
        Resource {
            id: Uuid::new_v4(),
            title: "Rust book".into(),
            description: String::new(),
            resource_type: kind,
            url: String::new(),
            category: String::new(),
            subcategory: String::new(),
            tags: Vec::new(),
            priority: ResourcePriority::default(),
            status,
            rating,
            notes: String::new(),
            is_pinned: false,
            source_date: None,
            completion_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn stats_count_every_status() {
        let all = [
            resource(ResourceType::Book, ResourceStatus::Completed, 5),
            resource(ResourceType::Video, ResourceStatus::Unread, 0),
            resource(ResourceType::Book, ResourceStatus::Archived, 4),
        ];
        let stats = resource_stats(&all);

        assert_eq!(stats.total_resources, 3);
        assert_eq!(stats.completed_count, 1);
        assert_eq!(stats.unread_count, 1);
        assert_eq!(stats.archived_count, 1);
        assert_eq!(stats.reading_count, 0);
        assert_eq!(stats.avg_rating, Some(3.0));
        assert_eq!(stats.by_type.get(&ResourceType::Book), Some(&2));
        assert_eq!(stats.by_priority.get(&ResourcePriority::Medium), Some(&3));
    }

    #[test]
    fn empty_library_has_no_average() {
        assert_eq!(resource_stats(&[]), ResourceStats::default());
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("tokio"), "%tokio%");
        assert_eq!(contains_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
