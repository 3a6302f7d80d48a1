use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "diary_mood", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    VeryHappy,
    Happy,
    Neutral,
    Sad,
    VerySad,
    Excited,
    Stressed,
    Tired,
}

impl Default for Mood {
    fn default() -> Self {
        Self::Neutral
    }
}

/// One entry per user per day.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DiaryEntry {
    pub id: Uuid,
    pub entry_date: NaiveDate,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub mood_intensity: i32,
    pub people: Vec<String>,
    pub gratitude: String,
    pub reflection: String,
    pub is_pinned: bool,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiaryStats {
    pub total_entries: u32,
    /// `None` until there is at least one entry.
    pub avg_mood_intensity: Option<f64>,
    pub by_mood: BTreeMap<Mood, u32>,
}

pub fn diary_stats(entries: &[(Mood, i32)]) -> DiaryStats {
    let mut stats = DiaryStats {
        total_entries: entries.len() as u32,
        ..Default::default()
    };

    for (mood, _) in entries {
        *stats.by_mood.entry(*mood).or_default() += 1;
    }

    if !entries.is_empty() {
        let sum: i64 = entries.iter().map(|(_, i)| i64::from(*i)).sum();
        stats.avg_mood_intensity = Some(sum as f64 / entries.len() as f64);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_diary_has_no_average() {
        let stats = diary_stats(&[]);
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.avg_mood_intensity, None);
        assert!(stats.by_mood.is_empty());
    }

    #[test]
    fn moods_are_counted_and_intensity_averaged() {
        let stats = diary_stats(&[(Mood::Happy, 8), (Mood::Tired, 3), (Mood::Happy, 7)]);

        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.avg_mood_intensity, Some(6.0));
        assert_eq!(stats.by_mood.get(&Mood::Happy), Some(&2));
        assert_eq!(stats.by_mood.get(&Mood::Tired), Some(&1));
        assert_eq!(stats.by_mood.get(&Mood::Sad), None);
    }

    #[test]
    fn mood_uses_kebab_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&Mood::VeryHappy).unwrap(), "\"very-happy\"");
        let stats = diary_stats(&[(Mood::VerySad, 2)]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_mood"]["very-sad"], 1);
    }
}
