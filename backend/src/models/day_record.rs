use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Engine input: one calendar day with at least one logged activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub log_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "log_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Study,
    Coding,
    Health,
    Personal,
    Other,
}

impl Default for LogCategory {
    fn default() -> Self {
        Self::Other
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    pub id: Uuid,
    pub log_date: NaiveDate,
    pub title: String,
    pub description: Option<String>,
    pub category: LogCategory,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayWithLogs {
    pub date: NaiveDate,
    pub logs: Vec<ActivityLog>,
}

impl DayWithLogs {
    pub fn record(&self) -> DayRecord {
        DayRecord {
            date: self.date,
            log_count: self.logs.len() as u32,
        }
    }
}

/// Groups logs by calendar day, newest day first. Within a day the input
/// order is kept.
pub fn group_by_day(logs: Vec<ActivityLog>) -> Vec<DayWithLogs> {
    let mut days: BTreeMap<NaiveDate, Vec<ActivityLog>> = BTreeMap::new();
    for log in logs {
        days.entry(log.log_date).or_default().push(log);
    }

    days.into_iter()
        .rev()
        .map(|(date, logs)| DayWithLogs { date, logs })
        .collect()
}
