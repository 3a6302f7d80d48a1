use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::day_record::DayRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u32,
    /// Intensity bucket 0-4.
    pub level: u8,
}

pub fn level_for(count: u32) -> u8 {
    match count {
        0 => 0,
        1 => 1,
        2..=3 => 2,
        4..=5 => 3,
        _ => 4,
    }
}

/// One cell for every calendar day of `year`, January 1st first.
pub fn heatmap(days: &[DayRecord], year: i32) -> Vec<HeatmapCell> {
    let counts: HashMap<NaiveDate, u32> = days.iter().map(|d| (d.date, d.log_count)).collect();

    let Some(start) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return Vec::new();
    };

    start
        .iter_days()
        .take_while(|d| d.year() == year)
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            HeatmapCell {
                date,
                count,
                level: level_for(count),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_every_day_of_the_year() {
        assert_eq!(heatmap(&[], 2024).len(), 366);
        assert_eq!(heatmap(&[], 2025).len(), 365);
    }

    #[test]
    fn levels_follow_log_count() {
        assert_eq!(
            [0, 1, 2, 3, 4, 5, 6, 40].map(level_for),
            [0, 1, 2, 2, 3, 3, 4, 4]
        );
    }

    #[test]
    fn counts_only_land_in_their_year() {
        let days = [
            DayRecord {
                date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                log_count: 4,
            },
            DayRecord {
                date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                log_count: 1,
            },
        ];
        let cells = heatmap(&days, 2025);

        let march_second = &cells[31 + 28 + 1];
        assert_eq!(march_second.date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!((march_second.count, march_second.level), (4, 3));
        assert_eq!(cells.iter().map(|c| c.count).sum::<u32>(), 4);
    }
}
