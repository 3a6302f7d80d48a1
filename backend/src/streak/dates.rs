use chrono::{Datelike, Duration, NaiveDate};

/// Calendar days from `earlier` to `later` (negative when reversed).
pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Number of days in the given month, or 0 for an invalid year/month pair.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.map(|n| days_between(n, first) as u32).unwrap_or(0)
}

pub fn same_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

/// Dates strictly between `start` and `end`, ascending.
pub fn dates_strictly_between(
    start: NaiveDate,
    end: NaiveDate,
) -> impl Iterator<Item = NaiveDate> {
    let gap = days_between(end, start).max(1);
    (1..gap).map(move |offset| start + Duration::days(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn days_between_crosses_year_boundary() {
        assert_eq!(days_between(d("2025-01-02"), d("2024-12-30")), 3);
        assert_eq!(days_between(d("2024-12-30"), d("2025-01-02")), -3);
    }

    #[test]
    fn iso_format_is_zero_padded() {
        assert_eq!(to_iso(d("2026-03-05")), "2026-03-05");
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 13), 0);
    }

    #[test]
    fn strictly_between_excludes_both_ends() {
        let gap: Vec<_> = dates_strictly_between(d("2025-12-30"), d("2026-01-02")).collect();
        assert_eq!(gap, vec![d("2025-12-31"), d("2026-01-01")]);

        assert_eq!(dates_strictly_between(d("2026-01-01"), d("2026-01-02")).count(), 0);
        assert_eq!(dates_strictly_between(d("2026-01-02"), d("2026-01-01")).count(), 0);
    }
}
