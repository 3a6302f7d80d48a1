use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::day_record::DayRecord;
use crate::models::freeze::FreezeState;
use crate::streak::dates::{dates_strictly_between, days_between, days_in_month, same_month};

/// Largest gap (today minus last activity) that freezes may bridge.
const MAX_BRIDGE_GAP_DAYS: i64 = 7;

/// Upper bound on the backward walk, roughly two years.
const MAX_WALK_STEPS: usize = 730;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub total_logs: u32,
    pub active_days: u32,
    /// Share of the month's days with activity, 0-100.
    pub progress: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakSnapshot {
    pub total_logs: u32,
    pub total_active_days: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub freezes_used_in_current_streak: u32,
    pub monthly: MonthlySummary,
    pub liveness: Liveness,
    /// Earliest day the backward walk counted. `None` when the streak is dead
    /// or the walk hit its step bound before the streak ended.
    pub streak_started: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Liveness {
    #[default]
    Dead,
    AliveViaLog,
    AliveViaFreezeBridge,
}

/// Activity inside one calendar year, as opposed to the lifetime totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct YearTotals {
    pub year_logs: u32,
    pub year_active_days: u32,
}

/// Result of walking back from today.
struct Walk {
    streak: u32,
    freezes: u32,
    started: Option<NaiveDate>,
}

/// Which days count toward a streak. A day with logs is active even if it
/// also appears in the freeze list.
struct Coverage {
    active: HashSet<NaiveDate>,
    frozen: HashSet<NaiveDate>,
}

impl Coverage {
    fn new(days: &[&DayRecord], freeze: &FreezeState) -> Self {
        Self {
            active: days.iter().map(|d| d.date).collect(),
            frozen: freeze.used_dates.iter().copied().collect(),
        }
    }

    fn is_active(&self, date: NaiveDate) -> bool {
        self.active.contains(&date)
    }

    fn is_frozen(&self, date: NaiveDate) -> bool {
        !self.is_active(date) && self.frozen.contains(&date)
    }

    fn is_covered(&self, date: NaiveDate) -> bool {
        self.active.contains(&date) || self.frozen.contains(&date)
    }

    /// Most recent active day not after `today`.
    fn last_active(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.active.iter().copied().filter(|d| *d <= today).max()
    }
}

pub fn compute_snapshot(
    days: &[DayRecord],
    reporting_year: i32,
    freeze: &FreezeState,
    today: NaiveDate,
) -> StreakSnapshot {
    let days: Vec<&DayRecord> = days.iter().filter(|d| d.log_count > 0).collect();
    let coverage = Coverage::new(&days, freeze);

    let liveness = liveness_of(&coverage, today);
    let walk = match liveness {
        Liveness::Dead => Walk {
            streak: 0,
            freezes: 0,
            started: None,
        },
        Liveness::AliveViaLog | Liveness::AliveViaFreezeBridge => walk_back(&coverage, today),
    };

    let max_streak = longest_streak(&days, &coverage).max(walk.streak);

    StreakSnapshot {
        total_logs: days.iter().map(|d| d.log_count).sum(),
        total_active_days: days.len() as u32,
        current_streak: walk.streak,
        max_streak,
        freezes_used_in_current_streak: walk.freezes,
        monthly: monthly_summary(&days, reporting_year, today),
        liveness,
        streak_started: walk.started,
    }
}

pub fn year_totals(days: &[DayRecord], year: i32) -> YearTotals {
    days.iter()
        .filter(|d| d.log_count > 0 && d.date.year() == year)
        .fold(YearTotals::default(), |acc, d| YearTotals {
            year_logs: acc.year_logs + d.log_count,
            year_active_days: acc.year_active_days + 1,
        })
}

fn liveness_of(coverage: &Coverage, today: NaiveDate) -> Liveness {
    let Some(last_active) = coverage.last_active(today) else {
        return Liveness::Dead;
    };

    let gap = days_between(today, last_active);
    if gap <= 1 {
        return Liveness::AliveViaLog;
    }

    if gap <= MAX_BRIDGE_GAP_DAYS
        && dates_strictly_between(last_active, today).all(|d| coverage.is_covered(d))
    {
        Liveness::AliveViaFreezeBridge
    } else {
        Liveness::Dead
    }
}

/// Counts covered days backward from `today`, tolerating one uncovered day
/// at a time.
fn walk_back(coverage: &Coverage, today: NaiveDate) -> Walk {
    let mut walk = Walk {
        streak: 0,
        freezes: 0,
        started: None,
    };
    let mut earliest = None;
    let mut misses = 0;
    let mut ended = false;
    let mut day = today;

    for _ in 0..MAX_WALK_STEPS {
        if coverage.is_active(day) {
            walk.streak += 1;
            earliest = Some(day);
            misses = 0;
        } else if coverage.is_frozen(day) {
            walk.streak += 1;
            walk.freezes += 1;
            earliest = Some(day);
            misses = 0;
        } else {
            misses += 1;
            if misses > 1 {
                ended = true;
                break;
            }
        }

        match day.pred_opt() {
            Some(prev) => day = prev,
            None => {
                ended = true;
                break;
            }
        }
    }

    if ended {
        walk.started = earliest;
    }
    walk
}

/// Longest run over consecutive logged days. A gap between two logged days
/// only keeps the run going when every day inside it is frozen; the bridged
/// gap adds one to the run, not its width.
fn longest_streak(days: &[&DayRecord], coverage: &Coverage) -> u32 {
    let mut dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
    dates.sort_unstable();
    dates.dedup();

    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for date in dates {
        run = match prev {
            None => 1,
            Some(p) if days_between(date, p) == 1 => run + 1,
            Some(p) if dates_strictly_between(p, date).all(|d| coverage.frozen.contains(&d)) => {
                run + 1
            }
            Some(_) => 1,
        };
        best = best.max(run);
        prev = Some(date);
    }

    best
}

/// Current month for the current year; otherwise the month of the latest
/// record in `reporting_year`, falling back to January.
fn reporting_month(days: &[&DayRecord], reporting_year: i32, today: NaiveDate) -> (i32, u32) {
    if reporting_year == today.year() {
        return (today.year(), today.month());
    }

    days.iter()
        .map(|d| d.date)
        .filter(|d| d.year() == reporting_year)
        .max()
        .map(|d| (d.year(), d.month()))
        .unwrap_or((reporting_year, 1))
}

fn monthly_summary(days: &[&DayRecord], reporting_year: i32, today: NaiveDate) -> MonthlySummary {
    let (year, month) = reporting_month(days, reporting_year, today);

    let in_month: Vec<&&DayRecord> = days
        .iter()
        .filter(|d| same_month(d.date, year, month))
        .collect();
    let active_days = in_month.len() as u32;
    let length = days_in_month(year, month);

    let progress = if length == 0 {
        0
    } else {
        (f64::from(active_days) / f64::from(length) * 100.0)
            .round()
            .min(100.0) as u32
    };

    MonthlySummary {
        total_logs: in_month.iter().map(|d| d.log_count).sum(),
        active_days,
        progress,
        name: NaiveDate::from_ymd_opt(year, month, 1)
            .map(|d| d.format("%B").to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn day(s: &str) -> DayRecord {
        DayRecord {
            date: d(s),
            log_count: 1,
        }
    }

    /// `n` consecutive records ending on `last`.
    fn run_ending(last: &str, n: i64) -> Vec<DayRecord> {
        let last = d(last);
        (0..n)
            .rev()
            .map(|i| DayRecord {
                date: last - Duration::days(i),
                log_count: 1,
            })
            .collect()
    }

    fn frozen(dates: &[&str]) -> FreezeState {
        FreezeState {
            used_dates: dates.iter().map(|s| d(s)).collect(),
            ..Default::default()
        }
    }

    const TODAY: &str = "2026-03-15";

    fn liveness(days: &[DayRecord], freeze: &FreezeState, today: NaiveDate) -> Liveness {
        compute_snapshot(days, today.year(), freeze, today).liveness
    }

    #[test]
    fn empty_input_yields_zero_snapshot() {
        let snap = compute_snapshot(&[], 2026, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.total_logs, 0);
        assert_eq!(snap.total_active_days, 0);
        assert_eq!(snap.current_streak, 0);
        assert_eq!(snap.max_streak, 0);
        assert_eq!(snap.freezes_used_in_current_streak, 0);
        assert_eq!(snap.monthly.total_logs, 0);
        assert_eq!(snap.monthly.active_days, 0);
        assert_eq!(snap.monthly.progress, 0);
        assert_eq!(snap.monthly.name, "March");
    }

    #[test]
    fn consecutive_days_ending_today() {
        let days = run_ending(TODAY, 3);
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.current_streak, 3);
        assert_eq!(snap.max_streak, 3);
        assert_eq!(snap.freezes_used_in_current_streak, 0);
    }

    #[test]
    fn freeze_fills_single_missing_day() {
        let days = [day("2026-03-13"), day("2026-03-15")];
        let freeze = frozen(&["2026-03-14"]);
        let snap = compute_snapshot(&days, 2026, &freeze, d(TODAY));

        assert_eq!(snap.current_streak, 3);
        assert_eq!(snap.freezes_used_in_current_streak, 1);
        assert_eq!(snap.max_streak, 3);
    }

    #[test]
    fn today_without_log_keeps_streak() {
        let days = run_ending("2026-03-14", 5);
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.current_streak, 5);
        assert_eq!(snap.max_streak, 5);
    }

    #[test]
    fn single_missing_day_inside_history_is_tolerated() {
        let days = [day("2026-03-12"), day("2026-03-13"), day("2026-03-15")];
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.current_streak, 3);
        // History alone only sees a run of two; the current streak lifts it.
        assert_eq!(snap.max_streak, 3);
    }

    #[test]
    fn two_missing_days_end_the_walk() {
        let days = [day("2026-03-10"), day("2026-03-11"), day("2026-03-14"), day("2026-03-15")];
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.current_streak, 2);
        assert_eq!(snap.max_streak, 2);
    }

    #[test]
    fn stale_activity_means_dead_streak() {
        let days = run_ending("2026-03-05", 4);
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.current_streak, 0);
        assert_eq!(snap.freezes_used_in_current_streak, 0);
        assert_eq!(snap.max_streak, 4);
    }

    #[test]
    fn freezes_bridge_gap_up_to_today() {
        let days = run_ending("2026-03-12", 3);
        let freeze = frozen(&["2026-03-13", "2026-03-14"]);

        assert_eq!(liveness(&days, &freeze, d(TODAY)), Liveness::AliveViaFreezeBridge);

        let snap = compute_snapshot(&days, 2026, &freeze, d(TODAY));
        assert_eq!(snap.current_streak, 5);
        assert_eq!(snap.freezes_used_in_current_streak, 2);
    }

    #[test]
    fn partially_frozen_gap_is_dead() {
        let days = run_ending("2026-03-12", 3);
        let freeze = frozen(&["2026-03-13"]);

        assert_eq!(liveness(&days, &freeze, d(TODAY)), Liveness::Dead);
        assert_eq!(compute_snapshot(&days, 2026, &freeze, d(TODAY)).current_streak, 0);
    }

    #[test]
    fn gap_wider_than_a_week_cannot_be_bridged() {
        let days = [day("2026-03-07")];
        let freeze = frozen(&[
            "2026-03-08", "2026-03-09", "2026-03-10", "2026-03-11", "2026-03-12", "2026-03-13",
            "2026-03-14",
        ]);

        assert_eq!(liveness(&days, &freeze, d(TODAY)), Liveness::Dead);
        assert_eq!(compute_snapshot(&days, 2026, &freeze, d(TODAY)).current_streak, 0);
    }

    #[test]
    fn week_long_gap_fully_frozen_is_still_alive() {
        let days = [day("2026-03-08")];
        let freeze = frozen(&[
            "2026-03-09", "2026-03-10", "2026-03-11", "2026-03-12", "2026-03-13", "2026-03-14",
        ]);
        let snap = compute_snapshot(&days, 2026, &freeze, d(TODAY));

        assert_eq!(snap.liveness, Liveness::AliveViaFreezeBridge);
        assert_eq!(snap.current_streak, 7);
        assert_eq!(snap.freezes_used_in_current_streak, 6);
        assert_eq!(snap.streak_started, Some(d("2026-03-08")));
    }

    #[test]
    fn two_day_gap_bridged_by_one_freeze() {
        let days = [day("2026-03-12"), day("2026-03-13")];
        let freeze = frozen(&["2026-03-14"]);
        let snap = compute_snapshot(&days, 2026, &freeze, d(TODAY));

        assert_eq!(snap.liveness, Liveness::AliveViaFreezeBridge);
        assert_eq!(snap.current_streak, 3);
        assert_eq!(snap.freezes_used_in_current_streak, 1);
    }

    #[test]
    fn streak_start_is_earliest_counted_day() {
        let days = [
            day("2026-03-01"),
            day("2026-03-12"),
            day("2026-03-13"),
            day("2026-03-15"),
        ];
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.current_streak, 3);
        assert_eq!(snap.streak_started, Some(d("2026-03-12")));
    }

    #[test]
    fn dead_or_unbounded_streak_has_no_start() {
        let none = FreezeState::default();

        let stale = compute_snapshot(&run_ending("2026-03-01", 3), 2026, &none, d(TODAY));
        assert_eq!(stale.streak_started, None);

        let long = compute_snapshot(&run_ending(TODAY, 800), 2026, &none, d(TODAY));
        assert_eq!(long.streak_started, None);
    }

    #[test]
    fn year_totals_only_count_that_year() {
        let days = [
            DayRecord {
                date: d("2025-12-31"),
                log_count: 4,
            },
            DayRecord {
                date: d("2026-01-01"),
                log_count: 2,
            },
            day("2026-03-15"),
            DayRecord {
                date: d("2026-03-16"),
                log_count: 0,
            },
        ];

        assert_eq!(
            year_totals(&days, 2026),
            YearTotals {
                year_logs: 3,
                year_active_days: 2
            }
        );
        assert_eq!(year_totals(&days, 2025).year_logs, 4);
        assert_eq!(year_totals(&days, 2024), YearTotals::default());
    }

    #[test]
    fn liveness_via_log_today_or_yesterday() {
        let none = FreezeState::default();
        assert_eq!(liveness(&[day(TODAY)], &none, d(TODAY)), Liveness::AliveViaLog);
        assert_eq!(liveness(&[day("2026-03-14")], &none, d(TODAY)), Liveness::AliveViaLog);
        assert_eq!(liveness(&[], &none, d(TODAY)), Liveness::Dead);
    }

    #[test]
    fn logged_day_in_freeze_list_counts_as_active() {
        let days = run_ending(TODAY, 2);
        let freeze = frozen(&[TODAY]);
        let snap = compute_snapshot(&days, 2026, &freeze, d(TODAY));

        assert_eq!(snap.current_streak, 2);
        assert_eq!(snap.freezes_used_in_current_streak, 0);
    }

    #[test]
    fn longest_streak_bridges_frozen_gap_between_records() {
        let days = [
            day("2026-01-01"),
            day("2026-01-02"),
            day("2026-01-05"),
            day("2026-01-06"),
        ];
        let freeze = frozen(&["2026-01-03", "2026-01-04"]);
        let snap = compute_snapshot(&days, 2026, &freeze, d(TODAY));

        // 1, 2, bridged gap +1, 4
        assert_eq!(snap.max_streak, 4);
        assert_eq!(snap.current_streak, 0);
    }

    #[test]
    fn longest_streak_resets_on_unbridged_gap() {
        let mut days = run_ending("2026-01-10", 6);
        days.extend(run_ending("2026-02-03", 2));
        let snap = compute_snapshot(&days, 2026, &frozen(&["2026-01-20"]), d(TODAY));

        assert_eq!(snap.max_streak, 6);
    }

    #[test]
    fn streak_spans_year_boundary() {
        let days = run_ending("2026-01-01", 3);
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d("2026-01-01"));

        assert_eq!(snap.current_streak, 3);
        assert_eq!(snap.max_streak, 3);
        assert_eq!(snap.monthly.name, "January");
        assert_eq!(snap.monthly.active_days, 1);
        assert_eq!(snap.monthly.progress, 3);
    }

    #[test]
    fn walk_stops_at_safety_bound() {
        let days = run_ending(TODAY, 800);
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.current_streak, 730);
        assert_eq!(snap.max_streak, 800);
    }

    #[test]
    fn future_records_do_not_hide_todays_streak() {
        let mut days = run_ending(TODAY, 2);
        days.push(day("2026-04-01"));
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.current_streak, 2);
        assert_eq!(snap.total_active_days, 3);
    }

    #[test]
    fn zero_log_records_are_ignored() {
        let days = [DayRecord {
            date: d(TODAY),
            log_count: 0,
        }];
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d(TODAY));

        assert_eq!(snap, compute_snapshot(&[], 2026, &FreezeState::default(), d(TODAY)));
    }

    #[test]
    fn totals_are_lifetime_not_per_year() {
        let days = [
            DayRecord {
                date: d("2025-11-02"),
                log_count: 4,
            },
            DayRecord {
                date: d("2026-03-01"),
                log_count: 2,
            },
        ];
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.total_logs, 6);
        assert_eq!(snap.total_active_days, 2);
        assert_eq!(snap.monthly.total_logs, 2);
    }

    #[test]
    fn past_year_reports_its_last_active_month() {
        let days = [
            day("2025-03-01"),
            DayRecord {
                date: d("2025-06-10"),
                log_count: 2,
            },
            day("2025-06-20"),
        ];
        let snap = compute_snapshot(&days, 2025, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.monthly.name, "June");
        assert_eq!(snap.monthly.total_logs, 3);
        assert_eq!(snap.monthly.active_days, 2);
        assert_eq!(snap.monthly.progress, 7);
    }

    #[test]
    fn empty_past_year_reports_january() {
        let snap = compute_snapshot(&[day(TODAY)], 2024, &FreezeState::default(), d(TODAY));

        assert_eq!(snap.monthly.name, "January");
        assert_eq!(snap.monthly.active_days, 0);
        assert_eq!(snap.monthly.progress, 0);
    }

    #[test]
    fn monthly_progress_never_exceeds_hundred() {
        let mut days = run_ending("2026-03-31", 31);
        days.extend(run_ending("2026-03-31", 31));
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d("2026-03-31"));

        assert_eq!(snap.monthly.active_days, 62);
        assert_eq!(snap.monthly.progress, 100);
    }

    #[test]
    fn full_month_is_hundred_percent() {
        let days = run_ending("2026-02-28", 28);
        let snap = compute_snapshot(&days, 2026, &FreezeState::default(), d("2026-02-28"));

        assert_eq!(snap.monthly.progress, 100);
    }

    #[test]
    fn same_inputs_same_snapshot() {
        let days = [day("2026-03-01"), day("2026-03-13"), day("2026-03-15")];
        let freeze = frozen(&["2026-03-14"]);

        let first = compute_snapshot(&days, 2026, &freeze, d(TODAY));
        let second = compute_snapshot(&days, 2026, &freeze, d(TODAY));
        assert_eq!(first, second);
    }
}
