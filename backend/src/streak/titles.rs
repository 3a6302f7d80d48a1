use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakTitle {
    pub days: u32,
    pub title: &'static str,
}

const fn title(days: u32, title: &'static str) -> StreakTitle {
    StreakTitle { days, title }
}

/// Ascending by `days`.
pub const STREAK_TITLES: [StreakTitle; 22] = [
    title(1, "First Commit"),
    title(3, "Warming Up"),
    title(5, "Getting Consistent"),
    title(7, "Week Warrior"),
    title(10, "Double Digits"),
    title(14, "Fortnight Focus"),
    title(21, "Habit Builder"),
    title(30, "Monthly Master"),
    title(45, "Steady Shipper"),
    title(60, "Two-Month Titan"),
    title(75, "Momentum Keeper"),
    title(90, "Quarter Champion"),
    title(100, "Centurion"),
    title(120, "Relentless"),
    title(150, "Unstoppable"),
    title(180, "Half-Year Hero"),
    title(200, "Bicentennial"),
    title(250, "Dedicated Dev"),
    title(300, "Tireless"),
    title(365, "Year-Long Legend"),
    title(500, "Elite Streaker"),
    title(1000, "Thousand-Day Sage"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TitleProgress {
    pub current: Option<StreakTitle>,
    pub next: Option<StreakTitle>,
    pub earned: usize,
    pub total: usize,
}

/// Highest title the streak has unlocked.
pub fn current_title(streak: u32) -> Option<StreakTitle> {
    STREAK_TITLES.iter().rev().find(|t| streak >= t.days).copied()
}

pub fn next_title(streak: u32) -> Option<StreakTitle> {
    STREAK_TITLES.iter().find(|t| streak < t.days).copied()
}

pub fn title_progress(streak: u32) -> TitleProgress {
    TitleProgress {
        current: current_title(streak),
        next: next_title(streak),
        earned: STREAK_TITLES.iter().filter(|t| streak >= t.days).count(),
        total: STREAK_TITLES.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strictly_ascending() {
        assert!(STREAK_TITLES.windows(2).all(|w| w[0].days < w[1].days));
    }

    #[test]
    fn no_streak_has_no_title_yet() {
        let progress = title_progress(0);
        assert_eq!(progress.current, None);
        assert_eq!(progress.next.map(|t| t.days), Some(1));
        assert_eq!(progress.earned, 0);
        assert_eq!(progress.total, 22);
    }

    #[test]
    fn exact_threshold_unlocks_the_title() {
        assert_eq!(current_title(7).map(|t| t.title), Some("Week Warrior"));
        assert_eq!(next_title(7).map(|t| t.days), Some(10));
        assert_eq!(current_title(9).map(|t| t.days), Some(7));
    }

    #[test]
    fn past_the_last_title_there_is_no_next() {
        let progress = title_progress(1200);
        assert_eq!(progress.current.map(|t| t.days), Some(1000));
        assert_eq!(progress.next, None);
        assert_eq!(progress.earned, progress.total);
    }
}
