use chrono::NaiveDate;
use serde::Serialize;

/// Streak lengths that award a freeze credit. Streaks past the last entry
/// earn nothing further.
pub const MILESTONES: [u32; 10] = [7, 14, 21, 28, 35, 42, 49, 56, 63, 70];

/// Most credits a user can hold. Enforced where credits are written.
pub const MAX_FREEZE_CREDITS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MilestoneDecision {
    pub should_earn: bool,
    pub milestone: Option<u32>,
}

/// Smallest milestone reached by `current_streak` that has not been
/// credited yet.
pub fn should_earn_credit(current_streak: u32, last_earned_milestone: u32) -> MilestoneDecision {
    let milestone = MILESTONES
        .iter()
        .copied()
        .find(|&m| current_streak >= m && last_earned_milestone < m);

    MilestoneDecision {
        should_earn: milestone.is_some(),
        milestone,
    }
}

/// The stored milestone only carries over while the streak that earned it is
/// still running. It belongs to a broken streak when it lies above the current
/// streak, or when it was earned before the current streak started.
pub fn rebase_milestone(
    current_streak: u32,
    last_earned_milestone: u32,
    last_earned_on: Option<NaiveDate>,
    streak_started: Option<NaiveDate>,
) -> u32 {
    let earned_in_earlier_streak = matches!(
        (last_earned_on, streak_started),
        (Some(earned), Some(started)) if earned < started
    );

    if current_streak < last_earned_milestone || earned_in_earlier_streak {
        0
    } else {
        last_earned_milestone
    }
}
