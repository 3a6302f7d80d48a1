use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::streak::milestone::MAX_FREEZE_CREDITS;

/// Per-user freeze bookkeeping. `Default` is the state of a user who has
/// never earned or spent a freeze.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FreezeState {
    pub credits: i32,
    pub used_dates: Vec<NaiveDate>,
    pub total_earned: i32,
    pub total_used: i32,
    pub manual_activations: i32,
    pub last_earned_milestone: i32,
    pub last_earned_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FreezeRejection {
    #[error("No freeze credits available")]
    NoCredits,
    #[error("Freeze already active on this date")]
    AlreadyFrozen,
    #[error("Cannot freeze future dates")]
    FutureDate,
    #[error("You already logged activity on this date")]
    AlreadyLogged,
}

impl FreezeState {
    pub fn can_award(&self) -> bool {
        self.credits < MAX_FREEZE_CREDITS
    }

    pub fn is_frozen(&self, date: NaiveDate) -> bool {
        self.used_dates.contains(&date)
    }

    /// Checks whether a credit may be spent on `date`, in the order the
    /// rejections are reported to the user.
    pub fn check_activation(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        logs_on_date: i64,
    ) -> Result<(), FreezeRejection> {
        if self.credits <= 0 {
            return Err(FreezeRejection::NoCredits);
        }
        if self.is_frozen(date) {
            return Err(FreezeRejection::AlreadyFrozen);
        }
        if date > today {
            return Err(FreezeRejection::FutureDate);
        }
        if logs_on_date > 0 {
            return Err(FreezeRejection::AlreadyLogged);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn with_credits(credits: i32) -> FreezeState {
        FreezeState {
            credits,
            ..Default::default()
        }
    }

    #[test]
    fn activation_requires_a_credit() {
        let state = with_credits(0);
        assert_eq!(
            state.check_activation(d("2026-01-01"), d("2026-01-02"), 0),
            Err(FreezeRejection::NoCredits)
        );
    }

    #[test]
    fn activation_rejects_already_frozen_date() {
        let state = FreezeState {
            credits: 2,
            used_dates: vec![d("2026-01-01")],
            ..Default::default()
        };
        assert_eq!(
            state.check_activation(d("2026-01-01"), d("2026-01-02"), 0),
            Err(FreezeRejection::AlreadyFrozen)
        );
    }

    #[test]
    fn activation_rejects_future_and_logged_dates() {
        let state = with_credits(1);
        assert_eq!(
            state.check_activation(d("2026-01-03"), d("2026-01-02"), 0),
            Err(FreezeRejection::FutureDate)
        );
        assert_eq!(
            state.check_activation(d("2026-01-01"), d("2026-01-02"), 3),
            Err(FreezeRejection::AlreadyLogged)
        );
    }

    #[test]
    fn activation_allows_today_and_past_unlogged_dates() {
        let state = with_credits(1);
        assert!(state.check_activation(d("2026-01-02"), d("2026-01-02"), 0).is_ok());
        assert!(state.check_activation(d("2025-12-20"), d("2026-01-02"), 0).is_ok());
    }

    #[test]
    fn award_cap_is_five() {
        assert!(with_credits(4).can_award());
        assert!(!with_credits(5).can_award());
    }
}
