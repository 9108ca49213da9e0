//! Rolling weekly averages over imported activity data.

use crate::window::{count, mean, round0, tail, WEEK_WINDOW};
use crate::{ActivityImport, NoData};
use serde::Serialize;

pub const DAILY_STEP_GOAL: u32 = 10_000;
pub const DAILY_ACTIVE_MINUTES_GOAL: u32 = 60;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ActivityStats {
    pub avg_steps: i64,
    pub avg_active_minutes: i64,
    pub avg_calories: i64,
    pub days_tracked: usize,
    pub step_goal_met: usize,
    pub activity_goal_met: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ActivityOutcome {
    NoData(NoData),
    Stats(ActivityStats),
}

/// Average the last seven activity imports and count goal days
///
/// Missing totals read as 0.
pub fn activity_stats(history: &[ActivityImport]) -> ActivityOutcome {
    let window = tail(history, WEEK_WINDOW);
    let (Some(steps), Some(active_minutes), Some(calories)) = (
        mean(window, |a| a.steps_or_zero() as f64),
        mean(window, |a| a.active_minutes_or_zero() as f64),
        mean(window, |a| a.calories_or_zero() as f64),
    ) else {
        return ActivityOutcome::NoData(NoData::empty());
    };

    ActivityOutcome::Stats(ActivityStats {
        avg_steps: round0(steps),
        avg_active_minutes: round0(active_minutes),
        avg_calories: round0(calories),
        days_tracked: window.len(),
        step_goal_met: count(window, |a| a.steps_or_zero() >= DAILY_STEP_GOAL),
        activity_goal_met: count(window, |a| {
            a.active_minutes_or_zero() >= DAILY_ACTIVE_MINUTES_GOAL
        }),
    })
}
