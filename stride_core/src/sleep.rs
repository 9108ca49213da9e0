//! Sleep analysis over the last month of check-ins.

use crate::window::{count, mean, round1, tail, MONTH_WINDOW};
use crate::{CheckIn, NoData};
use serde::Serialize;

/// Nights at or above this count as optimal
const OPTIMAL_SLEEP_HOURS: f64 = 8.0;
/// Range of nightly sleep (hours) that maps to zero consistency
const CONSISTENCY_RANGE_HOURS: f64 = 12.0;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SleepReport {
    pub average_sleep: f64,
    /// Percentage; negative when the nightly range exceeds 12 hours
    pub consistency_score: f64,
    pub optimal_sleep_days: usize,
    /// Average mood on optimal-sleep nights
    pub mood_correlation: f64,
    pub recommendations: [String; 2],
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SleepOutcome {
    NoData(NoData),
    Report(SleepReport),
}

/// `1 - (max - min) / 12` as a fraction; not clamped, 0 for an empty window
pub fn sleep_consistency(window: &[CheckIn]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let (min, max) = window
        .iter()
        .map(|c| c.sleep_hours_or(0.0))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), h| {
            (lo.min(h), hi.max(h))
        });
    1.0 - (max - min) / CONSISTENCY_RANGE_HOURS
}

/// Analyze sleep duration, consistency and its link to mood
///
/// Missing sleep and mood read as 0.
pub fn analyze_sleep(history: &[CheckIn]) -> SleepOutcome {
    let window = tail(history, MONTH_WINDOW);
    let Some(avg_sleep) = mean(window, |c| c.sleep_hours_or(0.0)) else {
        return SleepOutcome::NoData(NoData::empty());
    };

    let consistency = sleep_consistency(window);
    let well_slept: Vec<&CheckIn> = window
        .iter()
        .filter(|c| c.sleep_hours_or(0.0) >= OPTIMAL_SLEEP_HOURS)
        .collect();
    let mood_correlation = mean(&well_slept[..], |c| c.mood_or(0) as f64).unwrap_or(0.0);

    let duration_advice = if avg_sleep < 8.5 {
        "Target 9 hours nightly"
    } else {
        "Excellent sleep duration"
    };
    let routine_advice = if consistency < 0.8 {
        "Improve consistency"
    } else {
        "Great sleep routine"
    };

    SleepOutcome::Report(SleepReport {
        average_sleep: round1(avg_sleep),
        consistency_score: round1(consistency * 100.0),
        optimal_sleep_days: count(window, |c| c.sleep_hours_or(0.0) >= OPTIMAL_SLEEP_HOURS),
        mood_correlation: round1(mood_correlation),
        recommendations: [duration_advice.to_string(), routine_advice.to_string()],
    })
}
