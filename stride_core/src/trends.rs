//! Two-window performance trends.
//!
//! The last 14 check-ins split into week1 (the first 7) and week2 (the rest).
//! A metric is improving only when week2 is strictly higher; a tie counts as
//! declining.

use crate::window::{mean, share, tail, TWO_WEEK_WINDOW, WEEK_WINDOW};
use crate::{CheckIn, NoData};
use serde::Serialize;

/// Improving metrics needed for an overall positive direction
const POSITIVE_THRESHOLD: usize = 3;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeekStats {
    pub avg_sleep: f64,
    pub avg_mood: f64,
    /// Percentage of days trained
    pub training_rate: f64,
    /// Average water bottles
    pub hydration: f64,
}

impl WeekStats {
    /// `None` for an empty week
    pub fn from_window(week: &[CheckIn]) -> Option<Self> {
        Some(Self {
            avg_sleep: mean(week, |c| c.sleep_hours_or(0.0))?,
            avg_mood: mean(week, |c| c.mood_or(0) as f64)?,
            training_rate: share(week, CheckIn::trained)? * 100.0,
            hydration: mean(week, |c| c.water_bottles_or(0) as f64)?,
        })
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
}

impl Trend {
    pub fn between(before: f64, after: f64) -> Self {
        if after > before {
            Trend::Improving
        } else {
            Trend::Declining
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Trends {
    pub sleep_trend: Trend,
    pub mood_trend: Trend,
    pub training_trend: Trend,
    pub hydration_trend: Trend,
}

impl Trends {
    fn improving(&self) -> usize {
        [
            self.sleep_trend,
            self.mood_trend,
            self.training_trend,
            self.hydration_trend,
        ]
        .iter()
        .filter(|t| **t == Trend::Improving)
        .count()
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    NeedsAttention,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TrendReport {
    pub week1: WeekStats,
    pub week2: WeekStats,
    pub trends: Trends,
    pub overall_direction: Direction,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum TrendOutcome {
    Insufficient(NoData),
    Report(TrendReport),
}

/// Compare the two most recent weeks of check-ins
///
/// Needs a full first week and at least one check-in after it; anything
/// shorter is reported as insufficient data.
pub fn performance_trends(history: &[CheckIn]) -> TrendOutcome {
    let window = tail(history, TWO_WEEK_WINDOW);
    if window.len() < WEEK_WINDOW {
        return TrendOutcome::Insufficient(NoData::insufficient());
    }

    let (first, second) = window.split_at(WEEK_WINDOW);
    let (Some(week1), Some(week2)) = (WeekStats::from_window(first), WeekStats::from_window(second))
    else {
        tracing::debug!("Second week is empty, trends need at least one more check-in");
        return TrendOutcome::Insufficient(NoData::insufficient());
    };

    let trends = Trends {
        sleep_trend: Trend::between(week1.avg_sleep, week2.avg_sleep),
        mood_trend: Trend::between(week1.avg_mood, week2.avg_mood),
        training_trend: Trend::between(week1.training_rate, week2.training_rate),
        hydration_trend: Trend::between(week1.hydration, week2.hydration),
    };
    let overall_direction = if trends.improving() >= POSITIVE_THRESHOLD {
        Direction::Positive
    } else {
        Direction::NeedsAttention
    };

    TrendOutcome::Report(TrendReport {
        week1,
        week2,
        trends,
        overall_direction,
    })
}
