//! Predictability index: how stable the athlete's recent routine is.
//!
//! Five sub-scores, each capped at 100, are blended with fixed weights:
//!
//! | score     | basis                   | weight |
//! |-----------|-------------------------|--------|
//! | sleep     | avg sleep / 9 h         | 0.25   |
//! | nutrition | avg water / 8 bottles   | 0.25   |
//! | recovery  | avg mood / 5            | 0.20   |
//! | training  | % of days trained       | 0.15   |
//! | mental    | avg mood / 5            | 0.15   |
//!
//! Recovery and mental share the mood basis but are reported separately.

use crate::window::{mean, round1, share, tail, WEEK_WINDOW};
use crate::CheckIn;
use serde::Serialize;

const SLEEP_TARGET_HOURS: f64 = 9.0;
const HYDRATION_TARGET_BOTTLES: f64 = 8.0;
const MOOD_CEILING: f64 = 5.0;

const SLEEP_WEIGHT: f64 = 0.25;
const NUTRITION_WEIGHT: f64 = 0.25;
const RECOVERY_WEIGHT: f64 = 0.20;
const TRAINING_WEIGHT: f64 = 0.15;
const MENTAL_WEIGHT: f64 = 0.15;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoutineStatus {
    NoData,
    Optimal,
    Moderate,
    Overload,
}

impl RoutineStatus {
    pub fn classify(index: f64) -> Self {
        if index >= 80.0 {
            RoutineStatus::Optimal
        } else if index >= 60.0 {
            RoutineStatus::Moderate
        } else {
            RoutineStatus::Overload
        }
    }

    /// Colour glyph for terminal display
    pub fn indicator(&self) -> &'static str {
        match self {
            RoutineStatus::NoData => "⚪",
            RoutineStatus::Optimal => "🟢",
            RoutineStatus::Moderate => "🟡",
            RoutineStatus::Overload => "🔴",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowSleep,
    LowHydration,
    Overload,
    LowMood,
}

impl AlertKind {
    pub fn message(&self) -> &'static str {
        match self {
            AlertKind::LowSleep => "Sleep below target - injury risk increased",
            AlertKind::LowHydration => "Hydration low - performance may suffer",
            AlertKind::Overload => "High training + low sleep = overload risk",
            AlertKind::LowMood => "Mood trending low - consider rest day",
        }
    }

    /// Colour glyph for terminal display
    pub fn indicator(&self) -> &'static str {
        match self {
            AlertKind::LowSleep => "⚠️",
            AlertKind::LowHydration => "💧",
            AlertKind::Overload => "🚨",
            AlertKind::LowMood => "😟",
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SubScores {
    pub sleep: f64,
    pub nutrition: f64,
    pub recovery: f64,
    pub training: f64,
    pub mental: f64,
}

impl SubScores {
    pub fn index(&self) -> f64 {
        self.sleep * SLEEP_WEIGHT
            + self.nutrition * NUTRITION_WEIGHT
            + self.recovery * RECOVERY_WEIGHT
            + self.training * TRAINING_WEIGHT
            + self.mental * MENTAL_WEIGHT
    }

    fn rounded(&self) -> Self {
        Self {
            sleep: round1(self.sleep),
            nutrition: round1(self.nutrition),
            recovery: round1(self.recovery),
            training: round1(self.training),
            mental: round1(self.mental),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PredictabilityReport {
    pub predictability_index: f64,
    pub status: RoutineStatus,
    pub avg_sleep: f64,
    pub avg_mood: f64,
    pub training_consistency: f64,
    pub homework_completion: f64,
    pub avg_hydration: f64,
    /// Alert messages in rule order
    pub alerts: Vec<String>,
    #[serde(skip)]
    pub alert_kinds: Vec<AlertKind>,
    pub scores: SubScores,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PredictabilityOutcome {
    /// Serialized as `{"predictability_index": 0, "status": "no_data"}`
    NoData {
        predictability_index: u8,
        status: RoutineStatus,
    },
    Report(PredictabilityReport),
}

/// Compute the predictability index and alerts for the most recent week
///
/// Missing sleep, mood and water read as 0.
pub fn predictability_report(history: &[CheckIn]) -> PredictabilityOutcome {
    let window = tail(history, WEEK_WINDOW);
    if window.is_empty() {
        return PredictabilityOutcome::NoData {
            predictability_index: 0,
            status: RoutineStatus::NoData,
        };
    }

    let avg_sleep = mean(window, |c| c.sleep_hours_or(0.0)).unwrap_or(0.0);
    let avg_mood = mean(window, |c| c.mood_or(0) as f64).unwrap_or(0.0);
    let avg_hydration = mean(window, |c| c.water_bottles_or(0) as f64).unwrap_or(0.0);
    let training_consistency = share(window, CheckIn::trained).unwrap_or(0.0) * 100.0;
    let homework_completion = share(window, CheckIn::homework).unwrap_or(0.0) * 100.0;

    let mood_score = (avg_mood / MOOD_CEILING * 100.0).min(100.0);
    let scores = SubScores {
        sleep: (avg_sleep / SLEEP_TARGET_HOURS * 100.0).min(100.0),
        nutrition: (avg_hydration / HYDRATION_TARGET_BOTTLES * 100.0).min(100.0),
        recovery: mood_score,
        training: training_consistency,
        mental: mood_score,
    };
    let index = scores.index();

    let mut alert_kinds = Vec::new();
    if avg_sleep < 8.0 {
        alert_kinds.push(AlertKind::LowSleep);
    }
    if avg_hydration < 6.0 {
        alert_kinds.push(AlertKind::LowHydration);
    }
    if training_consistency > 85.0 && avg_sleep < 8.0 {
        alert_kinds.push(AlertKind::Overload);
    }
    if avg_mood < 3.0 {
        alert_kinds.push(AlertKind::LowMood);
    }

    tracing::debug!(
        "Predictability index {:.1} with {} alerts",
        index,
        alert_kinds.len()
    );

    PredictabilityOutcome::Report(PredictabilityReport {
        predictability_index: round1(index),
        status: RoutineStatus::classify(index),
        avg_sleep,
        avg_mood,
        training_consistency,
        homework_completion,
        avg_hydration,
        alerts: alert_kinds.iter().map(|k| k.message().to_string()).collect(),
        alert_kinds,
        scores: scores.rounded(),
    })
}
