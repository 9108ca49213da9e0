//! Injury risk scoring over the last week of check-ins.
//!
//! Score (0-100) = sleep_risk * 40 + training_load * 30 + mood_risk * 30,
//! where each component is the share of days in the window that:
//! - slept under 7 hours
//! - completed training
//! - reported mood under 3

use crate::window::{round1, share, tail, WEEK_WINDOW};
use crate::CheckIn;
use serde::Serialize;

/// Fewer check-ins than this and the risk is unknown
pub const MIN_RISK_CHECKINS: usize = 3;

const SLEEP_WEIGHT: f64 = 40.0;
const TRAINING_WEIGHT: f64 = 30.0;
const MOOD_WEIGHT: f64 = 30.0;

/// Neutral values for missing fields; neither counts as a risk day
const NEUTRAL_SLEEP_HOURS: f64 = 8.0;
const NEUTRAL_MOOD: i32 = 3;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Unknown,
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Classify a composite score; both bounds are exclusive
    pub fn classify(score: f64) -> Self {
        if score > 60.0 {
            RiskLevel::High
        } else if score > 30.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

/// Component shares scaled to percentages
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RiskFactors {
    pub sleep_issues: f64,
    pub training_load: f64,
    pub mood_concerns: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RiskAssessment {
    /// Not enough history; serialized as `{"risk_level": "unknown", "score": 0}`
    Unknown { risk_level: RiskLevel, score: u8 },
    Scored {
        risk_level: RiskLevel,
        score: f64,
        factors: RiskFactors,
    },
}

impl RiskAssessment {
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            RiskAssessment::Unknown { risk_level, .. } => *risk_level,
            RiskAssessment::Scored { risk_level, .. } => *risk_level,
        }
    }
}

/// Assess injury risk from the most recent week of check-ins
pub fn assess_injury_risk(history: &[CheckIn]) -> RiskAssessment {
    let window = tail(history, WEEK_WINDOW);
    if window.len() < MIN_RISK_CHECKINS {
        tracing::debug!(
            "Only {} check-ins available, risk unknown",
            window.len()
        );
        return RiskAssessment::Unknown {
            risk_level: RiskLevel::Unknown,
            score: 0,
        };
    }

    let sleep_risk = share(window, |c| c.sleep_hours_or(NEUTRAL_SLEEP_HOURS) < 7.0).unwrap_or(0.0);
    let training_load = share(window, CheckIn::trained).unwrap_or(0.0);
    let mood_risk = share(window, |c| c.mood_or(NEUTRAL_MOOD) < 3).unwrap_or(0.0);

    let score =
        sleep_risk * SLEEP_WEIGHT + training_load * TRAINING_WEIGHT + mood_risk * MOOD_WEIGHT;

    RiskAssessment::Scored {
        risk_level: RiskLevel::classify(score),
        score: round1(score),
        factors: RiskFactors {
            sleep_issues: round1(sleep_risk * 100.0),
            training_load: round1(training_load * 100.0),
            mood_concerns: round1(mood_risk * 100.0),
        },
    }
}
