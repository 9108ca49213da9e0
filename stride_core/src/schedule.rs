//! Adaptive schedule suggestions from the last three check-ins.
//!
//! Mornings plan the afternoon session (lighter after short sleep, plus an
//! extra practice on weekends); afternoons and evenings plan the wind-down
//! (longer after low mood).

use crate::window::{mean, tail, SCHEDULE_WINDOW};
use crate::{CheckIn, Priority};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

/// Neutral values for missing fields and for an empty window
const NEUTRAL_SLEEP_HOURS: f64 = 8.0;
const NEUTRAL_MOOD: i32 = 3;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Suggestion {
    pub time: String,
    pub activity: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Suggestion {
    fn new(time: &str, activity: &str, priority: Priority) -> Self {
        Self {
            time: time.into(),
            activity: activity.into(),
            priority,
            reason: None,
        }
    }

    fn because(mut self, reason: &str) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Schedule {
    pub suggestions: Vec<Suggestion>,
}

/// Suggest today's remaining sessions
pub fn smart_schedule(history: &[CheckIn], now: NaiveDateTime) -> Schedule {
    let window = tail(history, SCHEDULE_WINDOW);
    let avg_sleep = mean(window, |c| c.sleep_hours_or(NEUTRAL_SLEEP_HOURS)).unwrap_or(NEUTRAL_SLEEP_HOURS);
    let avg_mood = mean(window, |c| c.mood_or(NEUTRAL_MOOD) as f64).unwrap_or(NEUTRAL_MOOD as f64);

    let mut suggestions = Vec::new();
    if now.hour() < 12 {
        if avg_sleep < 7.5 {
            suggestions.push(
                Suggestion::new("4:00 PM", "Light Recovery Session", Priority::High)
                    .because("Low sleep detected"),
            );
        } else {
            suggestions.push(Suggestion::new("4:30 PM", "Training Session", Priority::High));
        }

        if matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
            suggestions.push(Suggestion::new(
                "10:00 AM",
                "Extra Skills Practice",
                Priority::Medium,
            ));
        }
    } else if avg_mood < 3.0 {
        suggestions.push(
            Suggestion::new("8:00 PM", "Extended Mental Balance", Priority::High)
                .because("Mood support needed"),
        );
    } else {
        suggestions.push(Suggestion::new("8:30 PM", "Mental Balance", Priority::Medium));
    }

    Schedule { suggestions }
}
