//! Daily insights for a single check-in.
//!
//! Rules fire independently and always in this order:
//! 1. Sleep deficit / excellent sleep
//! 2. Hydration shortfall
//! 3. Mood x training interaction
//! 4. Post-training protein window

use crate::{CheckIn, ProteinLevel};

const SLEEP_TARGET_HOURS: f64 = 8.0;
const EXCELLENT_SLEEP_HOURS: f64 = 10.0;
const HYDRATION_TRIGGER_BOTTLES: i32 = 6;
/// Target the shortfall is measured against; higher than the trigger above
const HYDRATION_TARGET_BOTTLES: i32 = 8;

/// Generate the textual insights for today's check-in
///
/// Missing fields read as sleep 0, water 0, mood 0, not trained and low
/// protein. Returns an empty list when no rule fires.
pub fn daily_insights(checkin: &CheckIn) -> Vec<String> {
    let mut insights = Vec::new();

    let sleep_hours = checkin.sleep_hours_or(0.0);
    if sleep_hours < SLEEP_TARGET_HOURS {
        insights.push(format!(
            "Sleep deficit: {:.1}h. Early bedtime recommended.",
            SLEEP_TARGET_HOURS - sleep_hours
        ));
    } else if sleep_hours > EXCELLENT_SLEEP_HOURS {
        insights.push("Excellent sleep! Recovery optimized.".to_string());
    }

    let water_bottles = checkin.water_bottles_or(0);
    if water_bottles < HYDRATION_TRIGGER_BOTTLES {
        insights.push(format!(
            "Hydration alert: {} more bottles needed today",
            HYDRATION_TARGET_BOTTLES - water_bottles
        ));
    }

    let mood = checkin.mood_or(0);
    let trained = checkin.trained();
    if trained && mood <= 2 {
        insights.push("Low mood + training = burnout risk. Consider active recovery.".to_string());
    } else if trained && mood >= 4 {
        insights.push("Great mindset + training = peak performance zone!".to_string());
    }

    if trained && checkin.protein() == ProteinLevel::Low {
        insights.push("Post-training protein window: consume within 30 minutes".to_string());
    }

    tracing::debug!("Generated {} daily insights", insights.len());
    insights
}
