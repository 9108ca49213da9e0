//! Recovery optimizer.
//!
//! Scores the last week of check-ins and suggests what to change next.

use crate::window::{count, mean, round1, tail, WEEK_WINDOW};
use crate::{CheckIn, NoData, Priority};
use serde::Serialize;

const MAINTAIN_ACTION: &str = "Maintain current routine";

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryFocus {
    Sleep,
    Mental,
    Training,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RecoveryRecommendation {
    #[serde(rename = "type")]
    pub focus: RecoveryFocus,
    pub priority: Priority,
    pub action: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RecoveryReport {
    pub recovery_score: f64,
    pub sleep_quality: f64,
    pub mental_state: f64,
    pub training_load: usize,
    pub recommendations: Vec<RecoveryRecommendation>,
    pub next_action: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RecoveryOutcome {
    NoData(NoData),
    Report(RecoveryReport),
}

/// Recovery score from weekly averages and the number of training days
///
/// Capped at 100 but deliberately not floored: a training load above 7 drives
/// the last term negative and the score with it.
pub fn recovery_score(avg_sleep: f64, avg_mood: f64, training_load: usize) -> f64 {
    let sleep_term = avg_sleep / 9.0 * 40.0;
    let mood_term = avg_mood / 5.0 * 35.0;
    let load_term = (7.0 - training_load as f64) / 7.0 * 25.0;
    (sleep_term + mood_term + load_term).min(100.0)
}

/// Build the recovery report for the most recent week
///
/// Missing sleep and mood read as 0.
pub fn optimize_recovery(history: &[CheckIn]) -> RecoveryOutcome {
    let window = tail(history, WEEK_WINDOW);
    let (Some(avg_sleep), Some(avg_mood)) = (
        mean(window, |c| c.sleep_hours_or(0.0)),
        mean(window, |c| c.mood_or(0) as f64),
    ) else {
        return RecoveryOutcome::NoData(NoData::empty());
    };
    let training_load = count(window, CheckIn::trained);

    let mut recommendations = Vec::new();
    if avg_sleep < 8.0 {
        recommendations.push(RecoveryRecommendation {
            focus: RecoveryFocus::Sleep,
            priority: Priority::High,
            action: "Increase sleep by 30-60 minutes".into(),
        });
    }
    if avg_mood < 3.5 {
        recommendations.push(RecoveryRecommendation {
            focus: RecoveryFocus::Mental,
            priority: Priority::Medium,
            action: "Add meditation or relaxation time".into(),
        });
    }
    if training_load > 5 {
        recommendations.push(RecoveryRecommendation {
            focus: RecoveryFocus::Training,
            priority: Priority::High,
            action: "Schedule active recovery day".into(),
        });
    }

    let next_action = recommendations
        .first()
        .map(|r| r.action.clone())
        .unwrap_or_else(|| MAINTAIN_ACTION.to_string());

    RecoveryOutcome::Report(RecoveryReport {
        recovery_score: round1(recovery_score(avg_sleep, avg_mood, training_load)),
        sleep_quality: round1(avg_sleep),
        mental_state: round1(avg_mood),
        training_load,
        recommendations,
        next_action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn checkin(sleep: f64, mood: i32, trained: bool) -> CheckIn {
        CheckIn {
            sleep_hours: Some(sleep),
            mood: Some(mood),
            training_completed: Some(trained),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_history_is_no_data() {
        let outcome = optimize_recovery(&[]);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({ "status": "no_data" })
        );
    }

    #[test]
    fn test_well_rested_week_maintains() {
        let history = vec![checkin(9.0, 5, false); 7];
        let RecoveryOutcome::Report(report) = optimize_recovery(&history) else {
            panic!("expected a report");
        };
        assert_eq!(report.recovery_score, 100.0);
        assert!(report.recommendations.is_empty());
        assert_eq!(report.next_action, "Maintain current routine");
    }

    #[test]
    fn test_recommendations_in_fixed_order() {
        let history = vec![checkin(6.0, 2, true); 7];
        let RecoveryOutcome::Report(report) = optimize_recovery(&history) else {
            panic!("expected a report");
        };
        let kinds: Vec<_> = report.recommendations.iter().map(|r| r.focus).collect();
        assert_eq!(
            kinds,
            vec![
                RecoveryFocus::Sleep,
                RecoveryFocus::Mental,
                RecoveryFocus::Training
            ]
        );
        assert_eq!(report.next_action, "Increase sleep by 30-60 minutes");
        assert_eq!(report.training_load, 7);
        // 6/9*40 + 2/5*35 + 0 = 40.67
        assert_eq!(report.recovery_score, 40.7);
    }

    #[test]
    fn test_report_shape() {
        let history = vec![
            checkin(8.0, 4, true),
            checkin(9.0, 3, false),
            checkin(8.5, 4, true),
        ];
        let outcome = optimize_recovery(&history);
        // avg sleep 8.5, avg mood 3.667, load 2
        // 8.5/9*40 + 3.667/5*35 + 5/7*25 = 37.78 + 25.67 + 17.86 = 81.3
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "recovery_score": 81.3,
                "sleep_quality": 8.5,
                "mental_state": 3.7,
                "training_load": 2,
                "recommendations": [],
                "next_action": "Maintain current routine"
            })
        );
    }

    #[test]
    fn test_recommendation_serializes_type_field() {
        let history = vec![checkin(9.0, 2, false); 3];
        let outcome = optimize_recovery(&history);
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value["recommendations"],
            json!([{
                "type": "mental",
                "priority": "medium",
                "action": "Add meditation or relaxation time"
            }])
        );
    }

    #[test]
    fn test_score_has_no_lower_clamp() {
        let score = recovery_score(0.0, 0.0, 10);
        assert!(score < 0.0);
        assert_eq!(round1(score), -10.7);
    }

    #[test]
    fn test_score_capped_at_100() {
        assert_eq!(recovery_score(12.0, 5.0, 0), 100.0);
    }
}
