//! Core domain types for Stride.
//!
//! This module defines the records the metrics engine consumes:
//! - Daily check-ins (sleep, mood, hydration, training)
//! - Activity imports from phones and wearables
//! - Growth measurements, competition events, goals and wearable snapshots
//! - Shared report vocabulary (data status, priorities)
//!
//! Stored records keep every measured field optional. Missing values are
//! resolved through the accessor methods below, each taking the neutral value
//! the calling metric wants, instead of reaching into raw JSON.
//!
//! Metadata fields deserialize leniently: a malformed timestamp or label reads
//! as absent so the record's measurements are still counted.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// Lenient metadata
// ============================================================================

/// Parse an RFC 3339 or naive ISO 8601 timestamp
///
/// Offset timestamps keep their wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok())
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

// ============================================================================
// Check-ins
// ============================================================================

/// Self-reported protein intake for the day
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProteinLevel {
    #[default]
    Low,
    Medium,
    High,
    /// Anything the client sent that we do not recognise
    #[serde(other)]
    Unknown,
}

/// One athlete's daily check-in
///
/// Stored under its `YYYY-MM-DD` key; a second check-in on the same day
/// replaces the first.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CheckIn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_bottles: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homework_done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub protein_level: Option<ProteinLevel>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub athlete_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
}

impl CheckIn {
    pub fn sleep_hours_or(&self, default: f64) -> f64 {
        self.sleep_hours.unwrap_or(default)
    }

    pub fn mood_or(&self, default: i32) -> i32 {
        self.mood.unwrap_or(default)
    }

    pub fn water_bottles_or(&self, default: i32) -> i32 {
        self.water_bottles.unwrap_or(default)
    }

    /// Missing counts as not trained
    pub fn trained(&self) -> bool {
        self.training_completed.unwrap_or(false)
    }

    /// Missing counts as not done
    pub fn homework(&self) -> bool {
        self.homework_done.unwrap_or(false)
    }

    /// Missing counts as low protein
    pub fn protein(&self) -> ProteinLevel {
        self.protein_level.unwrap_or_default()
    }
}

// ============================================================================
// Activity, growth and competitions
// ============================================================================

/// Daily activity totals imported from a phone app or wearable
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActivityImport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate_avg: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_timestamp")]
    pub imported_at: Option<NaiveDateTime>,
}

impl ActivityImport {
    pub fn steps_or_zero(&self) -> u32 {
        self.steps.unwrap_or(0)
    }

    pub fn active_minutes_or_zero(&self) -> u32 {
        self.active_minutes.unwrap_or(0)
    }

    pub fn calories_or_zero(&self) -> u32 {
        self.calories.unwrap_or(0)
    }
}

/// A height/weight measurement
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrowthEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl GrowthEntry {
    pub fn height_or_zero(&self) -> f64 {
        self.height.unwrap_or(0.0)
    }

    pub fn weight_or_zero(&self) -> f64 {
        self.weight.unwrap_or(0.0)
    }
}

/// A scheduled competition
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompetitionEvent {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Where a goal stands
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
}

/// A personal goal set by an athlete or parent
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    pub created_date: NaiveDate,
    #[serde(default)]
    pub status: GoalStatus,
}

/// Daily summary pushed by a wearable device
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WearableSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate_avg: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_score: Option<f64>,
}

/// A record together with the calendar day it is stored under
#[derive(Clone, Debug, PartialEq)]
pub struct Dated<T> {
    pub date: NaiveDate,
    pub record: T,
}

// ============================================================================
// Report vocabulary
// ============================================================================

/// Marker for reports computed from a window below the required size
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    NoData,
    InsufficientData,
}

/// Report returned when the window is too short to compute anything
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct NoData {
    pub status: DataStatus,
}

impl NoData {
    pub fn empty() -> Self {
        Self {
            status: DataStatus::NoData,
        }
    }

    pub fn insufficient() -> Self {
        Self {
            status: DataStatus::InsufficientData,
        }
    }
}

/// Urgency attached to a recommendation or suggestion
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_resolve_to_requested_defaults() {
        let checkin: CheckIn = serde_json::from_str("{}").unwrap();
        assert_eq!(checkin.sleep_hours_or(8.0), 8.0);
        assert_eq!(checkin.sleep_hours_or(0.0), 0.0);
        assert_eq!(checkin.mood_or(3), 3);
        assert_eq!(checkin.water_bottles_or(0), 0);
        assert!(!checkin.trained());
        assert!(!checkin.homework());
        assert_eq!(checkin.protein(), ProteinLevel::Low);
    }

    #[test]
    fn test_checkin_tolerates_extra_and_unknown_values() {
        let json = r#"{
            "sleep_hours": 7.5,
            "mood": 4,
            "water_bottles": 6,
            "training_completed": true,
            "protein_level": "extreme",
            "user_id": "abc",
            "timestamp": "2024-03-02T07:15:00.123456"
        }"#;
        let checkin: CheckIn = serde_json::from_str(json).unwrap();
        assert_eq!(checkin.sleep_hours, Some(7.5));
        assert_eq!(checkin.protein(), ProteinLevel::Unknown);
        assert!(checkin.timestamp.is_some());
    }

    #[test]
    fn test_offset_timestamp_keeps_wall_clock() {
        let checkin: CheckIn =
            serde_json::from_str(r#"{ "sleep_hours": 8, "timestamp": "2024-03-01T07:00:00+02:00" }"#)
                .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        assert_eq!(checkin.timestamp, Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T07:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 07:00:00"), Some(expected));
    }

    #[test]
    fn test_malformed_metadata_reads_as_absent() {
        let checkin: CheckIn = serde_json::from_str(
            r#"{ "sleep_hours": 6.5, "mood": 2, "timestamp": "last tuesday",
                 "athlete_name": 42, "protein_level": 3 }"#,
        )
        .unwrap();
        assert_eq!(checkin.sleep_hours, Some(6.5));
        assert_eq!(checkin.mood, Some(2));
        assert_eq!(checkin.timestamp, None);
        assert_eq!(checkin.athlete_name, None);
        assert_eq!(checkin.protein_level, None);

        let activity: ActivityImport =
            serde_json::from_str(r#"{ "steps": 900, "imported_at": 17, "source": ["x"] }"#).unwrap();
        assert_eq!(activity.steps, Some(900));
        assert_eq!(activity.imported_at, None);
        assert_eq!(activity.source, None);
    }

    #[test]
    fn test_goal_status_defaults_to_active() {
        let goal: Goal = serde_json::from_str(
            r#"{ "id": "6f1c2c53-8f0b-4d55-9b53-3d2d2f6b7a10", "title": "Run 5k",
                 "created_date": "2024-03-01" }"#,
        )
        .unwrap();
        assert_eq!(goal.status, GoalStatus::Active);
        assert_eq!(goal.target_date, None);
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let checkin = CheckIn {
            mood: Some(2),
            ..Default::default()
        };
        let value = serde_json::to_value(&checkin).unwrap();
        assert_eq!(value, serde_json::json!({ "mood": 2 }));
    }

    #[test]
    fn test_no_data_serializes_status_tag() {
        let value = serde_json::to_value(NoData::insufficient()).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "insufficient_data" }));
    }
}
