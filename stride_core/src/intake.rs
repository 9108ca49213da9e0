//! Validation of incoming check-in, activity, goal and wearable payloads.
//!
//! Payloads arrive as raw JSON. Ranges are enforced here so the metrics
//! engine can assume well-typed records and only has to default missing
//! fields.

use crate::{
    ActivityImport, CheckIn, Error, Goal, GoalStatus, ProteinLevel, Result, WearableSnapshot,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const MAX_SLEEP_HOURS: f64 = 24.0;
pub const MOOD_RANGE: (i64, i64) = (1, 5);
pub const MAX_WATER_BOTTLES: i64 = 20;

const REQUIRED_ACTIVITY_FIELDS: [&str; 3] = ["steps", "active_minutes", "calories"];
const DEFAULT_ACTIVITY_SOURCE: &str = "phone_app";

/// Strip markup tags and surrounding whitespace from user text
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| Error::Validation("Invalid JSON".into()))
}

fn optional_bool(fields: &Map<String, Value>, key: &str) -> Result<Option<bool>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(Error::Validation(format!("Invalid {}", key.replace('_', " ")))),
    }
}

fn optional_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(sanitize_text)
        .filter(|s| !s.is_empty())
}

/// Check the ranges of an already-typed check-in
pub fn validate_checkin(checkin: &CheckIn) -> Result<()> {
    match checkin.sleep_hours {
        Some(h) if (0.0..=MAX_SLEEP_HOURS).contains(&h) => {}
        _ => return Err(Error::Validation("Invalid sleep hours".into())),
    }
    match checkin.mood {
        Some(m) if (MOOD_RANGE.0..=MOOD_RANGE.1).contains(&(m as i64)) => {}
        _ => return Err(Error::Validation("Invalid mood value".into())),
    }
    match checkin.water_bottles {
        Some(w) if (0..=MAX_WATER_BOTTLES).contains(&(w as i64)) => {}
        _ => return Err(Error::Validation("Invalid water bottles".into())),
    }
    Ok(())
}

/// Parse and validate a check-in payload, stamping it with `now`
///
/// `sleep_hours` may be any number; `mood` and `water_bottles` must be
/// integers.
pub fn parse_checkin(payload: &Value, now: NaiveDateTime) -> Result<CheckIn> {
    let fields = as_object(payload)?;

    let sleep_hours = fields.get("sleep_hours").and_then(Value::as_f64);
    let mood = fields
        .get("mood")
        .and_then(Value::as_i64)
        .and_then(|m| i32::try_from(m).ok());
    let water_bottles = fields
        .get("water_bottles")
        .and_then(Value::as_i64)
        .and_then(|w| i32::try_from(w).ok());

    let protein_level = optional_text(fields, "protein_level").map(|level| {
        serde_json::from_value::<ProteinLevel>(Value::String(level.to_lowercase()))
            .unwrap_or(ProteinLevel::Unknown)
    });

    let checkin = CheckIn {
        sleep_hours,
        mood,
        water_bottles,
        training_completed: optional_bool(fields, "training_completed")?,
        homework_done: optional_bool(fields, "homework_done")?,
        protein_level,
        athlete_name: optional_text(fields, "athlete_name"),
        timestamp: Some(now),
    };
    validate_checkin(&checkin)?;
    Ok(checkin)
}

/// Read a non-negative whole number; fractional values are truncated
fn count_field(fields: &Map<String, Value>, key: &str) -> Result<Option<u32>> {
    let Some(value) = fields.get(key) else {
        return Ok(None);
    };
    let number = value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| Error::Validation(format!("Invalid {}", key.replace('_', " "))))?;
    Ok(Some(number))
}

/// Parse and validate an activity import payload, stamping it with `now`
pub fn parse_activity(payload: &Value, now: NaiveDateTime) -> Result<ActivityImport> {
    let fields = as_object(payload)?;
    if !REQUIRED_ACTIVITY_FIELDS.iter().all(|f| fields.contains_key(*f)) {
        return Err(Error::Validation("Missing required fields".into()));
    }

    let distance = match fields.get("distance") {
        None => 0.0,
        Some(v) => v
            .as_f64()
            .filter(|d| *d >= 0.0)
            .ok_or_else(|| Error::Validation("Invalid distance".into()))?,
    };

    Ok(ActivityImport {
        steps: count_field(fields, "steps")?,
        active_minutes: count_field(fields, "active_minutes")?,
        calories: count_field(fields, "calories")?,
        distance: Some(distance),
        heart_rate_avg: Some(count_field(fields, "heart_rate_avg")?.unwrap_or(0)),
        source: Some(
            optional_text(fields, "source").unwrap_or_else(|| DEFAULT_ACTIVITY_SOURCE.to_string()),
        ),
        imported_at: Some(now),
    })
}

/// Read a non-negative real number
fn measure_field(fields: &Map<String, Value>, key: &str) -> Result<Option<f64>> {
    let Some(value) = fields.get(key) else {
        return Ok(None);
    };
    value
        .as_f64()
        .filter(|f| *f >= 0.0)
        .map(Some)
        .ok_or_else(|| Error::Validation(format!("Invalid {}", key.replace('_', " "))))
}

/// Parse a new goal created on `today`
pub fn parse_goal(payload: &Value, id: Uuid, today: NaiveDate) -> Result<Goal> {
    let fields = as_object(payload)?;
    let title = optional_text(fields, "title")
        .ok_or_else(|| Error::Validation("Missing required fields".into()))?;

    let target_date = match fields.get("target_date") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_str()
                .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
                .ok_or_else(|| Error::Validation("Invalid target date".into()))?,
        ),
    };

    Ok(Goal {
        id,
        title,
        category: optional_text(fields, "category"),
        target: optional_text(fields, "target"),
        target_date,
        created_date: today,
        status: GoalStatus::Active,
    })
}

/// Parse a wearable sync payload; fields the device omits read as 0
///
/// Returns the snapshot and the number of keys the device sent.
pub fn parse_wearable(payload: &Value) -> Result<(WearableSnapshot, usize)> {
    let fields = as_object(payload)?;
    let snapshot = WearableSnapshot {
        heart_rate_avg: Some(count_field(fields, "heart_rate_avg")?.unwrap_or(0)),
        steps: Some(count_field(fields, "steps")?.unwrap_or(0)),
        sleep_quality: Some(measure_field(fields, "sleep_quality")?.unwrap_or(0.0)),
        recovery_score: Some(measure_field(fields, "recovery_score")?.unwrap_or(0.0)),
    };
    Ok((snapshot, fields.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap()
    }

    fn validation_message(result: Result<impl std::fmt::Debug>) -> String {
        match result {
            Err(Error::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_checkin() {
        let payload = json!({
            "sleep_hours": 8.5,
            "mood": 4,
            "water_bottles": 7,
            "training_completed": true,
            "protein_level": "High",
            "athlete_name": "<b>Ava</b>"
        });
        let checkin = parse_checkin(&payload, now()).unwrap();
        assert_eq!(checkin.sleep_hours, Some(8.5));
        assert_eq!(checkin.mood, Some(4));
        assert_eq!(checkin.protein_level, Some(ProteinLevel::High));
        assert_eq!(checkin.athlete_name.as_deref(), Some("Ava"));
        assert_eq!(checkin.timestamp, Some(now()));
        assert_eq!(checkin.homework_done, None);
    }

    #[test]
    fn test_integer_sleep_accepted() {
        let payload = json!({ "sleep_hours": 9, "mood": 3, "water_bottles": 0 });
        assert_eq!(parse_checkin(&payload, now()).unwrap().sleep_hours, Some(9.0));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let cases = [
            (json!({ "sleep_hours": 25, "mood": 3, "water_bottles": 5 }), "Invalid sleep hours"),
            (json!({ "sleep_hours": -1, "mood": 3, "water_bottles": 5 }), "Invalid sleep hours"),
            (json!({ "mood": 3, "water_bottles": 5 }), "Invalid sleep hours"),
            (json!({ "sleep_hours": 8, "mood": 0, "water_bottles": 5 }), "Invalid mood value"),
            (json!({ "sleep_hours": 8, "mood": 3.5, "water_bottles": 5 }), "Invalid mood value"),
            (json!({ "sleep_hours": 8, "mood": 3, "water_bottles": 21 }), "Invalid water bottles"),
            (json!({ "sleep_hours": 8, "mood": 3, "water_bottles": "6" }), "Invalid water bottles"),
        ];
        for (payload, expected) in cases {
            assert_eq!(validation_message(parse_checkin(&payload, now())), expected);
        }
    }

    #[test]
    fn test_non_object_payload() {
        assert_eq!(validation_message(parse_checkin(&json!([1, 2]), now())), "Invalid JSON");
    }

    #[test]
    fn test_wrong_bool_type_rejected() {
        let payload = json!({ "sleep_hours": 8, "mood": 3, "water_bottles": 5, "training_completed": "yes" });
        assert_eq!(
            validation_message(parse_checkin(&payload, now())),
            "Invalid training completed"
        );
    }

    #[test]
    fn test_activity_defaults() {
        let payload = json!({ "steps": 10500, "active_minutes": 62.7, "calories": 2300 });
        let activity = parse_activity(&payload, now()).unwrap();
        assert_eq!(activity.steps, Some(10500));
        assert_eq!(activity.active_minutes, Some(62));
        assert_eq!(activity.distance, Some(0.0));
        assert_eq!(activity.heart_rate_avg, Some(0));
        assert_eq!(activity.source.as_deref(), Some("phone_app"));
    }

    #[test]
    fn test_activity_missing_fields() {
        let payload = json!({ "steps": 10500, "calories": 2300 });
        assert_eq!(
            validation_message(parse_activity(&payload, now())),
            "Missing required fields"
        );
    }

    #[test]
    fn test_activity_negative_rejected() {
        let payload = json!({ "steps": -5, "active_minutes": 10, "calories": 100 });
        assert_eq!(validation_message(parse_activity(&payload, now())), "Invalid steps");
    }

    #[test]
    fn test_goal_created_active() {
        let id = Uuid::new_v4();
        let today = now().date();
        let payload = json!({ "title": " <i>Run</i> 5k ", "target_date": "2024-06-01", "category": "endurance" });
        let goal = parse_goal(&payload, id, today).unwrap();
        assert_eq!(goal.id, id);
        assert_eq!(goal.title, "Run 5k");
        assert_eq!(goal.created_date, today);
        assert_eq!(goal.status, GoalStatus::Active);
        assert_eq!(goal.target_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(goal.category.as_deref(), Some("endurance"));
    }

    #[test]
    fn test_goal_rejections() {
        let today = now().date();
        assert_eq!(
            validation_message(parse_goal(&json!({ "title": "<b></b>" }), Uuid::new_v4(), today)),
            "Missing required fields"
        );
        assert_eq!(
            validation_message(parse_goal(
                &json!({ "title": "Swim", "target_date": "June" }),
                Uuid::new_v4(),
                today
            )),
            "Invalid target date"
        );
    }

    #[test]
    fn test_wearable_defaults_and_data_points() {
        let (snapshot, data_points) =
            parse_wearable(&json!({ "steps": 6400, "sleep_quality": 78.5, "battery": 40 })).unwrap();
        assert_eq!(data_points, 3);
        assert_eq!(snapshot.steps, Some(6400));
        assert_eq!(snapshot.heart_rate_avg, Some(0));
        assert_eq!(snapshot.sleep_quality, Some(78.5));
        assert_eq!(snapshot.recovery_score, Some(0.0));
    }

    #[test]
    fn test_wearable_negative_rejected() {
        assert_eq!(
            validation_message(parse_wearable(&json!({ "recovery_score": -3 }))),
            "Invalid recovery score"
        );
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  <script>x</script>hi "), "xhi");
        assert_eq!(sanitize_text("a < b"), "a");
        assert_eq!(sanitize_text("plain"), "plain");
    }
}
