//! Typed history loading on top of the document store.
//!
//! Records are stored under `YYYY-MM-DD` keys. Loading parses every key,
//! skips entries that do not parse (with a warning) and returns records in
//! ascending date order, which is the order the metrics engine windows on.
//! Storage iteration order is never trusted as time order.

use crate::store::{Dataset, Document, DocumentStore};
use crate::{
    ActivityImport, CheckIn, CompetitionEvent, Dated, Goal, GrowthEntry, Result, WearableSnapshot,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

/// Storage key format for dated records
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a date-keyed document into records sorted by date
fn parse_dated<T: DeserializeOwned>(document: Document, dataset: Dataset) -> Vec<Dated<T>> {
    let mut by_date = BTreeMap::new();

    for (key, value) in document {
        let date = match NaiveDate::parse_from_str(&key, DATE_KEY_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!("Skipping {} entry with bad date key {:?}: {}", dataset.name(), key, e);
                continue;
            }
        };
        match serde_json::from_value::<T>(value) {
            Ok(record) => {
                by_date.insert(date, record);
            }
            Err(e) => {
                tracing::warn!("Skipping malformed {} entry for {}: {}", dataset.name(), key, e);
            }
        }
    }

    by_date
        .into_iter()
        .map(|(date, record)| Dated { date, record })
        .collect()
}

fn load_dated<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    dataset: Dataset,
    owner: &str,
) -> Result<Vec<Dated<T>>> {
    let document = store.get(dataset, Some(owner))?;
    let records = parse_dated(document, dataset);
    tracing::debug!(
        "Loaded {} {} records for {}",
        records.len(),
        dataset.name(),
        owner
    );
    Ok(records)
}

fn undated<T>(records: Vec<Dated<T>>) -> Vec<T> {
    records.into_iter().map(|d| d.record).collect()
}

/// Store `record` under `key`, replacing whatever was there
fn record_keyed<T: Serialize>(
    store: &mut dyn DocumentStore,
    dataset: Dataset,
    owner: &str,
    key: String,
    record: &T,
) -> Result<()> {
    let mut document = store.get(dataset, Some(owner))?;
    let replaced = document
        .insert(key.clone(), serde_json::to_value(record)?)
        .is_some();
    store.put(dataset, Some(owner), document)?;

    if replaced {
        tracing::info!("Replaced {} entry {} for {}", dataset.name(), key, owner);
    } else {
        tracing::info!("Recorded {} entry {} for {}", dataset.name(), key, owner);
    }
    Ok(())
}

// ============================================================================
// Check-ins
// ============================================================================

/// All check-ins for `owner` with their dates, oldest first
pub fn load_dated_checkins(store: &dyn DocumentStore, owner: &str) -> Result<Vec<Dated<CheckIn>>> {
    load_dated(store, Dataset::Checkins, owner)
}

/// All check-ins for `owner`, oldest first
pub fn load_checkins(store: &dyn DocumentStore, owner: &str) -> Result<Vec<CheckIn>> {
    load_dated_checkins(store, owner).map(undated)
}

/// The check-in stored for a single day, if any
pub fn checkin_on(store: &dyn DocumentStore, owner: &str, date: NaiveDate) -> Result<Option<CheckIn>> {
    Ok(load_dated_checkins(store, owner)?
        .into_iter()
        .find(|d| d.date == date)
        .map(|d| d.record))
}

/// Record a check-in; the last write for a day wins
pub fn record_checkin(
    store: &mut dyn DocumentStore,
    owner: &str,
    date: NaiveDate,
    checkin: &CheckIn,
) -> Result<()> {
    record_keyed(store, Dataset::Checkins, owner, date_key(date), checkin)
}

// ============================================================================
// Activity and growth
// ============================================================================

pub fn load_activity(store: &dyn DocumentStore, owner: &str) -> Result<Vec<ActivityImport>> {
    load_dated(store, Dataset::ActivityImports, owner).map(undated)
}

pub fn record_activity(
    store: &mut dyn DocumentStore,
    owner: &str,
    date: NaiveDate,
    activity: &ActivityImport,
) -> Result<()> {
    record_keyed(store, Dataset::ActivityImports, owner, date_key(date), activity)
}

pub fn load_dated_growth(store: &dyn DocumentStore, owner: &str) -> Result<Vec<Dated<GrowthEntry>>> {
    load_dated(store, Dataset::Growth, owner)
}

pub fn load_growth(store: &dyn DocumentStore, owner: &str) -> Result<Vec<GrowthEntry>> {
    load_dated_growth(store, owner).map(undated)
}

pub fn record_growth(
    store: &mut dyn DocumentStore,
    owner: &str,
    date: NaiveDate,
    entry: &GrowthEntry,
) -> Result<()> {
    record_keyed(store, Dataset::Growth, owner, date_key(date), entry)
}

// ============================================================================
// Competitions
// ============================================================================

/// Competitions for `owner`, sorted by date then name
///
/// Competitions are keyed by id rather than date; the date lives in the record.
pub fn load_competitions(store: &dyn DocumentStore, owner: &str) -> Result<Vec<CompetitionEvent>> {
    let document = store.get(Dataset::Competitions, Some(owner))?;
    let mut events = Vec::with_capacity(document.len());
    for (key, value) in document {
        match serde_json::from_value::<CompetitionEvent>(value) {
            Ok(event) => events.push(event),
            Err(e) => tracing::warn!("Skipping malformed competition {}: {}", key, e),
        }
    }
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
    Ok(events)
}

pub fn record_competition(
    store: &mut dyn DocumentStore,
    owner: &str,
    event: &CompetitionEvent,
) -> Result<()> {
    record_keyed(store, Dataset::Competitions, owner, event.id.to_string(), event)
}

// ============================================================================
// Goals and wearables
// ============================================================================

/// Goals for `owner`, oldest first, then by title
pub fn load_goals(store: &dyn DocumentStore, owner: &str) -> Result<Vec<Goal>> {
    let document = store.get(Dataset::Goals, Some(owner))?;
    let mut goals = Vec::with_capacity(document.len());
    for (key, value) in document {
        match serde_json::from_value::<Goal>(value) {
            Ok(goal) => goals.push(goal),
            Err(e) => tracing::warn!("Skipping malformed goal {}: {}", key, e),
        }
    }
    goals.sort_by(|a, b| {
        a.created_date
            .cmp(&b.created_date)
            .then_with(|| a.title.cmp(&b.title))
    });
    Ok(goals)
}

/// Store a goal under its id, replacing any earlier version
pub fn record_goal(store: &mut dyn DocumentStore, owner: &str, goal: &Goal) -> Result<()> {
    record_keyed(store, Dataset::Goals, owner, goal.id.to_string(), goal)
}

pub fn load_dated_wearables(
    store: &dyn DocumentStore,
    owner: &str,
) -> Result<Vec<Dated<WearableSnapshot>>> {
    load_dated(store, Dataset::Wearables, owner)
}

pub fn record_wearable(
    store: &mut dyn DocumentStore,
    owner: &str,
    date: NaiveDate,
    snapshot: &WearableSnapshot,
) -> Result<()> {
    record_keyed(store, Dataset::Wearables, owner, date_key(date), snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};
    use serde_json::json;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_KEY_FORMAT).unwrap()
    }

    fn checkin(sleep: f64) -> CheckIn {
        CheckIn {
            sleep_hours: Some(sleep),
            ..Default::default()
        }
    }

    #[test]
    fn test_checkins_sorted_by_date_not_insertion() {
        let mut store = MemoryStore::new();
        record_checkin(&mut store, "ava", date("2024-03-03"), &checkin(7.0)).unwrap();
        record_checkin(&mut store, "ava", date("2024-03-01"), &checkin(9.0)).unwrap();
        record_checkin(&mut store, "ava", date("2024-03-02"), &checkin(8.0)).unwrap();

        let history = load_checkins(&store, "ava").unwrap();
        let sleeps: Vec<_> = history.iter().map(|c| c.sleep_hours_or(0.0)).collect();
        assert_eq!(sleeps, vec![9.0, 8.0, 7.0]);
    }

    #[test]
    fn test_last_write_per_day_wins() {
        let mut store = MemoryStore::new();
        let day = date("2024-03-01");
        record_checkin(&mut store, "ava", day, &checkin(6.0)).unwrap();
        record_checkin(&mut store, "ava", day, &checkin(9.5)).unwrap();

        let history = load_checkins(&store, "ava").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sleep_hours, Some(9.5));
        assert_eq!(
            checkin_on(&store, "ava", day).unwrap().and_then(|c| c.sleep_hours),
            Some(9.5)
        );
        assert_eq!(checkin_on(&store, "ava", date("2024-03-02")).unwrap(), None);
    }

    #[test]
    fn test_bad_keys_and_records_are_skipped() {
        let mut store = MemoryStore::new();
        let document = match json!({
            "2024-03-01": { "sleep_hours": 8.0 },
            "yesterday": { "sleep_hours": 5.0 },
            "2024-03-02": { "sleep_hours": "lots" }
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        store.put(Dataset::Checkins, Some("ava"), document).unwrap();

        let history = load_dated_checkins(&store, "ava").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].date, date("2024-03-01"));
    }

    #[test]
    fn test_offset_timestamps_do_not_drop_days() {
        let mut store = MemoryStore::new();
        let document = match json!({
            "2024-03-01": { "sleep_hours": 8.0, "mood": 4, "timestamp": "2024-03-01T07:00:00Z" },
            "2024-03-02": { "sleep_hours": 6.0, "mood": 2, "timestamp": "2024-03-02T07:00:00" },
            "2024-03-03": { "sleep_hours": 7.0, "mood": 3, "timestamp": "not a time" }
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        store.put(Dataset::Checkins, Some("ava"), document).unwrap();

        let history = load_checkins(&store, "ava").unwrap();
        assert_eq!(history.len(), 3);
        assert!(history[0].timestamp.is_some());
        assert!(history[1].timestamp.is_some());
        assert_eq!(history[2].timestamp, None);
        assert_eq!(history[2].mood, Some(3));
    }

    #[test]
    fn test_goals_sorted_and_replaced_by_id() {
        let mut store = MemoryStore::new();
        let mut stretch = Goal {
            id: Uuid::new_v4(),
            title: "Stretch daily".into(),
            category: None,
            target: None,
            target_date: None,
            created_date: date("2024-03-05"),
            status: crate::GoalStatus::Active,
        };
        let sprint = Goal {
            id: Uuid::new_v4(),
            title: "Sub-14s 100m".into(),
            category: Some("speed".into()),
            target: Some("13.9s".into()),
            target_date: Some(date("2024-06-01")),
            created_date: date("2024-03-01"),
            status: crate::GoalStatus::Active,
        };
        record_goal(&mut store, "ava", &stretch).unwrap();
        record_goal(&mut store, "ava", &sprint).unwrap();

        stretch.status = crate::GoalStatus::Completed;
        record_goal(&mut store, "ava", &stretch).unwrap();

        let goals = load_goals(&store, "ava").unwrap();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].title, "Sub-14s 100m");
        assert_eq!(goals[1].status, crate::GoalStatus::Completed);
    }

    #[test]
    fn test_wearables_keyed_by_day() {
        let mut store = MemoryStore::new();
        let snapshot = WearableSnapshot {
            heart_rate_avg: Some(62),
            steps: Some(8000),
            sleep_quality: Some(81.5),
            recovery_score: Some(70.0),
        };
        record_wearable(&mut store, "ava", date("2024-03-02"), &snapshot).unwrap();
        record_wearable(&mut store, "ava", date("2024-03-01"), &WearableSnapshot::default()).unwrap();

        let wearables = load_dated_wearables(&store, "ava").unwrap();
        assert_eq!(wearables.len(), 2);
        assert_eq!(wearables[0].date, date("2024-03-01"));
        assert_eq!(wearables[1].record, snapshot);
    }

    #[test]
    fn test_activity_and_growth_roundtrip_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        let activity = ActivityImport {
            steps: Some(9000),
            active_minutes: Some(45),
            calories: Some(2100),
            source: Some("watch".into()),
            ..Default::default()
        };
        record_activity(&mut store, "leo", date("2024-04-10"), &activity).unwrap();
        record_growth(
            &mut store,
            "leo",
            date("2024-04-01"),
            &GrowthEntry {
                height: Some(141.0),
                weight: Some(33.5),
            },
        )
        .unwrap();

        let reopened = JsonFileStore::new(temp_dir.path());
        assert_eq!(load_activity(&reopened, "leo").unwrap(), vec![activity]);
        assert_eq!(load_growth(&reopened, "leo").unwrap().len(), 1);
        assert!(load_growth(&reopened, "ava").unwrap().is_empty());
    }

    #[test]
    fn test_competitions_sorted_by_date() {
        let mut store = MemoryStore::new();
        for (name, day) in [("final", "2024-06-20"), ("opener", "2024-05-01"), ("derby", "2024-05-15")] {
            let event = CompetitionEvent {
                id: Uuid::new_v4(),
                name: name.into(),
                date: date(day),
                location: None,
            };
            record_competition(&mut store, "ava", &event).unwrap();
        }

        let names: Vec<_> = load_competitions(&store, "ava")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["opener", "derby", "final"]);
    }
}
