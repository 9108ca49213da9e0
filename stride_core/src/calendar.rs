//! Competition calendar: what is coming up next.

use crate::CompetitionEvent;
use chrono::NaiveDate;
use serde::Serialize;

/// At most this many upcoming events are listed
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UpcomingEvent {
    #[serde(flatten)]
    pub event: CompetitionEvent,
    pub days_until: i64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Upcoming {
    pub upcoming_events: Vec<UpcomingEvent>,
}

/// Events on or after `today`, soonest first
pub fn upcoming_events(events: &[CompetitionEvent], today: NaiveDate) -> Upcoming {
    let mut upcoming: Vec<UpcomingEvent> = events
        .iter()
        .filter(|e| e.date >= today)
        .map(|e| UpcomingEvent {
            event: e.clone(),
            days_until: (e.date - today).num_days(),
        })
        .collect();
    upcoming.sort_by_key(|u| u.days_until);
    upcoming.truncate(UPCOMING_LIMIT);

    Upcoming {
        upcoming_events: upcoming,
    }
}
