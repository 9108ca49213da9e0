//! Window selection and the small statistics the metrics share.
//!
//! Histories are ordered most-recent-last, so a window is always a tail.

/// Window sizes used by the metrics engine
pub const SCHEDULE_WINDOW: usize = 3;
pub const WEEK_WINDOW: usize = 7;
pub const TWO_WEEK_WINDOW: usize = 14;
pub const GROWTH_WINDOW: usize = 12;
pub const MONTH_WINDOW: usize = 30;

/// The last `n` records (fewer if the history is shorter)
pub fn tail<T>(records: &[T], n: usize) -> &[T] {
    &records[records.len().saturating_sub(n)..]
}

/// Arithmetic mean, `None` for an empty window
pub fn mean<T>(records: &[T], value: impl Fn(&T) -> f64) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let total: f64 = records.iter().map(value).sum();
    Some(total / records.len() as f64)
}

/// Fraction (0..=1) of records matching `pred`, `None` for an empty window
pub fn share<T>(records: &[T], pred: impl Fn(&T) -> bool) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    Some(count(records, pred) as f64 / records.len() as f64)
}

pub fn count<T>(records: &[T], pred: impl Fn(&T) -> bool) -> usize {
    records.iter().filter(|r| pred(*r)).count()
}

/// Round to one decimal place
///
/// Rounds the exact binary value: 8.35 is stored just below 8.35 and gives 8.3.
pub fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Round to the nearest integer, ties to even
pub fn round0(value: f64) -> i64 {
    value.round_ties_even() as i64
}
