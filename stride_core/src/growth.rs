//! Growth trends across the most recent measurements.

use crate::window::{tail, GROWTH_WINDOW};
use crate::GrowthEntry;
use serde::Serialize;

/// Change between the earliest and latest measurement in the window
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct GrowthTrends {
    pub height_change: f64,
    pub weight_change: f64,
    pub latest_height: f64,
    pub latest_weight: f64,
}

/// Compare the latest of the last 12 measurements against the earliest
///
/// Fewer than two measurements yields all zeros. Missing height or weight
/// reads as 0.
pub fn growth_trends(history: &[GrowthEntry]) -> GrowthTrends {
    let window = tail(history, GROWTH_WINDOW);
    match (window.first(), window.last()) {
        (Some(earliest), Some(latest)) if window.len() >= 2 => GrowthTrends {
            height_change: latest.height_or_zero() - earliest.height_or_zero(),
            weight_change: latest.weight_or_zero() - earliest.weight_or_zero(),
            latest_height: latest.height_or_zero(),
            latest_weight: latest.weight_or_zero(),
        },
        _ => GrowthTrends::default(),
    }
}
