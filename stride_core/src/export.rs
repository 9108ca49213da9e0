//! CSV export of an athlete's check-in history.

use crate::{CheckIn, Dated, ProteinLevel, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// CSV row representation of a dated check-in
///
/// Missing values are written as empty cells.
#[derive(Debug, Serialize)]
struct CsvRow {
    date: NaiveDate,
    sleep_hours: Option<f64>,
    mood: Option<i32>,
    water_bottles: Option<i32>,
    training_completed: Option<bool>,
    homework_done: Option<bool>,
    protein_level: Option<ProteinLevel>,
}

impl From<&Dated<CheckIn>> for CsvRow {
    fn from(dated: &Dated<CheckIn>) -> Self {
        let c = &dated.record;
        Self {
            date: dated.date,
            sleep_hours: c.sleep_hours,
            mood: c.mood,
            water_bottles: c.water_bottles,
            training_completed: c.training_completed,
            homework_done: c.homework_done,
            protein_level: c.protein_level,
        }
    }
}

/// Write `history` to `csv_path`, replacing any existing file
///
/// Rows are written in the order given (oldest first when taken from the
/// history loaders). The file is synced before returning. Returns the number
/// of rows written.
pub fn export_checkins(history: &[Dated<CheckIn>], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    for dated in history {
        writer.serialize(CsvRow::from(dated))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} check-ins to {:?}", history.len(), csv_path);
    Ok(history.len())
}
