#![forbid(unsafe_code)]

//! Core domain model and derived metrics for Stride.
//!
//! This crate provides:
//! - Domain types (check-ins, activity imports, growth, competitions, goals,
//!   wearable snapshots)
//! - The metrics engine (insights, risk, recovery, predictability, trends,
//!   sleep, activity, growth, nutrition, schedule, calendar)
//! - Persistence (document store, date-keyed history, CSV export)
//! - Intake validation, configuration and logging
//!
//! Engine functions are pure: they take an already-ordered history slice and
//! return a serializable report. Short histories are report variants, not
//! errors.

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod window;
pub mod store;
pub mod history;
pub mod intake;
pub mod export;
pub mod insights;
pub mod risk;
pub mod recovery;
pub mod predictability;
pub mod trends;
pub mod sleep;
pub mod activity;
pub mod growth;
pub mod nutrition;
pub mod schedule;
pub mod calendar;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{Dataset, Document, DocumentStore, JsonFileStore, MemoryStore};
pub use insights::daily_insights;
pub use risk::assess_injury_risk;
pub use recovery::optimize_recovery;
pub use predictability::predictability_report;
pub use trends::performance_trends;
pub use sleep::analyze_sleep;
pub use activity::activity_stats;
pub use growth::growth_trends;
pub use nutrition::nutrition_recommendations;
pub use schedule::smart_schedule;
pub use calendar::upcoming_events;
