#![forbid(unsafe_code)]

//! Core domain model and business logic for the LiftLog workout tracker.
//!
//! This crate provides:
//! - Domain types (exercise types, entries, workouts)
//! - The on-disk store (`types.json` / `workouts.json`)
//! - Aggregation engine for the training dashboard
//! - History queries for the list views
//! - CSV export and best-effort remote sync

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod history;
pub mod engine;
pub mod export;
pub mod sync;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{find_type_by_name, resolve_type_name, seed_catalog, DELETED_TYPE_LABEL};
pub use config::Config;
pub use store::Store;
pub use history::{last_workout, list_workouts, SortOrder};
pub use engine::{
    daily_volume, detect_staple_lifts, one_rm_series, sessions_per_week, volume_by_type,
    DailyVolume, OneRmPoint, StapleLift, TypeVolume, WeeklySessions,
};
pub use export::export_csv;
pub use sync::SyncClient;
