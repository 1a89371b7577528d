//! Queries over the workout log for the home and list views.
//!
//! Pure helpers: they borrow the snapshot and never mutate it.

use crate::catalog::resolve_type_name;
use crate::engine::format_day;
use crate::types::{ExerciseType, Workout};
use chrono::TimeZone;

/// Sort orders for the workout list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    VolumeDesc,
    VolumeAsc,
}

/// The most recently dated workout, if any
pub fn last_workout(workouts: &[Workout]) -> Option<&Workout> {
    workouts.iter().max_by_key(|w| w.date)
}

/// Filter and sort workouts for the list view
///
/// The query matches case-insensitively against the local calendar date,
/// the notes, and the resolved exercise names of each workout.
pub fn list_workouts<'a, Tz: TimeZone>(
    workouts: &'a [Workout],
    catalog: &[ExerciseType],
    query: Option<&str>,
    order: SortOrder,
    tz: &Tz,
) -> Vec<&'a Workout> {
    let mut rows: Vec<&Workout> = match query {
        Some(q) if !q.trim().is_empty() => {
            let needle = q.trim().to_lowercase();
            workouts
                .iter()
                .filter(|w| search_text(w, catalog, tz).contains(&needle))
                .collect()
        }
        _ => workouts.iter().collect(),
    };

    match order {
        SortOrder::DateDesc => rows.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::DateAsc => rows.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOrder::VolumeDesc => rows.sort_by(|a, b| b.volume().total_cmp(&a.volume())),
        SortOrder::VolumeAsc => rows.sort_by(|a, b| a.volume().total_cmp(&b.volume())),
    }

    rows
}

fn search_text<Tz: TimeZone>(w: &Workout, catalog: &[ExerciseType], tz: &Tz) -> String {
    let mut parts = vec![format_day(w.date.with_timezone(tz).date_naive())];
    if let Some(ref notes) = w.notes {
        parts.push(notes.clone());
    }
    for e in &w.exercises {
        parts.push(resolve_type_name(catalog, e.type_id).to_string());
    }
    parts.join(" ").to_lowercase()
}
