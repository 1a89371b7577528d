//! CSV export of the workout log.
//!
//! Flattens the log to one row per exercise entry, chronologically, with
//! type references resolved to display names.

use crate::catalog::resolve_type_name;
use crate::types::{ExerciseType, Workout};
use crate::Result;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    workout_id: String,
    date: String,
    notes: Option<String>,
    exercise: String,
    weight: f64,
    reps: u32,
    sets: u32,
    volume: f64,
}

/// Write the full log as CSV, returning the number of rows written
///
/// The file is replaced wholesale (the export is a snapshot, not a
/// journal) and synced to disk before returning.
pub fn export_csv(workouts: &[Workout], catalog: &[ExerciseType], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut ordered: Vec<&Workout> = workouts.iter().collect();
    ordered.sort_by_key(|w| w.date);

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let mut writer = csv::Writer::from_writer(file);
    let mut rows = 0;

    for workout in ordered {
        for entry in &workout.exercises {
            writer.serialize(CsvRow {
                workout_id: workout.id.to_string(),
                date: workout.date.to_rfc3339(),
                notes: workout.notes.clone(),
                exercise: resolve_type_name(catalog, entry.type_id).to_string(),
                weight: entry.weight,
                reps: entry.reps,
                sets: entry.sets,
                volume: entry.volume(),
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} rows to {:?}", rows, path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExerciseEntry;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_export_writes_header_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("log.csv");

        let catalog = vec![ExerciseType::new("Bench Press", Some("Chest"))];
        let workouts = vec![Workout::new(
            Utc::now(),
            Some("pr attempt".into()),
            vec![
                ExerciseEntry::new(catalog[0].id, 100.0, 5, 3),
                ExerciseEntry::new(catalog[0].id, 90.0, 8, 3),
            ],
        )];

        let rows = export_csv(&workouts, &catalog, &out).unwrap();
        assert_eq!(rows, 2);

        let contents = std::fs::read_to_string(&out).unwrap();
        assert!(contents.starts_with("workout_id,date,notes,exercise,weight,reps,sets,volume"));
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.contains("Bench Press"));
    }

    #[test]
    fn test_export_resolves_dangling_types() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("log.csv");

        let workouts = vec![Workout::new(
            Utc::now(),
            None,
            vec![ExerciseEntry::new(Uuid::new_v4(), 60.0, 10, 2)],
        )];

        export_csv(&workouts, &[], &out).unwrap();
        let contents = std::fs::read_to_string(&out).unwrap();
        assert!(contents.contains("(deleted)"));
    }

    #[test]
    fn test_export_is_chronological_and_replaces() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("log.csv");

        let catalog = vec![ExerciseType::new("Squat", None)];
        let workouts = vec![
            Workout::new(
                "2024-02-01T09:00:00Z".parse().unwrap(),
                None,
                vec![ExerciseEntry::new(catalog[0].id, 120.0, 5, 3)],
            ),
            Workout::new(
                "2024-01-01T09:00:00Z".parse().unwrap(),
                None,
                vec![ExerciseEntry::new(catalog[0].id, 100.0, 5, 3)],
            ),
        ];

        export_csv(&workouts, &catalog, &out).unwrap();
        let contents = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[1].contains("2024-01-01"));
        assert!(lines[2].contains("2024-02-01"));

        // exporting again replaces rather than appends
        export_csv(&workouts, &catalog, &out).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_export_empty_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("log.csv");

        let rows = export_csv(&[], &[], &out).unwrap();
        assert_eq!(rows, 0);
        assert!(out.exists());
    }
}
