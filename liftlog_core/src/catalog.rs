//! Seed catalog and exercise-type helpers.
//!
//! The catalog is an ordered list: iteration order is observable (staple
//! lift slot binding prefers earlier types) so it is a `Vec`, not a map.

use crate::types::ExerciseType;
use uuid::Uuid;

/// Label rendered for entries whose exercise type no longer exists
pub const DELETED_TYPE_LABEL: &str = "(deleted)";

/// Build the catalog installed on first run
///
/// Fresh identifiers are minted each time; the store persists the result
/// immediately so they stay stable across runs.
pub fn seed_catalog() -> Vec<ExerciseType> {
    [
        ("Bench Press", "Chest"),
        ("Lat Pulldown", "Back"),
        ("Squat", "Legs"),
        ("Deadlift", "Back"),
        ("Overhead Press", "Shoulders"),
    ]
    .into_iter()
    .map(|(name, group)| ExerciseType::new(name, Some(group)))
    .collect()
}

/// Resolve a type id to its display name, tolerating dangling references
pub fn resolve_type_name(catalog: &[ExerciseType], type_id: Uuid) -> &str {
    catalog
        .iter()
        .find(|t| t.id == type_id)
        .map(|t| t.name.as_str())
        .unwrap_or(DELETED_TYPE_LABEL)
}

/// Find a type by name, case-insensitively
pub fn find_type_by_name<'a>(catalog: &'a [ExerciseType], name: &str) -> Option<&'a ExerciseType> {
    let needle = name.trim().to_lowercase();
    catalog.iter().find(|t| t.name.to_lowercase() == needle)
}

/// Validate the catalog for consistency
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate_catalog(catalog: &[ExerciseType]) -> Vec<String> {
    let mut errors = Vec::new();

    for (idx, t) in catalog.iter().enumerate() {
        if t.name.trim().is_empty() {
            errors.push(format!("Exercise type at position {} has empty name", idx));
        }
        if catalog[..idx].iter().any(|other| other.id == t.id) {
            errors.push(format!("Duplicate exercise type id '{}'", t.id));
        }
    }

    errors
}
