//! Workout log persistence.
//!
//! State lives in two JSON blobs, `types.json` and `workouts.json`, under
//! the data directory. Every mutation rewrites the affected blob atomically
//! (temp file, exclusive lock, fsync, rename). Unreadable or corrupt blobs
//! degrade to defaults with a warning instead of failing; write failures
//! are propagated.
//!
//! The aggregation engine never touches the store: callers hand it the
//! `types()` / `workouts()` snapshots.

use crate::catalog::seed_catalog;
use crate::types::{ExerciseType, Workout};
use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Logical file holding the exercise-type catalog
pub const TYPES_FILE: &str = "types.json";
/// Logical file holding the workout log
pub const WORKOUTS_FILE: &str = "workouts.json";

/// On-disk store for the catalog and the workout log
pub struct Store {
    types_path: PathBuf,
    workouts_path: PathBuf,
    types: Vec<ExerciseType>,
    workouts: Vec<Workout>,
}

impl Store {
    /// Open the store under a data directory, creating it if needed
    ///
    /// A missing `types.json` is seeded with the default catalog and
    /// persisted immediately so the generated identifiers stay stable. A
    /// corrupt blob is left on disk untouched and defaults are used until
    /// the next mutation rewrites it.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let types_path = data_dir.join(TYPES_FILE);
        let workouts_path = data_dir.join(WORKOUTS_FILE);

        let types = match load_blob::<Vec<ExerciseType>>(&types_path) {
            Some(types) => types,
            None if !types_path.exists() => {
                let seeded = seed_catalog();
                write_blob(&types_path, &seeded)?;
                tracing::info!("Seeded default exercise types at {:?}", types_path);
                seeded
            }
            None => seed_catalog(),
        };

        for error in crate::catalog::validate_catalog(&types) {
            tracing::warn!("Catalog issue: {}", error);
        }

        let workouts = load_blob::<Vec<Workout>>(&workouts_path).unwrap_or_default();

        Ok(Self {
            types_path,
            workouts_path,
            types,
            workouts,
        })
    }

    /// Current catalog snapshot
    pub fn types(&self) -> &[ExerciseType] {
        &self.types
    }

    /// Current workout log snapshot
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    /// Insert a workout, or replace the existing one with the same id
    pub fn upsert_workout(&mut self, workout: Workout) -> Result<()> {
        match self.workouts.iter().position(|w| w.id == workout.id) {
            Some(idx) => self.workouts[idx] = workout,
            None => self.workouts.push(workout),
        }
        self.commit_workouts()
    }

    /// Remove a workout; returns whether anything was removed
    pub fn delete_workout(&mut self, id: Uuid) -> Result<bool> {
        let before = self.workouts.len();
        self.workouts.retain(|w| w.id != id);
        if self.workouts.len() == before {
            return Ok(false);
        }
        self.commit_workouts()?;
        Ok(true)
    }

    /// Append a new exercise type to the catalog
    pub fn add_type(&mut self, exercise_type: ExerciseType) -> Result<()> {
        self.types.push(exercise_type);
        self.commit_types()
    }

    /// Replace the type with a matching id; returns whether it was found
    pub fn update_type(&mut self, updated: ExerciseType) -> Result<bool> {
        match self.types.iter().position(|t| t.id == updated.id) {
            Some(idx) => {
                self.types[idx] = updated;
                self.commit_types()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a type from the catalog; historical workouts keep their
    /// (now dangling) references. Returns whether anything was removed.
    pub fn delete_type(&mut self, id: Uuid) -> Result<bool> {
        let before = self.types.len();
        self.types.retain(|t| t.id != id);
        if self.types.len() == before {
            return Ok(false);
        }
        self.commit_types()?;
        Ok(true)
    }

    /// Install a pulled snapshot wholesale (last write wins)
    pub fn replace_all(
        &mut self,
        types: Vec<ExerciseType>,
        workouts: Vec<Workout>,
    ) -> Result<()> {
        self.types = types;
        self.workouts = workouts;
        self.commit_types()?;
        self.commit_workouts()
    }

    fn commit_types(&self) -> Result<()> {
        write_blob(&self.types_path, &self.types)
    }

    fn commit_workouts(&self) -> Result<()> {
        write_blob(&self.workouts_path, &self.workouts)
    }
}

/// Read a blob with shared locking; any failure degrades to `None`
fn load_blob<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open {:?}: {}. Using defaults.", path, e);
            return None;
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock {:?}: {}. Using defaults.", path, e);
        return None;
    }

    let mut contents = String::new();
    let mut reader = BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!("Failed to read {:?}: {}. Using defaults.", path, e);
        return None;
    }

    let _ = file.unlock();

    match serde_json::from_str::<T>(&contents) {
        Ok(value) => {
            tracing::debug!("Loaded {:?}", path);
            Some(value)
        }
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}. Using defaults.", path, e);
            None
        }
    }
}

/// Atomically write a blob:
/// 1. Write to a temp file in the same directory
/// 2. Sync to disk
/// 3. Rename over the original
fn write_blob<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = NamedTempFile::new_in(
        path.parent()
            .ok_or_else(|| Error::Store("data path missing parent".into()))?,
    )?;

    // Exclusive lock on the temp file serializes concurrent writers
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        let contents = serde_json::to_string(value)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Wrote {:?}", path);
    Ok(())
}
