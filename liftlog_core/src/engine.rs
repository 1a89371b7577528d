//! Aggregation engine producing the dashboard series.
//!
//! Four independent pure transformations over a snapshot of the workout
//! log:
//! - Daily training volume
//! - Per-exercise-type volume ranking
//! - Estimated one-rep-max trend for staple lifts (Epley formula)
//! - Sessions per week
//!
//! Every function is total: it reads the snapshot, never mutates it, never
//! fails, and produces empty output for empty input. Calendar bucketing and
//! date labels use the time zone supplied by the caller (`Local` in the
//! CLI, `Utc` in tests).

use crate::catalog::resolve_type_name;
use crate::types::{ExerciseEntry, ExerciseType, Workout};
use chrono::{Datelike, NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Ranking output is truncated to keep a bar chart legible
pub const MAX_RANKED_TYPES: usize = 12;

/// One point of the daily-volume series
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyVolume {
    pub date: String,
    pub volume: f64,
}

/// One bar of the per-type volume ranking
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeVolume {
    pub name: String,
    pub volume: f64,
}

/// One row of the estimated-1RM series; one row per workout
///
/// `estimates` is sparse: a staple lift with no qualifying entry in the
/// workout is absent, never present with a zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OneRmPoint {
    pub date: String,
    pub estimates: Vec<(StapleLift, u32)>,
}

/// One bucket of the sessions-per-week series
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeeklySessions {
    pub week: String,
    pub sessions: u32,
}

/// The four staple lift slots tracked by the 1RM series
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum StapleLift {
    BenchPress,
    Squat,
    Deadlift,
    OverheadPress,
}

impl StapleLift {
    /// Detection order; also the order slots appear in output rows
    pub const ALL: [StapleLift; 4] = [
        StapleLift::BenchPress,
        StapleLift::Squat,
        StapleLift::Deadlift,
        StapleLift::OverheadPress,
    ];

    /// Display name for this slot
    pub fn label(self) -> &'static str {
        match self {
            StapleLift::BenchPress => "Bench Press",
            StapleLift::Squat => "Squat",
            StapleLift::Deadlift => "Deadlift",
            StapleLift::OverheadPress => "Overhead Press",
        }
    }

    // `name` must already be lowercased
    fn matches(self, name: &str) -> bool {
        match self {
            StapleLift::BenchPress => name.contains("bench"),
            StapleLift::Squat => name.contains("squat"),
            StapleLift::Deadlift => name.contains("dead"),
            StapleLift::OverheadPress => {
                name.contains("overhead") || (name.contains("shoulder") && name.contains("press"))
            }
        }
    }
}

/// Summarize total volume per calendar day
///
/// Workouts sharing a calendar day (in `tz`) merge into one point; days
/// with no workouts produce no point. The sum of all output volumes equals
/// the sum of all input workout volumes.
pub fn daily_volume<Tz: TimeZone>(workouts: &[Workout], tz: &Tz) -> Vec<DailyVolume> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for w in workouts {
        let day = w.date.with_timezone(tz).date_naive();
        *days.entry(day).or_insert(0.0) += w.volume();
    }
    days.into_iter()
        .map(|(day, volume)| DailyVolume {
            date: format_day(day),
            volume,
        })
        .collect()
}

/// Rank exercise types by accumulated volume, descending
///
/// Dangling type references land in a bucket named `"(deleted)"`. Ties keep
/// first-encounter order; output is truncated to [`MAX_RANKED_TYPES`].
pub fn volume_by_type(workouts: &[Workout], catalog: &[ExerciseType]) -> Vec<TypeVolume> {
    let mut rows: Vec<TypeVolume> = Vec::new();
    for w in workouts {
        for e in &w.exercises {
            let name = resolve_type_name(catalog, e.type_id);
            match rows.iter().position(|r| r.name == name) {
                Some(idx) => rows[idx].volume += e.volume(),
                None => rows.push(TypeVolume {
                    name: name.to_string(),
                    volume: e.volume(),
                }),
            }
        }
    }
    // sort_by is stable, so equal volumes keep first-encounter order
    rows.sort_by(|a, b| b.volume.total_cmp(&a.volume));
    rows.truncate(MAX_RANKED_TYPES);
    rows
}

/// Bind each staple-lift slot to at most one exercise type
///
/// Catalog order decides: the first type whose name matches a slot wins it
/// and later matches are ignored. Slots with no match are absent.
pub fn detect_staple_lifts(catalog: &[ExerciseType]) -> Vec<(StapleLift, Uuid)> {
    let mut slots: Vec<(StapleLift, Uuid)> = Vec::new();
    for t in catalog {
        let name = t.name.to_lowercase();
        for lift in StapleLift::ALL {
            if lift.matches(&name) && !slots.iter().any(|(bound, _)| *bound == lift) {
                slots.push((lift, t.id));
            }
        }
    }
    slots
}

/// Best estimated one-rep max per staple lift, per workout
///
/// Rows are emitted per workout in chronological order and are not merged
/// by calendar day. A slot appears in a row only when the workout has at
/// least one entry of the bound type with a positive estimate.
pub fn one_rm_series<Tz: TimeZone>(
    workouts: &[Workout],
    catalog: &[ExerciseType],
    tz: &Tz,
) -> Vec<OneRmPoint> {
    let slots = detect_staple_lifts(catalog);

    let mut ordered: Vec<&Workout> = workouts.iter().collect();
    ordered.sort_by_key(|w| w.date);

    let mut rows = Vec::with_capacity(ordered.len());
    for w in ordered {
        let mut estimates = Vec::new();
        for (lift, type_id) in &slots {
            let best = w
                .exercises
                .iter()
                .filter(|e| e.type_id == *type_id)
                .map(epley_estimate)
                .fold(0.0_f64, f64::max);
            if best > 0.0 {
                estimates.push((*lift, best.round() as u32));
            }
        }
        rows.push(OneRmPoint {
            date: format_day(w.date.with_timezone(tz).date_naive()),
            estimates,
        });
    }
    rows
}

/// Count sessions per week; every workout counts exactly one
///
/// Output is sorted ascending by label, which matches chronology because
/// the year leads and the week number is zero-padded.
pub fn sessions_per_week<Tz: TimeZone>(workouts: &[Workout], tz: &Tz) -> Vec<WeeklySessions> {
    let mut weeks: BTreeMap<String, u32> = BTreeMap::new();
    for w in workouts {
        let day = w.date.with_timezone(tz).date_naive();
        *weeks.entry(week_label(day)).or_insert(0) += 1;
    }
    weeks
        .into_iter()
        .map(|(week, sessions)| WeeklySessions { week, sessions })
        .collect()
}

// Epley: weight * (1 + reps / 30). Bad weights estimate as zero.
fn epley_estimate(entry: &ExerciseEntry) -> f64 {
    if !entry.weight.is_finite() || entry.weight < 0.0 {
        return 0.0;
    }
    entry.weight * (1.0 + f64::from(entry.reps) / 30.0)
}

pub(crate) fn format_day(day: NaiveDate) -> String {
    day.format("%-m/%-d/%Y").to_string()
}

/// Week label: `{year}-W{week:02}` where week is
/// `ceil((zero-based day of year + weekday of Jan 1, Sunday=1) / 7)`.
///
/// This is not ISO 8601 week numbering; changing it would renumber the
/// boundary weeks of existing history.
fn week_label(day: NaiveDate) -> String {
    let jan1 = day.with_ordinal0(0).unwrap_or(day);
    let jan1_weekday = jan1.weekday().num_days_from_sunday() + 1;
    let week = (day.ordinal0() + jan1_weekday + 6) / 7;
    format!("{}-W{:02}", day.year(), week)
}
