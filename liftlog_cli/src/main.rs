use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use liftlog_core::*;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Personal workout log and training dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new workout
    Add {
        /// Workout date/time (RFC 3339, YYYY-MM-DDTHH:MM or YYYY-MM-DD, local). Defaults to now
        #[arg(long)]
        date: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Exercise as NAME:WEIGHTxREPSxSETS (repeatable)
        #[arg(long = "exercise", value_name = "SPEC")]
        exercises: Vec<String>,
    },

    /// Show the most recent workout (default)
    Last,

    /// List workouts
    List {
        /// Filter by date, notes or exercise name
        #[arg(long)]
        query: Option<String>,

        /// Sort order: date-desc, date-asc, volume-desc, volume-asc
        #[arg(long, default_value = "date-desc")]
        sort: String,
    },

    /// Delete a workout by id
    Delete { id: Uuid },

    /// Manage exercise types
    Types {
        #[command(subcommand)]
        command: TypesCommand,
    },

    /// Show the training dashboard
    Dashboard,

    /// Export the full log to CSV
    Export {
        /// Output file path
        #[arg(long)]
        out: PathBuf,
    },

    /// Sync with the configured remote store
    Sync {
        #[command(subcommand)]
        command: SyncCommand,
    },
}

#[derive(Subcommand)]
enum TypesCommand {
    /// List exercise types
    List,

    /// Add an exercise type
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        muscle_group: Option<String>,
    },

    /// Rename an exercise type
    Rename {
        id: Uuid,

        #[arg(long)]
        name: String,

        #[arg(long)]
        muscle_group: Option<String>,
    },

    /// Delete an exercise type (past workouts are kept)
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum SyncCommand {
    /// Show who the remote thinks we are
    Status,
    /// Replace local data with the remote snapshot
    Pull,
    /// Replace the remote snapshot with local data
    Push,
}

fn main() -> Result<()> {
    // Initialize logging
    liftlog_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Add {
            date,
            notes,
            exercises,
        }) => cmd_add(data_dir, date, notes, exercises, &config),
        Some(Commands::Last) | None => cmd_last(data_dir, &config),
        Some(Commands::List { query, sort }) => cmd_list(data_dir, query, &sort, &config),
        Some(Commands::Delete { id }) => cmd_delete(data_dir, id),
        Some(Commands::Types { command }) => cmd_types(data_dir, command),
        Some(Commands::Dashboard) => cmd_dashboard(data_dir, &config),
        Some(Commands::Export { out }) => cmd_export(data_dir, out),
        Some(Commands::Sync { command }) => cmd_sync(data_dir, command, &config),
    }
}

fn cmd_add(
    data_dir: PathBuf,
    date: Option<String>,
    notes: Option<String>,
    exercise_specs: Vec<String>,
    config: &Config,
) -> Result<()> {
    if exercise_specs.is_empty() {
        return Err(Error::Validation(
            "Add at least one exercise with --exercise \"NAME:WEIGHTxREPSxSETS\"".into(),
        ));
    }

    let mut store = Store::open(&data_dir)?;

    let date = match date {
        Some(ref input) => parse_date(input)?,
        None => Utc::now(),
    };

    let mut entries = Vec::with_capacity(exercise_specs.len());
    for spec in &exercise_specs {
        entries.push(parse_exercise_spec(spec, store.types())?);
    }

    let workout = Workout::new(date, notes, entries);
    let id = workout.id;
    let volume = workout.volume();
    let count = workout.exercises.len();
    store.upsert_workout(workout)?;

    println!(
        "✓ Workout logged: {} exercise{}, volume {} {}",
        count,
        if count == 1 { "" } else { "s" },
        volume.round() as i64,
        config.units.weight
    );
    println!("  id: {}", id);
    Ok(())
}

fn cmd_last(data_dir: PathBuf, config: &Config) -> Result<()> {
    let store = Store::open(&data_dir)?;

    match last_workout(store.workouts()) {
        Some(workout) => {
            println!("Last workout:");
            display_workout(workout, store.types(), &config.units.weight);
        }
        None => println!("No workouts yet. Log one with `liftlog add`."),
    }
    Ok(())
}

fn cmd_list(
    data_dir: PathBuf,
    query: Option<String>,
    sort: &str,
    config: &Config,
) -> Result<()> {
    let store = Store::open(&data_dir)?;
    let order = parse_sort_order(sort);

    let rows = list_workouts(
        store.workouts(),
        store.types(),
        query.as_deref(),
        order,
        &Local,
    );

    if rows.is_empty() {
        println!("No workouts yet.");
        return Ok(());
    }

    for workout in rows {
        println!(
            "{} · volume {} {} · id {}",
            workout.date.with_timezone(&Local).format("%-m/%-d/%Y %H:%M"),
            workout.volume().round() as i64,
            config.units.weight,
            workout.id
        );
        for entry in &workout.exercises {
            println!(
                "    {}: {}×{} @ {} {}",
                resolve_type_name(store.types(), entry.type_id),
                entry.sets,
                entry.reps,
                entry.weight,
                config.units.weight
            );
        }
        if let Some(ref notes) = workout.notes {
            println!("    Notes: {}", notes);
        }
    }
    Ok(())
}

fn cmd_delete(data_dir: PathBuf, id: Uuid) -> Result<()> {
    let mut store = Store::open(&data_dir)?;

    if store.delete_workout(id)? {
        println!("✓ Workout deleted");
    } else {
        println!("No workout with id {}", id);
    }
    Ok(())
}

fn cmd_types(data_dir: PathBuf, command: TypesCommand) -> Result<()> {
    let mut store = Store::open(&data_dir)?;

    match command {
        TypesCommand::List => {
            for t in store.types() {
                println!(
                    "{}  {} ({})",
                    t.id,
                    t.name,
                    t.muscle_group.as_deref().unwrap_or("—")
                );
            }
        }

        TypesCommand::Add { name, muscle_group } => {
            if name.trim().is_empty() {
                return Err(Error::Validation("Type name must not be empty".into()));
            }
            let added = ExerciseType::new(&name, muscle_group.as_deref());
            let id = added.id;
            store.add_type(added)?;
            println!("✓ Added type {}", name.trim());
            println!("  id: {}", id);
        }

        TypesCommand::Rename {
            id,
            name,
            muscle_group,
        } => {
            if name.trim().is_empty() {
                return Err(Error::Validation("Type name must not be empty".into()));
            }
            match store.types().iter().find(|t| t.id == id).cloned() {
                Some(mut updated) => {
                    updated.name = name.trim().to_string();
                    if let Some(group) = muscle_group {
                        updated.muscle_group = Some(group.trim().to_string());
                    }
                    store.update_type(updated)?;
                    println!("✓ Type updated");
                }
                None => println!("No exercise type with id {}", id),
            }
        }

        TypesCommand::Delete { id } => {
            if store.delete_type(id)? {
                println!("✓ Type deleted (past workouts keep their entries)");
            } else {
                println!("No exercise type with id {}", id);
            }
        }
    }
    Ok(())
}

fn cmd_dashboard(data_dir: PathBuf, config: &Config) -> Result<()> {
    let store = Store::open(&data_dir)?;
    let unit = &config.units.weight;

    if store.workouts().is_empty() {
        println!("No workouts yet. Log one with `liftlog add`.");
        return Ok(());
    }

    panel("TRAINING VOLUME OVER TIME");
    let daily = daily_volume(store.workouts(), &Local);
    let max_volume = daily.iter().map(|p| p.volume).fold(0.0_f64, f64::max);
    for point in &daily {
        println!(
            "  {:<10} {:>7} {}  {}",
            point.date,
            point.volume.round() as i64,
            unit,
            bar(point.volume, max_volume)
        );
    }

    panel("TOP VOLUME BY EXERCISE");
    let ranking = volume_by_type(store.workouts(), store.types());
    let max_volume = ranking.iter().map(|r| r.volume).fold(0.0_f64, f64::max);
    for row in &ranking {
        println!(
            "  {:<20} {:>7} {}  {}",
            row.name,
            row.volume.round() as i64,
            unit,
            bar(row.volume, max_volume)
        );
    }

    panel("ESTIMATED 1RM (EPLEY)");
    let series = one_rm_series(store.workouts(), store.types(), &Local);
    let mut any = false;
    for row in &series {
        if row.estimates.is_empty() {
            continue;
        }
        any = true;
        let estimates = row
            .estimates
            .iter()
            .map(|(lift, value)| format!("{} {}", lift.label(), value))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {:<10} {}", row.date, estimates);
    }
    if !any {
        println!("  No staple lifts detected in the catalog.");
    }

    panel("SESSIONS PER WEEK");
    for week in sessions_per_week(store.workouts(), &Local) {
        println!(
            "  {:<9} {:>2}  {}",
            week.week,
            week.sessions,
            "█".repeat(week.sessions as usize)
        );
    }

    println!();
    Ok(())
}

fn cmd_export(data_dir: PathBuf, out: PathBuf) -> Result<()> {
    let store = Store::open(&data_dir)?;

    let rows = export_csv(store.workouts(), store.types(), &out)?;
    println!("✓ Exported {} rows to {}", rows, out.display());
    Ok(())
}

fn cmd_sync(data_dir: PathBuf, command: SyncCommand, config: &Config) -> Result<()> {
    let client = SyncClient::from_config(&config.sync)?;

    match command {
        SyncCommand::Status => {
            let auth = client.check_auth();
            if auth.ok {
                println!(
                    "Signed in as {}",
                    auth.login.unwrap_or_else(|| "(unknown)".into())
                );
            } else {
                println!("Not signed in. Check the [sync] section of config.toml.");
            }
        }

        SyncCommand::Pull => {
            let (types, workouts) = client.pull()?;
            let mut store = Store::open(&data_dir)?;
            let type_count = types.len();
            let workout_count = workouts.len();
            store.replace_all(types, workouts)?;
            println!(
                "✓ Pulled {} types and {} workouts from remote",
                type_count, workout_count
            );
        }

        SyncCommand::Push => {
            let store = Store::open(&data_dir)?;
            client.push(store.types(), store.workouts())?;
            println!("✓ Synced to remote");
        }
    }
    Ok(())
}

fn display_workout(workout: &Workout, catalog: &[ExerciseType], unit: &str) {
    println!(
        "  {}",
        workout.date.with_timezone(&Local).format("%-m/%-d/%Y %H:%M")
    );
    for entry in &workout.exercises {
        println!(
            "  {}: {}×{} @ {} {}",
            resolve_type_name(catalog, entry.type_id),
            entry.sets,
            entry.reps,
            entry.weight,
            unit
        );
    }
    println!("  Volume: {} {}", workout.volume().round() as i64, unit);
    if let Some(ref notes) = workout.notes {
        println!("  Notes: {}", notes);
    }
    println!("  id: {}", workout.id);
}

fn panel(title: &str) {
    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│  {}", title);
    println!("╰─────────────────────────────────────────╯");
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    let width = ((value / max) * 30.0).round() as usize;
    "█".repeat(width.max(1))
}

fn parse_sort_order(input: &str) -> SortOrder {
    match input.to_lowercase().as_str() {
        "date-desc" => SortOrder::DateDesc,
        "date-asc" => SortOrder::DateAsc,
        "volume-desc" => SortOrder::VolumeDesc,
        "volume-asc" => SortOrder::VolumeAsc,
        other => {
            eprintln!("Unknown sort order: {}. Using date-desc.", other);
            SortOrder::DateDesc
        }
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD` (the latter two
/// interpreted in the local time zone).
fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M") {
        return local_to_utc(naive);
    }
    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(naive) = day.and_hms_opt(0, 0, 0) {
            return local_to_utc(naive);
        }
    }
    Err(Error::Validation(format!(
        "Unrecognized date '{}'. Use RFC 3339, YYYY-MM-DDTHH:MM or YYYY-MM-DD.",
        input
    )))
}

fn local_to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            Error::Validation(format!(
                "Date '{}' is ambiguous or invalid in the local time zone",
                naive
            ))
        })
}

/// Parse `NAME:WEIGHTxREPSxSETS` against the catalog
fn parse_exercise_spec(spec: &str, catalog: &[ExerciseType]) -> Result<ExerciseEntry> {
    let (name, numbers) = spec.rsplit_once(':').ok_or_else(|| {
        Error::Validation(format!(
            "Bad exercise '{}': expected NAME:WEIGHTxREPSxSETS",
            spec
        ))
    })?;

    let parts: Vec<&str> = numbers.split('x').collect();
    if parts.len() != 3 {
        return Err(Error::Validation(format!(
            "Bad exercise '{}': expected NAME:WEIGHTxREPSxSETS",
            spec
        )));
    }

    let weight: f64 = parts[0].trim().parse().map_err(|_| {
        Error::Validation(format!("Bad weight '{}' in exercise '{}'", parts[0], spec))
    })?;
    let reps: u32 = parts[1].trim().parse().map_err(|_| {
        Error::Validation(format!("Bad reps '{}' in exercise '{}'", parts[1], spec))
    })?;
    let sets: u32 = parts[2].trim().parse().map_err(|_| {
        Error::Validation(format!("Bad sets '{}' in exercise '{}'", parts[2], spec))
    })?;

    if !weight.is_finite() || weight <= 0.0 || reps == 0 || sets == 0 {
        return Err(Error::Validation(
            "Weight, reps and sets must all be positive".into(),
        ));
    }

    let exercise_type = find_type_by_name(catalog, name).ok_or_else(|| {
        Error::Validation(format!(
            "Unknown exercise type '{}'. Add it first with `liftlog types add`.",
            name.trim()
        ))
    })?;

    Ok(ExerciseEntry::new(exercise_type.id, weight, reps, sets))
}
