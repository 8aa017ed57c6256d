//! Subcommand handlers: open the tracker, apply one action, render the result.

use calorie_core::{
    default_log_level, init_logging, CaloriesTracker, Entry, EntryId, EntryKind,
    PersistenceStore, SqliteBackend, TrackerConfig,
};
use clap::Subcommand;
use std::error::Error;
use std::path::PathBuf;

type CliResult<T> = Result<T, Box<dyn Error>>;
type Tracker = CaloriesTracker<SqliteBackend>;

const APP_DIR_NAME: &str = "calorie_tracker";
const DB_FILE_NAME: &str = "tracker.sqlite3";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Subcommand)]
pub enum EntryAction {
    /// Log a new entry
    Add {
        name: String,
        /// Whole, non-negative calorie count
        #[arg(allow_hyphen_values = true)]
        calories: String,
    },
    /// Remove an entry by id
    Remove { id: String },
    /// List entries in the order they were logged
    List {
        /// Only show entries whose name contains this text
        #[arg(long)]
        filter: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

pub fn open_tracker(db: Option<PathBuf>, config: Option<PathBuf>) -> CliResult<Tracker> {
    let config_path = match config {
        Some(path) => path,
        None => app_dir(dirs::config_dir())?.join(CONFIG_FILE_NAME),
    };
    let config = TrackerConfig::load(&config_path)?;

    if let Some(log_dir) = &config.log_dir {
        let level = config
            .log_level
            .as_deref()
            .unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy())?;
    }

    let db_path = match db.or(config.db_path) {
        Some(path) => path,
        None => app_dir(dirs::data_dir())?.join(DB_FILE_NAME),
    };
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let store = PersistenceStore::new(SqliteBackend::open(&db_path)?);
    Ok(CaloriesTracker::initialize(
        store,
        config.default_calorie_limit,
    )?)
}

pub fn run_entry(tracker: &mut Tracker, kind: EntryKind, action: EntryAction) -> CliResult<()> {
    match action {
        EntryAction::Add { name, calories } => {
            let entry = Entry::from_input(&name, &calories)?;
            let id = entry.id.clone();
            match kind {
                EntryKind::Meal => tracker.add_meal(entry)?,
                EntryKind::Workout => tracker.add_workout(entry)?,
            }
            println!("{id}");
        }
        EntryAction::Remove { id } => {
            let id = EntryId::from(id);
            let removed = match kind {
                EntryKind::Meal => tracker.remove_meal(&id)?,
                EntryKind::Workout => tracker.remove_workout(&id)?,
            };
            if removed {
                println!("removed {} {id}", kind.label());
            } else {
                println!("no {} with id {id}", kind.label());
            }
        }
        EntryAction::List { filter, json } => {
            let entries = tracker.filter(kind, filter.as_deref().unwrap_or_default());
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!("{}\t{}\t{}", entry.id, entry.calories, entry.name);
                }
            }
        }
    }
    Ok(())
}

pub fn run_limit(tracker: &mut Tracker, calories: u32) -> CliResult<()> {
    tracker.set_limit(i64::from(calories))?;
    println!("limit set to {calories}");
    Ok(())
}

pub fn run_reset(tracker: &mut Tracker) -> CliResult<()> {
    tracker.reset()?;
    println!("tracker reset; limit kept at {}", tracker.calorie_limit());
    Ok(())
}

pub fn run_status(tracker: &Tracker, json: bool) -> CliResult<()> {
    let snapshot = tracker.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("limit      {}", snapshot.calorie_limit);
    println!("total      {}", snapshot.total_calories);
    println!("consumed   {}", snapshot.calories_consumed);
    println!("burned     {}", snapshot.calories_burned);
    println!("remaining  {}", snapshot.calories_remaining);
    let status = match snapshot.status {
        calorie_core::BudgetStatus::UnderLimit => "under limit",
        calorie_core::BudgetStatus::AtOrOverLimit => "limit reached",
    };
    println!("progress   {:.1}% ({status})", snapshot.progress_percentage);
    Ok(())
}

fn app_dir(base: Option<PathBuf>) -> CliResult<PathBuf> {
    base.map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| "cannot resolve a home directory; pass --db and --config".into())
}
