//! Caller-side aggregates over workout history.
//!
//! The engine itself never reads history; these helpers back the weekly
//! count the day-type advisor takes and the CSV export.

use crate::{Result, Workout};
use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use std::path::Path;

/// Start of the week containing `now` (Sunday 00:00 UTC)
pub fn start_of_week(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_since_sunday = now.weekday().num_days_from_sunday() as i64;
    (now.date_naive() - Duration::days(days_since_sunday))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Completed workouts created since the start of the current week
pub fn completed_this_week(workouts: &[Workout], now: DateTime<Utc>) -> u32 {
    let cutoff = start_of_week(now);
    workouts
        .iter()
        .filter(|w| w.completed && w.created_at >= cutoff)
        .count() as u32
}

/// Workouts sorted newest first
pub fn newest_first(mut workouts: Vec<Workout>) -> Vec<Workout> {
    workouts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    workouts
}

/// A row in the CSV export
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    created_at: String,
    feeling: String,
    exercises: usize,
    total_duration: u32,
    generated_by: String,
    completed: bool,
    completed_at: Option<String>,
}

impl From<&Workout> for CsvRow {
    fn from(workout: &Workout) -> Self {
        CsvRow {
            id: workout.id.to_string(),
            created_at: workout.created_at.to_rfc3339(),
            feeling: workout.feeling.tag().to_string(),
            exercises: workout.exercises.len(),
            total_duration: workout.total_duration,
            generated_by: workout.generated_by.as_str().to_string(),
            completed: workout.completed,
            completed_at: workout.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Write the history as CSV, replacing `path`; returns the row count
pub fn export_csv(workouts: &[Workout], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for workout in workouts {
        writer.serialize(CsvRow::from(workout))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} workouts to {:?}", workouts.len(), path);
    Ok(workouts.len())
}
