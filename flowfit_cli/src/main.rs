use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use flowfit_core::cycle::{notification_message, phase_info};
use flowfit_core::history::{completed_this_week, export_csv, newest_first};
use flowfit_core::*;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "flowfit")]
#[command(about = "Daily workouts shaped by how you feel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Never call the remote generator
    #[arg(long, global = true)]
    local_only: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Record today's feeling and generate a workout
    Checkin {
        /// Feeling tag (e.g. cramps, stable, max-energy)
        #[arg(long)]
        feeling: Feeling,
    },

    /// Mark a workout as completed
    Complete {
        /// Workout id as printed by `checkin`
        id: Uuid,
    },

    /// Show today's recommended type of day
    Today,

    /// Show the current cycle phase
    Phase,

    /// List past workouts
    History {
        /// Write the history to a CSV file instead
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Create or replace the profile
    Set {
        #[arg(long)]
        gender: Gender,

        #[arg(long)]
        goal: String,

        #[arg(long)]
        location: String,

        /// Comma-separated equipment list
        #[arg(long, value_delimiter = ',')]
        equipment: Vec<String>,

        /// Available minutes per session
        #[arg(long)]
        minutes: u32,

        /// First day of the last period (YYYY-MM-DD)
        #[arg(long)]
        last_period: Option<NaiveDate>,

        #[arg(long)]
        name: Option<String>,
    },

    /// Print the stored profile
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        flowfit_core::logging::init_with_level("debug");
    } else {
        flowfit_core::logging::init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);

    match cli.command {
        Commands::Profile { action } => cmd_profile(&paths, action),
        Commands::Checkin { feeling } => {
            let orchestrator = build_orchestrator(&config, cli.local_only);
            cmd_checkin(&paths, &orchestrator, feeling).await
        }
        Commands::Complete { id } => {
            let orchestrator = build_orchestrator(&config, cli.local_only);
            cmd_complete(&paths, &orchestrator, id).await
        }
        Commands::Today => cmd_today(&paths),
        Commands::Phase => cmd_phase(&paths),
        Commands::History { export } => cmd_history(&paths, export),
    }
}

fn build_orchestrator(config: &Config, local_only: bool) -> Orchestrator {
    if local_only {
        Orchestrator::local_only(&config.generation)
    } else {
        Orchestrator::from_config(config)
    }
}

fn require_profile(paths: &DataPaths) -> Result<UserProfile> {
    FileProfileStore::new(&paths.profile)
        .load_profile()?
        .ok_or_else(|| Error::NotFound("no profile yet, run `flowfit profile set` first".into()))
}

fn cmd_profile(paths: &DataPaths, action: ProfileAction) -> Result<()> {
    let mut store = FileProfileStore::new(&paths.profile);

    match action {
        ProfileAction::Set {
            gender,
            goal,
            location,
            equipment,
            minutes,
            last_period,
            name,
        } => {
            if minutes == 0 {
                return Err(Error::InputValidation(
                    "--minutes must be greater than zero".into(),
                ));
            }

            // Keep identity stable across edits
            let existing = store.load_profile()?;
            let profile = UserProfile {
                id: existing.as_ref().map(|p| p.id).unwrap_or_else(Uuid::new_v4),
                name,
                gender,
                goal,
                training_location: location,
                equipment,
                training_time: minutes,
                last_period_date: last_period,
                created_at: existing.map(|p| p.created_at).unwrap_or_else(Utc::now),
            };
            store.save_profile(&profile)?;

            println!("✓ Profile saved");
            display_profile(&profile);
        }
        ProfileAction::Show => match store.load_profile()? {
            Some(profile) => display_profile(&profile),
            None => println!("No profile found. Run `flowfit profile set` first."),
        },
    }

    Ok(())
}

async fn cmd_checkin(paths: &DataPaths, orchestrator: &Orchestrator, feeling: Feeling) -> Result<()> {
    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let profile = require_profile(paths)?;
    let now = Utc::now();
    let today = now.date_naive();

    let mut check_ins = FileCheckInStore::new(&paths.check_ins);
    if check_ins.check_in_for(today)?.is_some() {
        return Err(Error::InputValidation(format!(
            "already checked in on {}",
            today
        )));
    }

    let ctx = UserContext::from_profile(&profile, feeling, now)?;

    // The check-in is written last so a failed generation leaves today open
    let mut history = FileHistoryStore::new(&paths.workouts);
    let workout = orchestrator
        .generate_and_record(&ctx, &mut history, now)
        .await?;
    check_ins.append_check_in(&DailyCheckIn::new(today, feeling, &profile))?;

    display_workout(&workout);
    Ok(())
}

async fn cmd_complete(paths: &DataPaths, orchestrator: &Orchestrator, id: Uuid) -> Result<()> {
    let mut history = FileHistoryStore::new(&paths.workouts);
    let already_done = history
        .find_workout(id)?
        .map(|w| w.completed)
        .ok_or_else(|| Error::NotFound(format!("workout {}", id)))?;

    if already_done {
        println!("Workout already completed.");
        return Ok(());
    }

    let now = Utc::now();
    let workout = history.update_workout(id, &mut |w| w.mark_completed(now))?;

    let mut progress_store = FileProgressStore::new(&paths.progress);
    let mut progress = progress_store.load_progress()?;
    progress.record_completion();
    progress_store.save_progress(&progress)?;

    let message = orchestrator.completion_message(workout.feeling, true).await;

    println!("\n✓ Workout completed!");
    println!("  {}", message);
    println!();
    println!("  Total workouts: {}", progress.total_workouts);
    println!(
        "  Streak: {} (best {})",
        progress.current_streak, progress.longest_streak
    );
    Ok(())
}

fn cmd_today(paths: &DataPaths) -> Result<()> {
    let profile = require_profile(paths)?;
    let now = Utc::now();

    let Some(check_in) = FileCheckInStore::new(&paths.check_ins).check_in_for(now.date_naive())? else {
        println!("No check-in yet today. Run `flowfit checkin --feeling <tag>`.");
        return Ok(());
    };

    let workouts = FileHistoryStore::new(&paths.workouts).list_workouts()?;
    let week_count = completed_this_week(&workouts, now);
    let phase = profile.cycle_phase_at(now);
    let advice = day_type(check_in.feeling(), phase, week_count, profile.gender);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", advice.name().to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", advice.description);
    println!("  Feeling: {}", check_in.feeling().label());
    println!("  Completed this week: {}", week_count);

    if let Some(phase) = phase {
        let info = phase_info(phase);
        println!();
        println!("  {}: {}", info.name, info.workout_tips);
    }

    println!();
    Ok(())
}

fn cmd_phase(paths: &DataPaths) -> Result<()> {
    let profile = require_profile(paths)?;

    match profile.cycle_phase_at(Utc::now()) {
        Some(phase) => {
            let info = phase_info(phase);
            println!("\n  {}", info.name);
            println!("  {}", info.description);
            println!("  {}", info.workout_tips);
            println!();
            println!("  {}", notification_message(phase));
        }
        None => {
            println!("Cycle tracking needs a female profile with --last-period set.");
        }
    }

    Ok(())
}

fn cmd_history(paths: &DataPaths, export: Option<PathBuf>) -> Result<()> {
    let history = FileHistoryStore::new(&paths.workouts);
    let workouts = newest_first(history.list_workouts()?);

    if let Some(path) = export {
        let count = export_csv(&workouts, &path)?;
        println!("✓ Exported {} workouts", count);
        println!("  CSV: {}", path.display());
        return Ok(());
    }

    if workouts.is_empty() {
        println!("No workouts yet.");
        return Ok(());
    }

    for workout in &workouts {
        println!(
            "{} {}  {:<16} {} exercises, {} min [{}]{}",
            if workout.completed { "✓" } else { "·" },
            workout.created_at.format("%Y-%m-%d"),
            workout.feeling.label(),
            workout.exercises.len(),
            workout.total_duration / 60,
            workout.generated_by,
            if workout.completed { "" } else { "  (pending)" },
        );
        println!("    id: {}", workout.id);
    }

    Ok(())
}

fn display_profile(profile: &UserProfile) {
    if let Some(ref name) = profile.name {
        println!("  Name: {}", name);
    }
    println!("  Gender: {}", profile.gender);
    println!("  Goal: {}", profile.goal);
    println!("  Location: {}", profile.training_location);
    println!("  Equipment: {}", profile.equipment.join(", "));
    println!("  Minutes per session: {}", profile.training_time);
    if let Some(date) = profile.last_period_date {
        println!("  Last period: {}", date);
    }
}

fn display_workout(workout: &Workout) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  TODAY'S WORKOUT ({})", workout.generated_by);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", workout.emotional_message);
    println!();

    for exercise in &workout.exercises {
        println!("  → {}", exercise.name);
        println!("    {}", exercise.description);
        println!(
            "    {} x {} reps, {}s per set",
            exercise.sets, exercise.reps, exercise.duration
        );
    }

    println!();
    println!(
        "  Duration: ~{} seconds ({} min)",
        workout.total_duration,
        workout.total_duration / 60
    );
    println!("  Meal: {}", workout.meal_suggestion);
    println!();
    println!("  id: {}", workout.id);
    println!("  Run `flowfit complete {}` when done.", workout.id);
    println!();
}
