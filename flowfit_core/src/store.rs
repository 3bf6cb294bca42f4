//! Store interfaces injected into the orchestrator and its callers.
//!
//! The engine never reaches into ambient storage: callers hand it a store
//! capability. File-backed implementations live in [`crate::jsonl`] and
//! [`crate::state`]; the in-memory ones here are for tests and embedding.

use crate::{DailyCheckIn, Error, Progress, Result, UserProfile, Workout};
use chrono::NaiveDate;
use uuid::Uuid;

pub trait ProfileStore {
    fn load_profile(&self) -> Result<Option<UserProfile>>;
    fn save_profile(&mut self, profile: &UserProfile) -> Result<()>;
}

/// Append-only workout history with update-by-id
pub trait HistoryStore {
    fn append_workout(&mut self, workout: &Workout) -> Result<()>;
    fn list_workouts(&self) -> Result<Vec<Workout>>;

    /// Apply `f` to the workout with `id` and persist it
    ///
    /// Returns the updated workout, or `Error::NotFound`.
    fn update_workout(&mut self, id: Uuid, f: &mut dyn FnMut(&mut Workout)) -> Result<Workout>;

    fn find_workout(&self, id: Uuid) -> Result<Option<Workout>> {
        Ok(self.list_workouts()?.into_iter().find(|w| w.id == id))
    }
}

/// Append-only check-ins keyed by date
///
/// The one-per-day rule is enforced by callers via [`CheckInStore::check_in_for`].
pub trait CheckInStore {
    fn append_check_in(&mut self, check_in: &DailyCheckIn) -> Result<()>;
    fn list_check_ins(&self) -> Result<Vec<DailyCheckIn>>;

    fn check_in_for(&self, date: NaiveDate) -> Result<Option<DailyCheckIn>> {
        Ok(self.list_check_ins()?.into_iter().find(|c| c.date() == date))
    }
}

pub trait ProgressStore {
    /// Stored progress, or zeroed counters if none exist yet
    fn load_progress(&self) -> Result<Progress>;
    fn save_progress(&mut self, progress: &Progress) -> Result<()>;
}

// ============================================================================
// In-memory implementations
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct MemoryProfileStore {
    profile: Option<UserProfile>,
}

impl ProfileStore for MemoryProfileStore {
    fn load_profile(&self) -> Result<Option<UserProfile>> {
        Ok(self.profile.clone())
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        self.profile = Some(profile.clone());
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryHistoryStore {
    workouts: Vec<Workout>,
}

impl HistoryStore for MemoryHistoryStore {
    fn append_workout(&mut self, workout: &Workout) -> Result<()> {
        self.workouts.push(workout.clone());
        Ok(())
    }

    fn list_workouts(&self) -> Result<Vec<Workout>> {
        Ok(self.workouts.clone())
    }

    fn update_workout(&mut self, id: Uuid, f: &mut dyn FnMut(&mut Workout)) -> Result<Workout> {
        let workout = self
            .workouts
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::NotFound(format!("workout {}", id)))?;
        f(workout);
        Ok(workout.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryCheckInStore {
    check_ins: Vec<DailyCheckIn>,
}

impl CheckInStore for MemoryCheckInStore {
    fn append_check_in(&mut self, check_in: &DailyCheckIn) -> Result<()> {
        self.check_ins.push(check_in.clone());
        Ok(())
    }

    fn list_check_ins(&self) -> Result<Vec<DailyCheckIn>> {
        Ok(self.check_ins.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryProgressStore {
    progress: Progress,
}

impl ProgressStore for MemoryProgressStore {
    fn load_progress(&self) -> Result<Progress> {
        Ok(self.progress.clone())
    }

    fn save_progress(&mut self, progress: &Progress) -> Result<()> {
        self.progress = progress.clone();
        Ok(())
    }
}
