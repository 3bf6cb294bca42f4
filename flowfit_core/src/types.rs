//! Core domain types for the FlowFit workout engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Closed enumerations (gender, feelings, cycle phases, intensity tiers)
//! - Exercises and workout drafts/records
//! - Profile, daily check-in and progress records
//! - The engine's per-request user context

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Closed Enumerations
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "female" => Ok(Gender::Female),
            "male" => Ok(Gender::Male),
            other => Err(Error::InputValidation(format!("unknown gender '{}'", other))),
        }
    }
}

/// Self-reported emotional/physical state for the day
///
/// Each gender is offered six tags; `stable` is shared by both.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Feeling {
    Cramps,
    Bloated,
    NoEnergy,
    Stable,
    Energized,
    MaxEnergy,
    MentallyTired,
    PhysicallyTired,
    Stressed,
    Unmotivated,
    MaxMotivation,
}

const FEMALE_FEELINGS: [Feeling; 6] = [
    Feeling::Cramps,
    Feeling::Bloated,
    Feeling::NoEnergy,
    Feeling::Stable,
    Feeling::Energized,
    Feeling::MaxEnergy,
];

const MALE_FEELINGS: [Feeling; 6] = [
    Feeling::MentallyTired,
    Feeling::PhysicallyTired,
    Feeling::Stressed,
    Feeling::Unmotivated,
    Feeling::Stable,
    Feeling::MaxMotivation,
];

impl Feeling {
    pub const ALL: [Feeling; 11] = [
        Feeling::Cramps,
        Feeling::Bloated,
        Feeling::NoEnergy,
        Feeling::Stable,
        Feeling::Energized,
        Feeling::MaxEnergy,
        Feeling::MentallyTired,
        Feeling::PhysicallyTired,
        Feeling::Stressed,
        Feeling::Unmotivated,
        Feeling::MaxMotivation,
    ];

    /// Wire tag (e.g. `no-energy`)
    pub fn tag(self) -> &'static str {
        match self {
            Feeling::Cramps => "cramps",
            Feeling::Bloated => "bloated",
            Feeling::NoEnergy => "no-energy",
            Feeling::Stable => "stable",
            Feeling::Energized => "energized",
            Feeling::MaxEnergy => "max-energy",
            Feeling::MentallyTired => "mentally-tired",
            Feeling::PhysicallyTired => "physically-tired",
            Feeling::Stressed => "stressed",
            Feeling::Unmotivated => "unmotivated",
            Feeling::MaxMotivation => "max-motivation",
        }
    }

    /// Display label shown to users in the app
    pub fn label(self) -> &'static str {
        match self {
            Feeling::Cramps => "Cólica",
            Feeling::Bloated => "Inchada",
            Feeling::NoEnergy => "Sem energia",
            Feeling::Stable => "Estável",
            Feeling::Energized => "Disposta",
            Feeling::MaxEnergy => "Energia máxima",
            Feeling::MentallyTired => "Cansado mentalmente",
            Feeling::PhysicallyTired => "Cansado fisicamente",
            Feeling::Stressed => "Estressado",
            Feeling::Unmotivated => "Desmotivado",
            Feeling::MaxMotivation => "Motivação máxima",
        }
    }

    /// The tags offered to a gender at check-in, in display order
    pub fn options_for(gender: Gender) -> &'static [Feeling] {
        match gender {
            Gender::Female => &FEMALE_FEELINGS,
            Gender::Male => &MALE_FEELINGS,
        }
    }

    pub fn is_offered_to(self, gender: Gender) -> bool {
        Self::options_for(gender).contains(&self)
    }
}

impl fmt::Display for Feeling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Feeling {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Feeling::ALL
            .iter()
            .copied()
            .find(|f| f.tag() == wanted)
            .ok_or_else(|| Error::InputValidation(format!("unknown feeling tag '{}'", s.trim())))
    }
}

/// Bucket of the 28-day menstrual cycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl CyclePhase {
    pub const ALL: [CyclePhase; 4] = [
        CyclePhase::Menstrual,
        CyclePhase::Follicular,
        CyclePhase::Ovulation,
        CyclePhase::Luteal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CyclePhase::Menstrual => "menstrual",
            CyclePhase::Follicular => "follicular",
            CyclePhase::Ovulation => "ovulation",
            CyclePhase::Luteal => "luteal",
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse workout difficulty driving exercise selection
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IntensityTier {
    Low,
    Medium,
    High,
}

impl IntensityTier {
    pub const ALL: [IntensityTier; 3] =
        [IntensityTier::Low, IntensityTier::Medium, IntensityTier::High];

    pub fn as_str(self) -> &'static str {
        match self {
            IntensityTier::Low => "low",
            IntensityTier::Medium => "medium",
            IntensityTier::High => "high",
        }
    }
}

impl fmt::Display for IntensityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which generator produced a workout draft
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Ai,
    Local,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Ai => "ai",
            Provenance::Local => "local",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Exercise and Workout Types
// ============================================================================

/// An immutable catalog entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseTemplate {
    pub name: String,
    pub description: String,
    /// Seconds per set
    pub duration: u32,
    pub sets: u32,
    pub reps: u32,
    pub intensity: IntensityTier,
}

/// An exercise instantiated into a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub description: String,
    /// Seconds per set
    pub duration: u32,
    pub sets: u32,
    pub reps: u32,
    pub intensity: IntensityTier,
}

impl From<&ExerciseTemplate> for Exercise {
    fn from(template: &ExerciseTemplate) -> Self {
        Exercise {
            name: template.name.clone(),
            description: template.description.clone(),
            duration: template.duration,
            sets: template.sets,
            reps: template.reps,
            intensity: template.intensity,
        }
    }
}

/// Sum of `duration × sets` over a sequence of exercises, in seconds
///
/// `None` if the total does not fit in a `u32`.
pub fn total_duration_of(exercises: &[Exercise]) -> Option<u32> {
    exercises
        .iter()
        .try_fold(0u32, |total, e| total.checked_add(e.duration.checked_mul(e.sets)?))
}

/// In-memory result of generation, before it becomes a [`Workout`] record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutDraft {
    pub exercises: Vec<Exercise>,
    pub total_duration: u32,
    pub emotional_message: String,
    pub meal_suggestion: String,
    pub generated_by: Provenance,
}

/// A persisted workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub exercises: Vec<Exercise>,
    pub total_duration: u32,
    pub feeling: Feeling,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub emotional_message: String,
    pub meal_suggestion: String,
    pub generated_by: Provenance,
}

impl Workout {
    /// Turn a draft into a record, enforcing the workout invariants
    ///
    /// The exercise list must be non-empty, every exercise must last more than
    /// zero seconds, and `total_duration` must equal Σ duration × sets.
    pub fn from_draft(draft: WorkoutDraft, feeling: Feeling, now: DateTime<Utc>) -> Result<Self> {
        if draft.exercises.is_empty() {
            return Err(Error::InputValidation(
                "workout must contain at least one exercise".into(),
            ));
        }
        if let Some(bad) = draft.exercises.iter().find(|e| e.duration == 0) {
            return Err(Error::InputValidation(format!(
                "exercise '{}' has zero duration",
                bad.name
            )));
        }
        let expected = total_duration_of(&draft.exercises).ok_or_else(|| {
            Error::InputValidation("total exercise duration overflows".into())
        })?;
        if draft.total_duration != expected {
            return Err(Error::InputValidation(format!(
                "total duration {} does not match exercises ({})",
                draft.total_duration, expected
            )));
        }

        Ok(Workout {
            id: Uuid::new_v4(),
            created_at: now,
            exercises: draft.exercises,
            total_duration: draft.total_duration,
            feeling,
            completed: false,
            completed_at: None,
            emotional_message: draft.emotional_message,
            meal_suggestion: draft.meal_suggestion,
            generated_by: draft.generated_by,
        })
    }

    /// Mark the workout completed; a second call keeps the first timestamp
    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.completed_at = Some(at);
    }
}

// ============================================================================
// Profile, Check-in and Progress Types
// ============================================================================

/// Stored profile preferences
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub gender: Gender,
    pub goal: String,
    pub training_location: String,
    pub equipment: Vec<String>,
    /// Available minutes per session
    pub training_time: u32,
    pub last_period_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Cycle phase at `reference`, for female profiles with a last-period date
    pub fn cycle_phase_at(&self, reference: DateTime<Utc>) -> Option<CyclePhase> {
        match (self.gender, self.last_period_date) {
            (Gender::Female, Some(last)) => Some(crate::cycle::phase(last, reference)),
            _ => None,
        }
    }
}

/// One check-in per calendar day
///
/// The phase snapshot is always derived from the profile, so fields are
/// read-only outside this module.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCheckIn {
    date: NaiveDate,
    feeling: Feeling,
    cycle_phase: Option<CyclePhase>,
}

impl DailyCheckIn {
    pub fn new(date: NaiveDate, feeling: Feeling, profile: &UserProfile) -> Self {
        let cycle_phase = match (profile.gender, profile.last_period_date) {
            (Gender::Female, Some(last)) => Some(crate::cycle::phase_on(last, date)),
            _ => None,
        };
        DailyCheckIn {
            date,
            feeling,
            cycle_phase,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn feeling(&self) -> Feeling {
        self.feeling
    }

    pub fn cycle_phase(&self) -> Option<CyclePhase> {
        self.cycle_phase
    }
}

/// Aggregate counters, written by callers after a workout completes
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Progress {
    pub total_workouts: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl Progress {
    pub fn record_completion(&mut self) {
        self.total_workouts += 1;
        self.current_streak += 1;
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }
}

// ============================================================================
// Engine Input
// ============================================================================

/// Runtime context for workout generation
#[derive(Clone, Debug, PartialEq)]
pub struct UserContext {
    pub gender: Gender,
    pub feeling: Feeling,
    pub goal: String,
    pub equipment: Vec<String>,
    pub available_minutes: u32,
    pub training_location: String,
    pub cycle_phase: Option<CyclePhase>,
}

impl UserContext {
    /// Build the generation context from a stored profile and today's feeling
    pub fn from_profile(profile: &UserProfile, feeling: Feeling, now: DateTime<Utc>) -> Result<Self> {
        let ctx = UserContext {
            gender: profile.gender,
            feeling,
            goal: profile.goal.clone(),
            equipment: profile.equipment.clone(),
            available_minutes: profile.training_time,
            training_location: profile.training_location.clone(),
            cycle_phase: profile.cycle_phase_at(now),
        };
        ctx.validate()?;
        Ok(ctx)
    }

    pub fn validate(&self) -> Result<()> {
        if self.available_minutes == 0 {
            return Err(Error::InputValidation(
                "available training minutes must be greater than zero".into(),
            ));
        }
        if !self.feeling.is_offered_to(self.gender) {
            return Err(Error::InputValidation(format!(
                "feeling '{}' is not offered to gender '{}'",
                self.feeling, self.gender
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn female_profile(last_period: Option<NaiveDate>) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: Some("Ana".into()),
            gender: Gender::Female,
            goal: "Perder peso".into(),
            training_location: "Casa".into(),
            equipment: vec!["Halteres".into()],
            training_time: 20,
            last_period_date: last_period,
            created_at: Utc::now(),
        }
    }

    fn exercise(duration: u32, sets: u32) -> Exercise {
        Exercise {
            name: "Agachamento".into(),
            description: "Desça devagar".into(),
            duration,
            sets,
            reps: 10,
            intensity: IntensityTier::Medium,
        }
    }

    fn draft(exercises: Vec<Exercise>, total: u32) -> WorkoutDraft {
        WorkoutDraft {
            exercises,
            total_duration: total,
            emotional_message: "Vamos!".into(),
            meal_suggestion: "Omelete".into(),
            generated_by: Provenance::Local,
        }
    }

    #[test]
    fn test_feeling_tags_parse() {
        for feeling in Feeling::ALL {
            assert_eq!(feeling.tag().parse::<Feeling>().unwrap(), feeling);
        }
        assert!(matches!(
            "sleepy".parse::<Feeling>(),
            Err(Error::InputValidation(_))
        ));
    }

    #[test]
    fn test_feeling_serde_uses_kebab_tags() {
        let json = serde_json::to_string(&Feeling::MentallyTired).unwrap();
        assert_eq!(json, "\"mentally-tired\"");
    }

    #[test]
    fn test_stable_offered_to_both_genders() {
        assert!(Feeling::Stable.is_offered_to(Gender::Female));
        assert!(Feeling::Stable.is_offered_to(Gender::Male));
        assert!(!Feeling::Cramps.is_offered_to(Gender::Male));
        assert!(!Feeling::MaxMotivation.is_offered_to(Gender::Female));
    }

    #[test]
    fn test_from_draft_enforces_total_duration() {
        let ok = Workout::from_draft(draft(vec![exercise(90, 3)], 270), Feeling::Stable, Utc::now());
        assert!(ok.is_ok());

        let bad = Workout::from_draft(draft(vec![exercise(90, 3)], 200), Feeling::Stable, Utc::now());
        assert!(matches!(bad, Err(Error::InputValidation(_))));
    }

    #[test]
    fn test_from_draft_rejects_overflowing_total() {
        // 4294967295 × 2 wraps to 4294967294 without checked arithmetic
        let huge = draft(vec![exercise(u32::MAX, 2)], u32::MAX - 1);
        let result = Workout::from_draft(huge, Feeling::Stable, Utc::now());
        assert!(matches!(result, Err(Error::InputValidation(_))));

        assert_eq!(total_duration_of(&[exercise(u32::MAX, 1), exercise(1, 1)]), None);
        assert_eq!(total_duration_of(&[exercise(90, 3), exercise(60, 2)]), Some(390));
    }

    #[test]
    fn test_from_draft_rejects_empty_and_zero_duration() {
        let empty = Workout::from_draft(draft(vec![], 0), Feeling::Stable, Utc::now());
        assert!(empty.is_err());

        let zero = Workout::from_draft(draft(vec![exercise(0, 3)], 0), Feeling::Stable, Utc::now());
        assert!(zero.is_err());
    }

    #[test]
    fn test_mark_completed_keeps_first_timestamp() {
        let mut workout =
            Workout::from_draft(draft(vec![exercise(60, 2)], 120), Feeling::Stable, Utc::now())
                .unwrap();
        let first = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

        workout.mark_completed(first);
        workout.mark_completed(second);

        assert!(workout.completed);
        assert_eq!(workout.completed_at, Some(first));
    }

    #[test]
    fn test_check_in_phase_derived_from_profile() {
        let last = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let profile = female_profile(Some(last));
        let day = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();

        let check_in = DailyCheckIn::new(day, Feeling::Stable, &profile);
        assert_eq!(check_in.cycle_phase(), Some(CyclePhase::Follicular));

        let mut male = profile.clone();
        male.gender = Gender::Male;
        let check_in = DailyCheckIn::new(day, Feeling::Stable, &male);
        assert_eq!(check_in.cycle_phase(), None);
    }

    #[test]
    fn test_progress_tracks_longest_streak() {
        let mut progress = Progress {
            total_workouts: 4,
            current_streak: 0,
            longest_streak: 2,
        };
        progress.record_completion();
        assert_eq!(progress.longest_streak, 2);
        progress.record_completion();
        progress.record_completion();
        assert_eq!(progress.total_workouts, 7);
        assert_eq!(progress.current_streak, 3);
        assert_eq!(progress.longest_streak, 3);
    }

    #[test]
    fn test_context_validation() {
        let profile = female_profile(None);
        let now = Utc::now();

        assert!(UserContext::from_profile(&profile, Feeling::Cramps, now).is_ok());
        assert!(matches!(
            UserContext::from_profile(&profile, Feeling::Stressed, now),
            Err(Error::InputValidation(_))
        ));

        let mut no_time = profile.clone();
        no_time.training_time = 0;
        assert!(matches!(
            UserContext::from_profile(&no_time, Feeling::Cramps, now),
            Err(Error::InputValidation(_))
        ));
    }
}
