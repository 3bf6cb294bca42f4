//! Deterministic local workout generator.
//!
//! Used when the remote generator is unavailable. Exercise selection is a
//! prefix of the catalog for the tier, sized by a rough three-minutes-per-slot
//! rule. The only non-deterministic step is the emotional message pick, which
//! goes through a caller-supplied RNG so tests can seed it.

use crate::catalog::{get_default_catalog, Catalog};
use crate::types::{total_duration_of, Exercise, IntensityTier, Provenance, WorkoutDraft};
use rand::seq::SliceRandom;
use rand::Rng;

/// Wall-clock minutes budgeted per exercise slot
pub const MINUTES_PER_SLOT: u32 = 3;

/// Number of exercises selected for a time budget
///
/// `min(floor(available_minutes / 3), catalog_len)`. This is a heuristic, not
/// a scheduler: per-exercise duration and sets are not considered.
pub fn exercise_count(available_minutes: u32, catalog_len: usize) -> usize {
    ((available_minutes / MINUTES_PER_SLOT) as usize).min(catalog_len)
}

/// Generate a workout from the default catalog using the thread RNG
pub fn generate_local(intensity: IntensityTier, available_minutes: u32) -> WorkoutDraft {
    generate_local_with_rng(
        get_default_catalog(),
        intensity,
        available_minutes,
        &mut rand::thread_rng(),
    )
}

/// Generate a workout from `catalog`, picking the message with `rng`
///
/// `available_minutes = 0` yields an empty plan; callers that need a usable
/// workout must apply a floor first.
pub fn generate_local_with_rng<R: Rng + ?Sized>(
    catalog: &Catalog,
    intensity: IntensityTier,
    available_minutes: u32,
    rng: &mut R,
) -> WorkoutDraft {
    let templates = catalog.exercises_for(intensity);
    let count = exercise_count(available_minutes, templates.len());

    let exercises: Vec<Exercise> = templates[..count].iter().map(Exercise::from).collect();
    // Out-of-range catalog data surfaces later as a `from_draft` rejection
    let total_duration = total_duration_of(&exercises).unwrap_or(u32::MAX);

    tracing::debug!(
        "Local generation: {} tier, {} min → {} exercises ({}s)",
        intensity,
        available_minutes,
        count,
        total_duration
    );

    WorkoutDraft {
        exercises,
        total_duration,
        emotional_message: pick_message(catalog.messages_for(intensity), rng),
        meal_suggestion: catalog.meal_for(intensity).to_string(),
        generated_by: Provenance::Local,
    }
}

/// Uniform pick from a message pool (empty string for an empty pool)
pub fn pick_message<R: Rng + ?Sized>(pool: &[String], rng: &mut R) -> String {
    pool.choose(rng).cloned().unwrap_or_default()
}
