//! Workout generation orchestrator.
//!
//! Policy:
//! 1. Try the remote generator once (no retry, no backoff).
//! 2. On any failure, log the reason and generate locally from the same
//!    context.
//!
//! `generate_workout` therefore never fails and its worst-case latency is one
//! bounded network round trip.

use crate::config::{Config, GenerationConfig};
use crate::intensity::classify;
use crate::local::{generate_local, MINUTES_PER_SLOT};
use crate::remote::{encouragement_request, generate_remote, CompletionClient, CompletionService};
use crate::store::HistoryStore;
use crate::{Feeling, Provenance, Result, UserContext, Workout, WorkoutDraft};
use chrono::{DateTime, Utc};

const COMPLETED_FALLBACK: &str = "Você completou seu treino! Cada passo conta, e você está construindo algo incrível. Continue assim! 💜";
const SKIPPED_FALLBACK: &str = "Tudo bem não ter treinado hoje. O importante é que você está aqui, cuidando de si. Amanhã é um novo dia! 🌸";

pub struct Orchestrator {
    remote: Option<Box<dyn CompletionService>>,
    temperature: f32,
    min_training_minutes: u32,
}

impl Orchestrator {
    pub fn new(
        remote: Option<Box<dyn CompletionService>>,
        temperature: f32,
        generation: &GenerationConfig,
    ) -> Self {
        Self {
            remote,
            temperature,
            min_training_minutes: generation.min_training_minutes.max(MINUTES_PER_SLOT),
        }
    }

    /// Orchestrator that never calls out
    pub fn local_only(generation: &GenerationConfig) -> Self {
        Self::new(None, 0.0, generation)
    }

    /// Build from config; a missing API key degrades to local-only
    pub fn from_config(config: &Config) -> Self {
        let remote: Option<Box<dyn CompletionService>> = if config.remote.enabled {
            match CompletionClient::from_config(&config.remote) {
                Ok(client) => Some(Box::new(client)),
                Err(e) => {
                    tracing::warn!("Remote generation unavailable: {}. Using local generator only.", e);
                    None
                }
            }
        } else {
            tracing::info!("Remote generation disabled by config");
            None
        };

        Self::new(remote, config.remote.temperature, &config.generation)
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Produce a usable workout draft; never fails
    pub async fn generate_workout(&self, ctx: &UserContext) -> WorkoutDraft {
        if let Some(service) = &self.remote {
            match generate_remote(service.as_ref(), ctx, self.temperature).await {
                Ok(draft) => {
                    tracing::info!(
                        "Remote generator produced {} exercises ({}s)",
                        draft.exercises.len(),
                        draft.total_duration
                    );
                    return draft;
                }
                Err(e) => {
                    tracing::warn!("Remote generation failed, falling back to local: {}", e);
                }
            }
        }

        self.generate_fallback(ctx)
    }

    fn generate_fallback(&self, ctx: &UserContext) -> WorkoutDraft {
        let minutes = ctx.available_minutes.max(self.min_training_minutes);
        if minutes != ctx.available_minutes {
            tracing::warn!(
                "Raising available minutes from {} to {} for local generation",
                ctx.available_minutes,
                minutes
            );
        }

        let classification = classify(ctx.feeling);
        tracing::info!(
            "Local generation for '{}': {} intensity, {} tone",
            ctx.feeling,
            classification.intensity,
            classification.tone
        );

        let draft = generate_local(classification.intensity, minutes);
        debug_assert_eq!(draft.generated_by, Provenance::Local);
        draft
    }

    /// Generate a workout and append it to `history` as a new record
    ///
    /// Concurrent calls produce independent records; de-duplication is the
    /// caller's daily check-in gate.
    pub async fn generate_and_record(
        &self,
        ctx: &UserContext,
        history: &mut dyn HistoryStore,
        now: DateTime<Utc>,
    ) -> Result<Workout> {
        let draft = self.generate_workout(ctx).await;
        let workout = Workout::from_draft(draft, ctx.feeling, now)?;
        history.append_workout(&workout)?;
        tracing::info!(
            "Recorded workout {} ({})",
            workout.id,
            workout.generated_by
        );
        Ok(workout)
    }

    /// Short message after a workout is completed or skipped; never fails
    pub async fn completion_message(&self, feeling: Feeling, completed: bool) -> String {
        if let Some(service) = &self.remote {
            match service.complete(&encouragement_request(feeling, completed)).await {
                Ok(text) => return text.trim().to_string(),
                Err(e) => {
                    tracing::warn!("Remote message failed, using local message: {}", e);
                }
            }
        }

        if completed {
            COMPLETED_FALLBACK.to_string()
        } else {
            SKIPPED_FALLBACK.to_string()
        }
    }
}
