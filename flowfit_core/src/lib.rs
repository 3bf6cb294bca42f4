#![forbid(unsafe_code)]

//! Core domain model and workout generation for FlowFit.
//!
//! This crate provides:
//! - Domain types (feelings, cycle phases, exercises, workouts, profiles)
//! - Cycle phase and intensity classification
//! - The exercise catalog and local generator
//! - Remote generation with local fallback
//! - Day-type advice
//! - Persistence (JSONL history, JSON documents, CSV export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod cycle;
pub mod intensity;
pub mod local;
pub mod remote;
pub mod engine;
pub mod day_type;
pub mod store;
pub mod jsonl;
pub mod state;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, Catalog};
pub use config::{Config, DataPaths};
pub use intensity::{classify, Classification, Tone};
pub use local::generate_local;
pub use remote::{CompletionClient, CompletionService, RemoteGenerationError};
pub use engine::Orchestrator;
pub use day_type::{day_type, DayKind, DayType};
pub use store::{CheckInStore, HistoryStore, ProfileStore, ProgressStore};
pub use jsonl::{FileCheckInStore, FileHistoryStore};
pub use state::{FileProfileStore, FileProgressStore};
