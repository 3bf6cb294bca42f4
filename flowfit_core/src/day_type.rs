//! "Type of day" recommendation shown on the dashboard.
//!
//! Display-only: the result never gates workout generation. The feeling
//! tables here are deliberately separate from [`crate::intensity`].
//!
//! Decision order, first match wins:
//! 1. Female with a known phase: menstrual phase or cramps/bloated → recovery;
//!    follicular phase or energized/max-energy → strength; ovulation → flow.
//!    Luteal with any other feeling falls through.
//! 2. Max-motivation/max-energy → strength; any low-energy feeling → recovery.
//! 3. Four or more completed workouts this week → recovery.
//! 4. Otherwise → flow.

use crate::{CyclePhase, Feeling, Gender};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workouts per week after which a recovery day is suggested
pub const OVERTRAINING_THRESHOLD: u32 = 4;

const PHASE_RECOVERY_FEELINGS: [Feeling; 2] = [Feeling::Cramps, Feeling::Bloated];
const PHASE_STRENGTH_FEELINGS: [Feeling; 2] = [Feeling::MaxEnergy, Feeling::Energized];
const STRENGTH_FEELINGS: [Feeling; 2] = [Feeling::MaxMotivation, Feeling::MaxEnergy];
const RECOVERY_FEELINGS: [Feeling; 7] = [
    Feeling::Cramps,
    Feeling::Bloated,
    Feeling::NoEnergy,
    Feeling::MentallyTired,
    Feeling::PhysicallyTired,
    Feeling::Stressed,
    Feeling::Unmotivated,
];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Recovery,
    Strength,
    Flow,
}

impl DayKind {
    pub fn name(self) -> &'static str {
        match self {
            DayKind::Recovery => "Recovery Day",
            DayKind::Strength => "Strength Day",
            DayKind::Flow => "Flow Day",
        }
    }

    pub fn color_theme(self) -> ColorTheme {
        match self {
            DayKind::Recovery => ColorTheme {
                from: "#E8CFC8",
                to: "#B7A6D8",
            },
            DayKind::Strength => ColorTheme {
                from: "#9DB8A0",
                to: "#5B8DEF",
            },
            DayKind::Flow => ColorTheme {
                from: "#5B8DEF",
                to: "#B7A6D8",
            },
        }
    }
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Two-stop gradient used by the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorTheme {
    pub from: &'static str,
    pub to: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayType {
    pub kind: DayKind,
    pub description: &'static str,
    pub color_theme: ColorTheme,
}

impl DayType {
    fn new(kind: DayKind, description: &'static str) -> Self {
        DayType {
            kind,
            description,
            color_theme: kind.color_theme(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

pub fn day_type(
    feeling: Feeling,
    cycle_phase: Option<CyclePhase>,
    week_workout_count: u32,
    gender: Gender,
) -> DayType {
    if let (Gender::Female, Some(phase)) = (gender, cycle_phase) {
        if phase == CyclePhase::Menstrual || PHASE_RECOVERY_FEELINGS.contains(&feeling) {
            return DayType::new(
                DayKind::Recovery,
                "Seu corpo pede descanso ativo. Vamos focar em movimentos suaves e alongamentos.",
            );
        }
        if phase == CyclePhase::Follicular || PHASE_STRENGTH_FEELINGS.contains(&feeling) {
            return DayType::new(
                DayKind::Strength,
                "Você está no seu auge! Hora de desafiar seus limites com treino intenso.",
            );
        }
        if phase == CyclePhase::Ovulation {
            return DayType::new(
                DayKind::Flow,
                "Energia equilibrada. Treino moderado com foco em resistência e cardio.",
            );
        }
    }

    if STRENGTH_FEELINGS.contains(&feeling) {
        return DayType::new(
            DayKind::Strength,
            "Motivação máxima! Vamos aproveitar essa energia para um treino intenso.",
        );
    }

    if RECOVERY_FEELINGS.contains(&feeling) {
        return DayType::new(
            DayKind::Recovery,
            "Seu corpo precisa de cuidado. Treino leve com foco em bem-estar.",
        );
    }

    if week_workout_count >= OVERTRAINING_THRESHOLD {
        return DayType::new(
            DayKind::Recovery,
            "Você está arrasando! Que tal um treino mais leve para recuperar?",
        );
    }

    DayType::new(
        DayKind::Flow,
        "Equilíbrio perfeito entre desafio e cuidado. Treino moderado e eficiente.",
    )
}
