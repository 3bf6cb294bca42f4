//! Feeling → intensity tier classifier.
//!
//! This table is independent of the day-type advisor's own feeling table;
//! the two are allowed to disagree (e.g. `stable`).

use crate::{Feeling, IntensityTier};
use serde::{Deserialize, Serialize};
use std::fmt;

const LOW_ENERGY_FEELINGS: [Feeling; 7] = [
    Feeling::Cramps,
    Feeling::Bloated,
    Feeling::NoEnergy,
    Feeling::MentallyTired,
    Feeling::PhysicallyTired,
    Feeling::Stressed,
    Feeling::Unmotivated,
];

const HIGH_ENERGY_FEELINGS: [Feeling; 3] = [
    Feeling::MaxEnergy,
    Feeling::Energized,
    Feeling::MaxMotivation,
];

/// Emotional register of the messaging attached to a workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// "acolhedora"
    Welcoming,
    /// "motivadora"
    Motivating,
    /// "energética"
    Energetic,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Welcoming => "acolhedora",
            Tone::Motivating => "motivadora",
            Tone::Energetic => "energética",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub intensity: IntensityTier,
    pub tone: Tone,
}

pub fn classify(feeling: Feeling) -> Classification {
    if LOW_ENERGY_FEELINGS.contains(&feeling) {
        Classification {
            intensity: IntensityTier::Low,
            tone: Tone::Welcoming,
        }
    } else if HIGH_ENERGY_FEELINGS.contains(&feeling) {
        Classification {
            intensity: IntensityTier::High,
            tone: Tone::Energetic,
        }
    } else {
        Classification {
            intensity: IntensityTier::Medium,
            tone: Tone::Motivating,
        }
    }
}
