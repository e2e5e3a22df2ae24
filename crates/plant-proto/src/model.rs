use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque, stable identity of a plant as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(String);

impl PlantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Which care action a plant is waiting for.
///
/// Everything that differs between watering and cleaning hangs off this enum:
/// the control label, the confirmation question and the mutation issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CareType {
    Water,
    Clean,
}

impl CareType {
    /// Label of the control that opens the confirmation prompt.
    pub fn label(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Clean => "clean",
        }
    }

    pub fn question(self) -> &'static str {
        match self {
            Self::Water => "Watered?",
            Self::Clean => "Cleaned?",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Water => "watered",
            Self::Clean => "cleaned",
        }
    }

    /// Keyboard shortcut for the care control.
    pub fn hotkey(self) -> char {
        match self {
            Self::Water => 'w',
            Self::Clean => 'c',
        }
    }
}

/// A houseplant that currently needs care.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    /// Display-only.
    pub image_url: String,
    pub description: String,
    pub care_type: CareType,
}

/// Confirmation of a successful water/clean mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareLog {
    pub plant_id: PlantId,
    pub care_type: CareType,
    pub performed_on: NaiveDate,
    pub next_suggested: NaiveDate,
}
