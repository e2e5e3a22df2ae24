//! Per-plant card controller.
//!
//! Every plant on screen has its own `CardState`, keyed by plant id in
//! `CardStates`.  Two independent axes: the description can be shown or
//! hidden, and the care prompt walks `Idle → Confirming → (No) Idle` or
//! `Confirming → (Yes) write in flight → removed`.  A card never reads or
//! touches another card's state.

use std::collections::HashMap;

use plant_proto::{Plant, PlantId};
use tracing::debug;

use crate::action::Action;
use crate::pending::Pending;

/// The four affordances each card exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Info,
    Care,
    No,
    Yes,
}

impl Control {
    /// Visible label of the control for `plant`.
    pub fn label(self, plant: &Plant) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Care => plant.care_type.label(),
            Self::No => "No",
            Self::Yes => "Yes",
        }
    }

    pub fn hotkey(self, plant: &Plant) -> char {
        match self {
            Self::Info => 'i',
            Self::Care => plant.care_type.hotkey(),
            Self::No => 'n',
            Self::Yes => 'y',
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum WriteState {
    #[default]
    Idle,
    InFlight(Pending),
    /// Last write failed; the prompt stays open for another try.
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct CardState {
    pub description_visible: bool,
    pub confirm_visible: bool,
    pub write: WriteState,
}

impl CardState {
    pub fn is_writing(&self) -> bool {
        matches!(self.write, WriteState::InFlight(_))
    }

    /// Controls currently on screen for this card.
    pub fn visible_controls(&self) -> &'static [Control] {
        if self.confirm_visible {
            &[Control::Info, Control::Care, Control::No, Control::Yes]
        } else {
            &[Control::Info, Control::Care]
        }
    }

    /// Apply `control` and return the actions it produces.
    pub fn activate(&mut self, plant: &Plant, control: Control) -> Vec<Action> {
        debug!("card {}: {:?}", plant.id, control);
        match control {
            Control::Info => {
                self.description_visible = !self.description_visible;
            }
            Control::Care => {
                self.confirm_visible = true;
            }
            Control::No => {
                if self.confirm_visible && !self.is_writing() {
                    self.confirm_visible = false;
                    self.write = WriteState::Idle;
                }
            }
            Control::Yes => {
                if self.confirm_visible && !self.is_writing() {
                    self.write = WriteState::InFlight(Pending::start());
                    return vec![Action::Care {
                        plant_id: plant.id.clone(),
                        care_type: plant.care_type,
                    }];
                }
            }
        }
        vec![]
    }

    /// The write for this card failed.  Keep the prompt up with the reason.
    pub fn write_failed(&mut self, reason: String) {
        self.confirm_visible = true;
        self.write = WriteState::Failed(reason);
    }
}

/// Card state for every plant, keyed by id.
#[derive(Debug, Default)]
pub struct CardStates {
    cards: HashMap<PlantId, CardState>,
}

impl CardStates {
    /// State for `id`; untouched cards read as the default.
    pub fn get(&self, id: &PlantId) -> CardState {
        self.cards.get(id).cloned().unwrap_or_default()
    }

    pub fn get_mut(&mut self, id: &PlantId) -> &mut CardState {
        self.cards.entry(id.clone()).or_default()
    }

    /// State for `id` only if the card has been touched; never creates one.
    pub fn get_existing_mut(&mut self, id: &PlantId) -> Option<&mut CardState> {
        self.cards.get_mut(id)
    }

    pub fn remove(&mut self, id: &PlantId) {
        self.cards.remove(id);
    }

    /// Forget state for plants that are no longer listed.
    pub fn retain_plants(&mut self, plants: &[Plant]) {
        self.cards
            .retain(|id, _| plants.iter().any(|p| &p.id == id));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cards.len()
    }
}
