//! Action enum: all user-initiated intents and internal events.

use plant_proto::{CareType, PlantId};

use crate::card::Control;

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Cards ────────────────────────────────────────────────────────────────
    /// A control on one plant's card was activated.
    Activate(PlantId, Control),
    /// Issue the care write for one plant.
    Care {
        plant_id: PlantId,
        care_type: CareType,
    },

    // ── Loader ───────────────────────────────────────────────────────────────
    Refresh,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,
    ToggleKeys,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Noop,
}
