//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this but never mutate it.
//! The App event loop is the only thing that writes to AppState.

use plant_proto::config::RefreshStrategy;

use crate::loader::PlantListLoader;
use crate::widgets::status_bar::InputMode;

pub struct AppState {
    /// The plants-to-care read and its current outcome.
    pub loader: PlantListLoader,
    /// Where requests go (endpoint URL or "in-memory demo").
    pub backend: String,
    pub input_mode: InputMode,
}

impl AppState {
    pub fn new(backend: String, refresh: RefreshStrategy) -> Self {
        Self {
            loader: PlantListLoader::new(refresh),
            backend,
            input_mode: InputMode::Browse,
        }
    }
}
