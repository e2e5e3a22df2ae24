//! Plant list loader: owns the "plants to care for" read and its outcome.
//!
//! Load cycles are numbered.  Only one read is ever outstanding; asking for
//! another while one is on the wire queues a single follow-up, issued once the
//! current one resolves.  Results carrying an old generation are dropped.
//!
//! A plant cared for while a read is on the wire stays hidden: that read was
//! issued before the write landed, so its copy of the plant is filtered out.

use std::collections::HashSet;

use plant_proto::config::RefreshStrategy;
use plant_proto::{Plant, PlantId};
use tracing::{debug, info, warn};

use crate::pending::Pending;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Error(String),
    Loaded(Vec<Plant>),
}

pub struct PlantListLoader {
    state: LoadState,
    strategy: RefreshStrategy,
    generation: u64,
    in_flight: Option<Pending>,
    queued: bool,
    /// Cared for while the outstanding read was already on the wire.
    cared_during_read: HashSet<PlantId>,
}

impl PlantListLoader {
    pub fn new(strategy: RefreshStrategy) -> Self {
        Self {
            state: LoadState::Loading,
            strategy,
            generation: 0,
            in_flight: None,
            queued: false,
            cared_during_read: HashSet::new(),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Plants currently on screen (empty unless loaded).
    pub fn plants(&self) -> &[Plant] {
        match &self.state {
            LoadState::Loaded(plants) => plants,
            _ => &[],
        }
    }

    pub fn plant(&self, id: &PlantId) -> Option<&Plant> {
        self.plants().iter().find(|p| &p.id == id)
    }

    /// The outstanding read, if any.
    pub fn in_flight(&self) -> Option<&Pending> {
        self.in_flight.as_ref()
    }

    /// True while a read is out and the previous list is still shown.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some() && matches!(self.state, LoadState::Loaded(_))
    }

    /// Start a load cycle.  Returns the generation to tag the request with,
    /// or `None` when a read is already outstanding (a follow-up is queued).
    pub fn begin(&mut self) -> Option<u64> {
        if self.in_flight.is_some() {
            debug!("loader: read already in flight, queueing follow-up");
            self.queued = true;
            return None;
        }
        self.generation += 1;
        self.in_flight = Some(Pending::start());
        if matches!(self.state, LoadState::Error(_)) {
            self.state = LoadState::Loading;
        }
        debug!("loader: begin generation {}", self.generation);
        Some(self.generation)
    }

    /// Apply the outcome of generation `generation`.  Returns `true` when a
    /// queued follow-up read should be issued now.
    pub fn finish(&mut self, generation: u64, result: Result<Vec<Plant>, String>) -> bool {
        if generation != self.generation || self.in_flight.is_none() {
            warn!("loader: dropping stale result for generation {}", generation);
            return false;
        }
        self.in_flight = None;
        let hidden = std::mem::take(&mut self.cared_during_read);
        match result {
            Ok(mut plants) => {
                if !hidden.is_empty() {
                    debug!("loader: hiding {} plants cared for mid-read", hidden.len());
                    plants.retain(|p| !hidden.contains(&p.id));
                }
                info!("loader: {} plants need care", plants.len());
                self.state = LoadState::Loaded(plants);
            }
            Err(e) => {
                warn!("loader: read failed: {}", e);
                self.state = LoadState::Error(e);
            }
        }
        std::mem::take(&mut self.queued)
    }

    /// Drop one plant from the visible list.  Returns whether it was present.
    pub fn remove(&mut self, id: &PlantId) -> bool {
        if let LoadState::Loaded(plants) = &mut self.state {
            let before = plants.len();
            plants.retain(|p| &p.id != id);
            return plants.len() != before;
        }
        false
    }

    /// React to a successful write for `id`.  The plant disappears right away;
    /// with `Refetch` a read is started too, returning its generation.
    pub fn after_care(&mut self, id: &PlantId) -> Option<u64> {
        self.remove(id);
        if self.in_flight.is_some() {
            self.cared_during_read.insert(id.clone());
        }
        match self.strategy {
            RefreshStrategy::Local => None,
            RefreshStrategy::Refetch => self.begin(),
        }
    }
}
