//! In-memory plant-care backend.
//!
//! Holds an ordered plant list and behaves like the real service: caring for
//! a plant removes it from `plantsToCare` until its next suggested date.  It
//! records every call and can inject failures, which is what the `--demo`
//! mode and the UI tests rely on.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;
use tracing::info;

use crate::api::{ApiError, PlantApi};
use crate::model::{CareLog, CareType, Plant, PlantId};

/// Days until a cared-for plant shows up again.
pub const CARE_INTERVAL_DAYS: u64 = 7;

pub struct MemoryApi {
    plants: Mutex<Vec<Plant>>,
    latency: Duration,
    today: Option<NaiveDate>,
    failing_loads: AtomicUsize,
    failing_care: Mutex<HashSet<PlantId>>,
    load_calls: AtomicUsize,
    care_calls: Mutex<Vec<(PlantId, CareType)>>,
}

impl MemoryApi {
    pub fn new(plants: Vec<Plant>) -> Self {
        Self {
            plants: Mutex::new(plants),
            latency: Duration::ZERO,
            today: None,
            failing_loads: AtomicUsize::new(0),
            failing_care: Mutex::new(HashSet::new()),
            load_calls: AtomicUsize::new(0),
            care_calls: Mutex::new(Vec::new()),
        }
    }

    /// A small greenhouse for `--demo`.
    pub fn demo() -> Self {
        Self::new(demo_plants()).with_latency(Duration::from_millis(600))
    }

    /// Delay applied to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Pin the date written into care logs.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Make the next `n` reads fail.
    pub fn fail_next_loads(&self, n: usize) {
        self.failing_loads.store(n, Ordering::SeqCst);
    }

    /// Make every write for `plant_id` fail until `heal_care` is called.
    pub async fn fail_care_for(&self, plant_id: PlantId) {
        self.failing_care.lock().await.insert(plant_id);
    }

    pub async fn heal_care(&self, plant_id: &PlantId) {
        self.failing_care.lock().await.remove(plant_id);
    }

    /// Add (or re-add) a plant at the end of the list.
    pub async fn push_plant(&self, plant: Plant) {
        self.plants.lock().await.push(plant);
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub async fn care_calls(&self) -> Vec<(PlantId, CareType)> {
        self.care_calls.lock().await.clone()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn take_load_failure(&self) -> bool {
        self.failing_loads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl PlantApi for MemoryApi {
    async fn plants_to_care(&self) -> Result<Vec<Plant>, ApiError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.take_load_failure() {
            return Err(ApiError::Unavailable("An error occured".to_string()));
        }
        Ok(self.plants.lock().await.clone())
    }

    async fn care(&self, plant_id: &PlantId, care_type: CareType) -> Result<CareLog, ApiError> {
        self.care_calls
            .lock()
            .await
            .push((plant_id.clone(), care_type));
        self.simulate_latency().await;

        if self.failing_care.lock().await.contains(plant_id) {
            return Err(ApiError::Unavailable(format!(
                "could not record care for plant {}",
                plant_id
            )));
        }

        let mut plants = self.plants.lock().await;
        let pos = plants
            .iter()
            .position(|p| &p.id == plant_id)
            .ok_or_else(|| ApiError::UnknownPlant(plant_id.clone()))?;
        let plant = plants.remove(pos);
        info!("memory: {} {}", plant.name, care_type.past_tense());

        let performed_on = self.today.unwrap_or_else(|| Local::now().date_naive());
        Ok(CareLog {
            plant_id: plant.id,
            care_type,
            performed_on,
            next_suggested: performed_on + chrono::Days::new(CARE_INTERVAL_DAYS),
        })
    }

    fn describe(&self) -> String {
        "in-memory demo".to_string()
    }
}

fn demo_plant(id: &str, name: &str, description: &str, care_type: CareType) -> Plant {
    Plant {
        id: PlantId::new(id),
        name: name.to_string(),
        image_url: format!(
            "https://examples.com/{}.png",
            name.to_lowercase().replace(' ', "-")
        ),
        description: description.to_string(),
        care_type,
    }
}

pub fn demo_plants() -> Vec<Plant> {
    vec![
        demo_plant(
            "1",
            "Pancake plant",
            "A plant that grows pancakes every morning",
            CareType::Water,
        ),
        demo_plant("2", "UFO plant", "A plant that summons aliens", CareType::Clean),
        demo_plant(
            "3",
            "Monstera",
            "Big split leaves that collect dust faster than you would think",
            CareType::Clean,
        ),
        demo_plant(
            "4",
            "Snake plant",
            "Forgiving; water only when the soil is completely dry",
            CareType::Water,
        ),
    ]
}
