//! Shared data model, wire protocol and API clients for plantcare.

pub mod api;
pub mod config;
pub mod memory;
pub mod model;
pub mod platform;
pub mod protocol;

pub use api::{ApiError, GraphqlClient, PlantApi};
pub use memory::MemoryApi;
pub use model::{CareLog, CareType, Plant, PlantId};
