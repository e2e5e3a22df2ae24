//! The plant-care capability and its GraphQL-over-HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::model::{CareLog, CareType, Plant, PlantId};
use crate::protocol::{
    CleanPlantData, GraphqlRequest, GraphqlResponse, PlantsToCareData, WaterPlantData,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("{0}")]
    Graphql(String),
    #[error("response carried no data")]
    MissingData,
    #[error("unknown plant {0}")]
    UnknownPlant(PlantId),
    #[error("{0}")]
    Unavailable(String),
}

/// Read and write operations the UI needs from the backend.
///
/// Implementations must be cheap to share; the UI holds one behind an `Arc`
/// and calls it from spawned tasks.
#[async_trait]
pub trait PlantApi: Send + Sync + 'static {
    /// Plants that need watering or cleaning, in backend order.
    async fn plants_to_care(&self) -> Result<Vec<Plant>, ApiError>;

    /// Record that `plant_id` received `care_type`.
    async fn care(&self, plant_id: &PlantId, care_type: CareType) -> Result<CareLog, ApiError>;

    /// Short human-readable description of where requests go.
    fn describe(&self) -> String;
}

pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphqlClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(&self, request: &GraphqlRequest) -> Result<T, ApiError> {
        debug!("graphql: {} -> {}", request.operation_name, self.endpoint);
        let response = self
            .http
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("graphql: {} returned status {}", request.operation_name, status);
            return Err(ApiError::Status(status.as_u16()));
        }

        let envelope: GraphqlResponse<T> = response.json().await?;
        envelope.into_result().inspect_err(|e| {
            warn!("graphql: {} failed: {}", request.operation_name, e);
        })
    }
}

#[async_trait]
impl PlantApi for GraphqlClient {
    async fn plants_to_care(&self) -> Result<Vec<Plant>, ApiError> {
        let data: PlantsToCareData = self.execute(&GraphqlRequest::plants_to_care()).await?;
        Ok(data.plants_to_care)
    }

    async fn care(&self, plant_id: &PlantId, care_type: CareType) -> Result<CareLog, ApiError> {
        let request = GraphqlRequest::care(plant_id, care_type);
        let log: CareLog = match care_type {
            CareType::Water => self.execute::<WaterPlantData>(&request).await?.into(),
            CareType::Clean => self.execute::<CleanPlantData>(&request).await?.into(),
        };
        if &log.plant_id != plant_id {
            warn!(
                "graphql: {} log is for plant {} (asked for {})",
                request.operation_name, log.plant_id, plant_id
            );
        }
        Ok(log)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}
