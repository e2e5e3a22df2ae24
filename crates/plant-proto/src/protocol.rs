//! GraphQL wire protocol: operation documents, request/response envelopes and
//! the payload shapes returned by the plant-care backend.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::model::{CareLog, CareType, Plant, PlantId};

pub const PLANTS_TO_CARE_QUERY: &str =
    "query PlantsToCare { plantsToCare { id name imageUrl description careType } }";

pub const WATER_PLANT_MUTATION: &str = "mutation WaterPlant($plantId: ID!) { \
     waterPlant(plantId: $plantId) { wateringLog { plant { id } waterDate nextSuggestedDate } } }";

pub const CLEAN_PLANT_MUTATION: &str = "mutation CleanPlant($plantId: ID!) { \
     cleanPlant(plantId: $plantId) { cleaningLog { plant { id } cleanDate nextSuggestedDate } } }";

/// A GraphQL POST body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub operation_name: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

impl GraphqlRequest {
    pub fn plants_to_care() -> Self {
        Self {
            operation_name: "PlantsToCare".to_string(),
            query: PLANTS_TO_CARE_QUERY.to_string(),
            variables: None,
        }
    }

    /// Build the write request for `care_type`, keyed by `plantId`.
    pub fn care(plant_id: &PlantId, care_type: CareType) -> Self {
        let (operation_name, query) = match care_type {
            CareType::Water => ("WaterPlant", WATER_PLANT_MUTATION),
            CareType::Clean => ("CleanPlant", CLEAN_PLANT_MUTATION),
        };
        Self {
            operation_name: operation_name.to_string(),
            query: query.to_string(),
            variables: Some(serde_json::json!({ "plantId": plant_id })),
        }
    }

    /// The `plantId` variable, if this is a write request.
    pub fn plant_id(&self) -> Option<PlantId> {
        self.variables
            .as_ref()?
            .get("plantId")?
            .as_str()
            .map(PlantId::new)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// The `{ data, errors }` response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl<T: DeserializeOwned> GraphqlResponse<T> {
    /// Any reported error fails the whole operation, even alongside data.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.errors.is_empty() {
            let joined = self
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::Graphql(joined));
        }
        self.data.ok_or(ApiError::MissingData)
    }
}

// ── Payloads ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantsToCareData {
    pub plants_to_care: Vec<Plant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlantRef {
    pub id: PlantId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WateringLog {
    pub plant: PlantRef,
    pub water_date: NaiveDate,
    pub next_suggested_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningLog {
    pub plant: PlantRef,
    pub clean_date: NaiveDate,
    pub next_suggested_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterPlantPayload {
    pub watering_log: WateringLog,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanPlantPayload {
    pub cleaning_log: CleaningLog,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterPlantData {
    pub water_plant: WaterPlantPayload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanPlantData {
    pub clean_plant: CleanPlantPayload,
}

impl From<WaterPlantData> for CareLog {
    fn from(data: WaterPlantData) -> Self {
        let log = data.water_plant.watering_log;
        CareLog {
            plant_id: log.plant.id,
            care_type: CareType::Water,
            performed_on: log.water_date,
            next_suggested: log.next_suggested_date,
        }
    }
}

impl From<CleanPlantData> for CareLog {
    fn from(data: CleanPlantData) -> Self {
        let log = data.clean_plant.cleaning_log;
        CareLog {
            plant_id: log.plant.id,
            care_type: CareType::Clean,
            performed_on: log.clean_date,
            next_suggested: log.next_suggested_date,
        }
    }
}
