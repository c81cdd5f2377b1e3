use serde::{Deserialize, Serialize};

use crate::error::{TrendsError, TrendsResult};
use crate::render::{ChartDescription, ChartSurface};

use super::{EngineSnapshot, TrendsEngine};

pub const ENGINE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;
pub const CHART_DESCRIPTION_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: EngineSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptionJsonContractV1 {
    pub schema_version: u32,
    pub description: ChartDescription,
}

impl EngineSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> TrendsResult<String> {
        let payload = EngineSnapshotJsonContractV1 {
            schema_version: ENGINE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            TrendsError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> TrendsResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<EngineSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: EngineSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            TrendsError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != ENGINE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(TrendsError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl ChartDescription {
    pub fn to_json_pretty(&self) -> TrendsResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TrendsError::InvalidData(format!("failed to serialize chart description: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> TrendsResult<String> {
        let payload = ChartDescriptionJsonContractV1 {
            schema_version: CHART_DESCRIPTION_JSON_SCHEMA_V1,
            description: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            TrendsError::InvalidData(format!(
                "failed to serialize chart description contract v1: {e}"
            ))
        })
    }

    pub fn from_json_compat_str(input: &str) -> TrendsResult<Self> {
        if let Ok(description) = serde_json::from_str::<ChartDescription>(input) {
            return Ok(description);
        }
        let payload: ChartDescriptionJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            TrendsError::InvalidData(format!("failed to parse chart description payload: {e}"))
        })?;
        if payload.schema_version != CHART_DESCRIPTION_JSON_SCHEMA_V1 {
            return Err(TrendsError::InvalidData(format!(
                "unsupported chart description schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.description)
    }
}

impl<S: ChartSurface> TrendsEngine<S> {
    pub fn snapshot_json_contract_v1_pretty(&self) -> TrendsResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }

    /// Last rendered description as a versioned contract, if anything was drawn.
    pub fn chart_description_json_contract_v1_pretty(&self) -> TrendsResult<Option<String>> {
        self.chart_description()
            .map(ChartDescription::to_json_contract_v1_pretty)
            .transpose()
    }
}
