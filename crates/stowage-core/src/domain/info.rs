//! Summary info recorded on save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::artifacts::ModelArtifactsWithoutWeights;
use super::errors::StowageResult;

/// How the topology was encoded when the model was saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelTopologyType {
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "GraphDef")]
    GraphDef,
}

impl ModelTopologyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTopologyType::Json => "JSON",
            ModelTopologyType::GraphDef => "GraphDef",
        }
    }

    /// Reads `modelTopologyType` from a raw info record.
    pub fn from_info_record(record: &Map<String, Value>) -> Option<Self> {
        match record.get("modelTopologyType").and_then(Value::as_str) {
            Some("JSON") => Some(ModelTopologyType::Json),
            Some("GraphDef") => Some(ModelTopologyType::GraphDef),
            _ => None,
        }
    }
}

/// Stored under the `info` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelArtifactsInfo {
    pub date_saved: DateTime<Utc>,
    pub model_topology_type: ModelTopologyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_topology_bytes: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_specs_bytes: Option<usize>,
    pub weight_data_bytes: usize,
}

impl ModelArtifactsInfo {
    /// Describe a JSON-topology model. Byte counts are those of the JSON text.
    pub fn describe(
        record: &ModelArtifactsWithoutWeights,
        weight_data: Option<&[u8]>,
        date_saved: DateTime<Utc>,
    ) -> StowageResult<Self> {
        let model_topology_bytes = record
            .model_topology
            .as_ref()
            .map(|topology| serde_json::to_string(topology).map(|s| s.len()))
            .transpose()?;
        let weight_specs_bytes = record
            .metadata
            .weight_specs
            .as_ref()
            .map(|specs| serde_json::to_string(specs).map(|s| s.len()))
            .transpose()?;

        Ok(Self {
            date_saved,
            model_topology_type: ModelTopologyType::Json,
            model_topology_bytes,
            weight_specs_bytes,
            weight_data_bytes: weight_data.map_or(0, <[u8]>::len),
        })
    }
}

/// Returned by a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveResult {
    pub model_artifacts_info: ModelArtifactsInfo,
}
