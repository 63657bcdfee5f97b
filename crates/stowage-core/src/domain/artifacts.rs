//! Model artifact bundle as produced and consumed by the serialization layer.
//!
//! Only the topology and the weight buffer are interpreted here. Every other
//! field is carried through save/load unchanged, including fields this crate
//! does not know about (see [`ArtifactMetadata::extra`]).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{StowageError, StowageResult};
use super::info::ModelTopologyType;
use super::keys::ModelPath;

/// JSON field names with a typed slot in the stored record. `extra` must not reuse them.
pub const RESERVED_FIELDS: &[&str] = &[
    "modelTopology",
    "weightSpecs",
    "format",
    "generatedBy",
    "convertedBy",
    "trainingConfig",
    "signature",
    "userDefinedMetadata",
    "modelInitializer",
    "weightData",
];

/// Element type of a weight tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Float32,
    Int32,
    Bool,
    Complex64,
    String,
}

/// One entry of the weights manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightSpec {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization: Option<Value>,
}

impl WeightSpec {
    pub fn new(name: impl Into<String>, shape: Vec<usize>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype,
            group: None,
            quantization: None,
        }
    }
}

/// Model structure: JSON layers/graph, or an opaque binary blob.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTopology {
    Json(Value),
    Binary(Vec<u8>),
}

impl ModelTopology {
    pub fn topology_type(&self) -> ModelTopologyType {
        match self {
            ModelTopology::Json(_) => ModelTopologyType::Json,
            ModelTopology::Binary(_) => ModelTopologyType::GraphDef,
        }
    }
}

/// Auxiliary fields of the bundle. Opaque to the adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_specs: Option<Vec<WeightSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_defined_metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_initializer: Option<Value>,
    /// Fields written by other producers that have no typed slot above.
    /// Names listed in [`RESERVED_FIELDS`] are rejected on save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full bundle handed to `save` and returned by `load`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelArtifacts {
    pub model_topology: Option<ModelTopology>,
    pub metadata: ArtifactMetadata,
    pub weight_data: Option<Vec<u8>>,
}

impl ModelArtifacts {
    /// Bundle with a JSON topology and nothing else.
    pub fn with_json_topology(topology: Value) -> Self {
        Self {
            model_topology: Some(ModelTopology::Json(topology)),
            ..Self::default()
        }
    }

    pub fn weight_specs(mut self, specs: Vec<WeightSpec>) -> Self {
        self.metadata.weight_specs = Some(specs);
        self
    }

    pub fn weight_data(mut self, data: Vec<u8>) -> Self {
        self.weight_data = Some(data);
        self
    }

    /// Separate the weight buffer from everything else.
    ///
    /// Fails with `UnsupportedFormat` for a binary topology and with
    /// `InvalidArgument` when `extra` shadows a typed field. Performs no I/O.
    pub fn into_parts(
        self,
        model_path: &ModelPath,
    ) -> StowageResult<(ModelArtifactsWithoutWeights, Option<Vec<u8>>)> {
        let model_topology = match self.model_topology {
            Some(ModelTopology::Binary(_)) => {
                return Err(StowageError::UnsupportedFormat {
                    model_path: model_path.to_string(),
                    reason: "binary model topology is not supported by key-value storage"
                        .to_string(),
                });
            }
            Some(ModelTopology::Json(topology)) => Some(topology),
            None => None,
        };
        if let Some(name) = self
            .metadata
            .extra
            .keys()
            .find(|name| RESERVED_FIELDS.contains(&name.as_str()))
        {
            return Err(StowageError::InvalidArgument {
                reason: format!(
                    "extra metadata field '{name}' of model '{model_path}' shadows a typed field"
                ),
            });
        }
        let record = ModelArtifactsWithoutWeights {
            model_topology,
            metadata: self.metadata,
        };
        Ok((record, self.weight_data))
    }

    /// Inverse of [`ModelArtifacts::into_parts`].
    pub fn from_parts(record: ModelArtifactsWithoutWeights, weight_data: Vec<u8>) -> Self {
        Self {
            model_topology: record.model_topology.map(ModelTopology::Json),
            metadata: record.metadata,
            weight_data: Some(weight_data),
        }
    }
}

/// The record stored under the `model_without_weight` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelArtifactsWithoutWeights {
    /// A stored `null` stays `Some(Value::Null)`; only a missing field is `None`.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub model_topology: Option<Value>,
    #[serde(flatten)]
    pub metadata: ArtifactMetadata,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
