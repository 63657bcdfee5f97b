//! Domain model (artifacts, info, keys, errors).

pub mod artifacts;
pub mod errors;
pub mod info;
pub mod keys;

pub use self::artifacts::{
    ArtifactMetadata, DataType, ModelArtifacts, ModelArtifactsWithoutWeights, ModelTopology,
    WeightSpec,
};
pub use self::errors::{CorruptionKind, StowageError, StowageResult};
pub use self::info::{ModelArtifactsInfo, ModelTopologyType, SaveResult};
pub use self::keys::{KEY_PREFIX, ModelPath, StorageKeys};
