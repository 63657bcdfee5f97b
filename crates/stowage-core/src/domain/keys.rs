//! Model path and the storage keys derived from it.
//!
//! 1 つの `ModelPath` は必ず 3 つのキー（info / model_without_weight / weight_data）に
//! 対応します。キーの形式は永続化フォーマットの一部なので、変更してはいけません。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::StowageError;

/// Namespace shared by every key this crate writes.
pub const KEY_PREFIX: &str = "tensorflowjs_models";

const INFO_SUFFIX: &str = "info";
const MODEL_WITHOUT_WEIGHT_SUFFIX: &str = "model_without_weight";
const WEIGHT_DATA_SUFFIX: &str = "weight_data";

/// Caller-supplied identifier of one stored model.
///
/// Always non-empty. Separators inside the path are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelPath(String);

impl ModelPath {
    pub fn new(path: impl Into<String>) -> Result<Self, StowageError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(StowageError::InvalidArgument {
                reason: "model path must not be empty".to_string(),
            });
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for ModelPath {
    type Error = StowageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModelPath> for String {
    fn from(path: ModelPath) -> Self {
        path.0
    }
}

/// The three keys holding one model's persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub info: String,
    pub model_without_weight: String,
    pub weight_data: String,
}

impl StorageKeys {
    /// Pure function of the path; performs no I/O.
    pub fn for_path(path: &ModelPath) -> Self {
        let key = |suffix: &str| format!("{KEY_PREFIX}/{}/{suffix}", path.as_str());
        Self {
            info: key(INFO_SUFFIX),
            model_without_weight: key(MODEL_WITHOUT_WEIGHT_SUFFIX),
            weight_data: key(WEIGHT_DATA_SUFFIX),
        }
    }

    /// All keys in write order.
    pub fn all(&self) -> [&str; 3] {
        [
            self.info.as_str(),
            self.model_without_weight.as_str(),
            self.weight_data.as_str(),
        ]
    }
}
