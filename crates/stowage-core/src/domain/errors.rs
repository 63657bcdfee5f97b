//! Errors - エラー型と分類
//!
//! save / load の失敗はすべて `StowageError` として呼び出し元に返します。
//! リトライは行いません（リトライ方針は呼び出し元の責務）。

use thiserror::Error;

use crate::ports::StoreError;

/// Result alias used across the crate.
pub type StowageResult<T> = Result<T, StowageError>;

/// Errors surfaced by the storage adapter.
#[derive(Debug, Error)]
pub enum StowageError {
    /// Empty or otherwise unusable model path.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Binary topology on save, or a non-JSON topology recorded at load.
    #[error("unsupported format for model '{model_path}': {reason}")]
    UnsupportedFormat { model_path: String, reason: String },

    /// A store write failed during save. Rollback has already been attempted.
    #[error("failed to save model artifacts to '{model_path}': {source}")]
    StorageWriteFailure {
        model_path: String,
        #[source]
        source: StoreError,
    },

    /// A store read failed during load.
    #[error("failed to read model artifacts from '{model_path}': {source}")]
    StorageReadFailure {
        model_path: String,
        #[source]
        source: StoreError,
    },

    #[error("cannot find model at path '{model_path}'")]
    ModelNotFound { model_path: String },

    /// Entries exist but are inconsistent with each other.
    #[error("corrupted model state at '{model_path}': {kind}")]
    CorruptedState {
        model_path: String,
        kind: CorruptionKind,
    },

    #[error("failed to serialize model artifacts: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What is wrong with a partially-present model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptionKind {
    #[error("weight data entry is missing")]
    MissingWeights,

    #[error("entry '{key}' is not valid JSON: {reason}")]
    MalformedEntry { key: String, reason: String },

    #[error("weight data is not valid base64: {reason}")]
    InvalidWeightEncoding { reason: String },
}

impl StowageError {
    pub(crate) fn corrupted(model_path: impl Into<String>, kind: CorruptionKind) -> Self {
        Self::CorruptedState {
            model_path: model_path.into(),
            kind,
        }
    }

    /// True for failures caused by stored data rather than by the store itself.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::CorruptedState { .. })
    }
}
