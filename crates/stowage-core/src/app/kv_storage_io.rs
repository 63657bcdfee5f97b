//! KvStorageIo - ModelArtifacts を KV ストアの 3 エントリとして保存
//!
//! # 保存レイアウト
//! - `tensorflowjs_models/{path}/info`: ModelArtifactsInfo（JSON）
//! - `tensorflowjs_models/{path}/model_without_weight`: weight 以外のすべて（JSON）
//! - `tensorflowjs_models/{path}/weight_data`: weight バイト列（base64）
//!
//! # 既知の制約
//! - 3 つの書き込みはアトミックではない。save と load を同じ path で並行に
//!   実行すると、途中状態（1〜2 エントリだけ更新済み）が見える
//! - 書き込み失敗時のロールバック（3 キーの delete）もベストエフォート。
//!   delete の失敗はログに残すだけでエラーにはしない
//! - path ごとの排他は呼び出し側の責務

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, warn};

use super::codec;
use crate::domain::{
    CorruptionKind, ModelArtifacts, ModelArtifactsInfo, ModelArtifactsWithoutWeights,
    ModelPath, ModelTopologyType, SaveResult, StorageKeys, StowageError, StowageResult,
};
use crate::ports::{Clock, KeyValueStore, ModelIoHandler, StoreError, SystemClock};

/// Create a handler storing the model at `model_path` in `store`.
pub fn kv_storage_io<S: KeyValueStore>(
    model_path: impl Into<String>,
    store: S,
) -> StowageResult<KvStorageIo<S>> {
    KvStorageIo::new(model_path, store)
}

/// KvStorageIo は 1 つの modelPath に対する save / load を提供
///
/// ストアと時刻はフィールドとして所有します（グローバルな共有状態は持たない）。
pub struct KvStorageIo<S, C = SystemClock> {
    model_path: ModelPath,
    keys: StorageKeys,
    store: S,
    clock: C,
}

impl<S: KeyValueStore> KvStorageIo<S> {
    /// Fails with `InvalidArgument` for an empty path. Performs no I/O.
    pub fn new(model_path: impl Into<String>, store: S) -> StowageResult<Self> {
        let model_path = ModelPath::new(model_path)?;
        let keys = StorageKeys::for_path(&model_path);
        Ok(Self {
            model_path,
            keys,
            store,
            clock: SystemClock,
        })
    }
}

impl<S, C> KvStorageIo<S, C> {
    /// Replace the clock used for `dateSaved`.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> KvStorageIo<S, C2> {
        KvStorageIo {
            model_path: self.model_path,
            keys: self.keys,
            store: self.store,
            clock,
        }
    }

    pub fn model_path(&self) -> &ModelPath {
        &self.model_path
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore, C: Clock> KvStorageIo<S, C> {
    /// Delete all three entries of this model. Deleting a missing model is a no-op.
    #[instrument(skip(self), fields(model_path = %self.model_path), level = "info")]
    pub async fn remove(&self) -> StowageResult<()> {
        let mut first_error = None;
        for key in self.keys.all() {
            if let Err(e) = self.store.delete(key).await {
                warn!(key, error = %e, "failed to delete entry");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(source) => Err(self.write_failure(source)),
            None => Ok(()),
        }
    }

    async fn write_entries(&self, entries: [(&str, String); 3]) -> Result<(), StoreError> {
        for (key, value) in entries {
            debug!(key, bytes = value.len(), "writing entry");
            self.store.set(key, value).await?;
        }
        Ok(())
    }

    /// Compensating deletes after a failed save. Each delete is independent.
    async fn rollback(&self) {
        for key in self.keys.all() {
            match self.store.delete(key).await {
                Ok(()) => debug!(key, "rolled back entry"),
                Err(e) => warn!(key, error = %e, "rollback delete failed, entry may remain"),
            }
        }
    }

    async fn read(&self, key: &str) -> StowageResult<Option<String>> {
        debug!(key, "reading entry");
        self.store
            .get(key)
            .await
            .map_err(|source| StowageError::StorageReadFailure {
                model_path: self.model_path.to_string(),
                source,
            })
    }

    fn decode_entry<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
        text: &str,
    ) -> StowageResult<T> {
        codec::decode_json(key, text)
            .map_err(|kind| StowageError::corrupted(self.model_path.as_str(), kind))
    }

    fn write_failure(&self, source: StoreError) -> StowageError {
        StowageError::StorageWriteFailure {
            model_path: self.model_path.to_string(),
            source,
        }
    }
}

#[async_trait]
impl<S: KeyValueStore, C: Clock> ModelIoHandler for KvStorageIo<S, C> {
    #[instrument(skip(self, artifacts), fields(model_path = %self.model_path), level = "info")]
    async fn save(&self, artifacts: ModelArtifacts) -> StowageResult<SaveResult> {
        // Checked before any I/O.
        let (record, weight_data) = artifacts.into_parts(&self.model_path)?;

        let weight_data = weight_data.unwrap_or_default();
        let model_artifacts_info =
            ModelArtifactsInfo::describe(&record, Some(weight_data.as_slice()), self.clock.now())?;

        let entries = [
            (self.keys.info.as_str(), codec::encode_json(&model_artifacts_info)?),
            (
                self.keys.model_without_weight.as_str(),
                codec::encode_json(&record)?,
            ),
            (
                self.keys.weight_data.as_str(),
                codec::encode_weights(&weight_data),
            ),
        ];

        if let Err(source) = self.write_entries(entries).await {
            error!(error = %source, "failed to save model artifacts, rolling back");
            self.rollback().await;
            return Err(self.write_failure(source));
        }

        info!(
            weight_data_bytes = model_artifacts_info.weight_data_bytes,
            "saved model artifacts"
        );
        Ok(SaveResult {
            model_artifacts_info,
        })
    }

    #[instrument(skip(self), fields(model_path = %self.model_path), level = "info")]
    async fn load(&self) -> StowageResult<ModelArtifacts> {
        let info: Map<String, Value> = match self.read(&self.keys.info).await? {
            Some(text) => self.decode_entry(&self.keys.info, &text)?,
            None => Map::new(),
        };
        if info.is_empty() {
            return Err(StowageError::ModelNotFound {
                model_path: self.model_path.to_string(),
            });
        }

        if ModelTopologyType::from_info_record(&info) != Some(ModelTopologyType::Json) {
            let recorded = info.get("modelTopologyType").cloned().unwrap_or(Value::Null);
            return Err(StowageError::UnsupportedFormat {
                model_path: self.model_path.to_string(),
                reason: format!("loading model topology of type {recorded} is not implemented"),
            });
        }

        let record: ModelArtifactsWithoutWeights =
            match self.read(&self.keys.model_without_weight).await? {
                Some(text) => self.decode_entry(&self.keys.model_without_weight, &text)?,
                None => {
                    warn!("model_without_weight entry missing, using an empty record");
                    ModelArtifactsWithoutWeights::default()
                }
            };

        let Some(encoded) = self.read(&self.keys.weight_data).await? else {
            return Err(StowageError::corrupted(
                self.model_path.as_str(),
                CorruptionKind::MissingWeights,
            ));
        };
        let weight_data = codec::decode_weights(&encoded)
            .map_err(|kind| StowageError::corrupted(self.model_path.as_str(), kind))?;

        info!(weight_data_bytes = weight_data.len(), "loaded model artifacts");
        Ok(ModelArtifacts::from_parts(record, weight_data))
    }
}
