//! ModelIoHandler port - モデルの保存・読み込み契約
//!
//! 上位のモデル API（シリアライズ層）はこの trait だけに依存します。

use async_trait::async_trait;

use crate::domain::{ModelArtifacts, SaveResult, StowageResult};

/// ModelIoHandler は ModelArtifacts を永続化する
///
/// # 使用例
/// ```ignore
/// let handler = kv_storage_io("my-model", InMemoryKvStore::new())?;
/// let result = handler.save(artifacts).await?;
/// let loaded = handler.load().await?;
/// ```
#[async_trait]
pub trait ModelIoHandler: Send + Sync {
    async fn save(&self, artifacts: ModelArtifacts) -> StowageResult<SaveResult>;

    async fn load(&self) -> StowageResult<ModelArtifacts>;
}
