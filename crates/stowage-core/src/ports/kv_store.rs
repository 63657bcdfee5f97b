//! KeyValueStore port - 文字列キー・文字列値のストレージ
//!
//! モバイル向けの高速 KV エンジン（またはその代替）を抽象化します。
//!
//! # 実装
//! - **InMemoryKvStore**: 開発用・テスト用
//! - **FileKvStore**: 1 キー 1 ファイルのローカル実装
//! - **FaultyKvStore**: 障害注入用のラッパー

use async_trait::async_trait;
use thiserror::Error;

/// StoreError は KV ストア操作のエラー
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store operation failed: {0}")]
    OperationFailed(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("injected {op} fault for key '{key}'")]
    InjectedFault { op: StoreOp, key: String },
}

/// 操作の種類（ログと障害注入で使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    Set,
    Delete,
}

impl std::fmt::Display for StoreOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StoreOp::Get => "get",
            StoreOp::Set => "set",
            StoreOp::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// KeyValueStore は文字列キーに文字列値を保存する
///
/// # 契約
/// - `set` はキー単位で all-or-nothing
/// - `get` は存在しないキーに対して `Ok(None)`
/// - `delete` は冪等（存在しないキーの削除はエラーではない）
/// - 複数キーにまたがるトランザクションは提供しない
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key).await
    }
}
