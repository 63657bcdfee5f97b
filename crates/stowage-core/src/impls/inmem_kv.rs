//! InMemoryKvStore - 開発用の KV ストア
//!
//! # 学習ポイント
//! - tokio::sync::RwLock による非同期の排他制御
//! - Arc による共有（clone しても同じデータを参照）

use crate::ports::{KeyValueStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// InMemoryKvStore はプロセス内の HashMap に保存する
///
/// clone したハンドルは同じデータを共有します（テストで adapter の外から
/// 中身を確認するため）。
#[derive(Debug, Clone, Default)]
pub struct InMemoryKvStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKvStore {
    /// 新しい空の InMemoryKvStore を作成
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// 保存済みキーの一覧（ソート済み）
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryKvStore {
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
