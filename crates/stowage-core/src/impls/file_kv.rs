//! FileKvStore - 1 キー 1 ファイルの KV ストア
//!
//! # 実装詳細
//! - ファイル名はキーの小文字 hex
//!   → modelPath に `..` や `/` が含まれていてもルート外に書き込まない
//!   → 大文字小文字を区別しないファイルシステム（APFS, NTFS）でも衝突しない
//! - set は一時ファイルに書いてから rename（キー単位で all-or-nothing）
//! - 存在しないファイルの delete は何もしない

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::FileKvStoreConfig;
use crate::ports::{KeyValueStore, StoreError};

/// Most filesystems reject longer names.
const FILE_NAME_LENGTH_MAX: usize = 255;
const TEMP_SUFFIX: &str = ".tmp";

/// FileKvStore はディレクトリ配下にキーごとのファイルを置く
#[derive(Debug, Clone)]
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    /// 設定を検証してストアを開く
    pub async fn open(config: FileKvStoreConfig) -> Result<Self, StoreError> {
        config.validate()?;

        if config.create_dirs {
            tokio::fs::create_dir_all(&config.root).await?;
        } else {
            let metadata = tokio::fs::metadata(&config.root).await?;
            if !metadata.is_dir() {
                return Err(StoreError::OperationFailed(format!(
                    "file store root '{}' is not a directory",
                    config.root.display()
                )));
            }
        }

        tracing::debug!(root = %config.root.display(), "opened file store");
        Ok(Self { root: config.root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let name = hex::encode(key.as_bytes());
        if name.len() + TEMP_SUFFIX.len() > FILE_NAME_LENGTH_MAX {
            return Err(StoreError::OperationFailed(format!(
                "key is too long for a file name ({} bytes)",
                key.len()
            )));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileKvStore {
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let mut temp = path.clone().into_os_string();
        temp.push(TEMP_SUFFIX);
        let temp = PathBuf::from(temp);

        tokio::fs::write(&temp, value.as_bytes()).await?;
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_in(dir: &TempDir) -> FileKvStore {
        FileKvStore::open(FileKvStoreConfig::at(dir.path())).await.unwrap()
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir).await;

        store
            .set("tensorflowjs_models/m1/info", "{}".to_string())
            .await
            .unwrap();

        let value = store.get("tensorflowjs_models/m1/info").await.unwrap();
        assert_eq!(value, Some("{}".to_string()));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        open_in(&dir)
            .await
            .set("k", "persisted".to_string())
            .await
            .unwrap();

        let reopened = open_in(&dir).await;
        assert_eq!(reopened.get("k").await.unwrap(), Some("persisted".to_string()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir).await;
        store.set("k", "v".to_string()).await.unwrap();

        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_keys_stay_inside_root() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir).await;

        store
            .set("tensorflowjs_models/../../escape/info", "x".to_string())
            .await
            .unwrap();

        let mut entries = std::fs::read_dir(dir.path()).unwrap();
        let entry = entries.next().unwrap().unwrap();
        assert!(entries.next().is_none());
        assert_eq!(entry.path().parent(), Some(dir.path()));
    }

    #[tokio::test]
    async fn test_file_names_ignore_case_folding() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir).await;

        let lower = store.path_for("tensorflowjs_models/a/info").unwrap();
        let upper = store.path_for("tensorflowjs_models/G/info").unwrap();
        let folded = |p: &Path| p.to_string_lossy().to_lowercase();

        assert_ne!(folded(&lower), folded(&upper));
        assert_eq!(folded(&lower), lower.to_string_lossy());
    }

    #[tokio::test]
    async fn test_case_distinct_keys_keep_separate_values() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir).await;

        store.set("models/Net/info", "upper".to_string()).await.unwrap();
        store.set("models/net/info", "lower".to_string()).await.unwrap();

        assert_eq!(store.get("models/Net/info").await.unwrap(), Some("upper".to_string()));
        assert_eq!(store.get("models/net/info").await.unwrap(), Some("lower".to_string()));
    }

    #[tokio::test]
    async fn test_open_without_create_requires_existing_root() {
        let dir = TempDir::new().unwrap();
        let config = FileKvStoreConfig {
            root: dir.path().join("absent"),
            create_dirs: false,
        };

        let result = FileKvStore::open(config).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn test_overlong_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir).await;
        // hex doubles the length, so 130 bytes of key already exceed the limit.
        let key = "k".repeat(130);

        let result = store.set(&key, "v".to_string()).await;
        assert!(matches!(result, Err(StoreError::OperationFailed(_))));
    }
}
