//! Configuration types for the bundled store implementations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ports::StoreError;

/// Default directory of a [`crate::impls::FileKvStore`], relative to the working directory.
pub const FILE_STORE_ROOT_DEFAULT: &str = "stowage-data";

/// Configuration for a file-backed key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileKvStoreConfig {
    /// Directory holding one file per key.
    pub root: PathBuf,

    /// Create `root` (and parents) when it does not exist.
    pub create_dirs: bool,
}

impl Default for FileKvStoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(FILE_STORE_ROOT_DEFAULT),
            create_dirs: true,
        }
    }
}

impl FileKvStoreConfig {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.root.as_os_str().is_empty() {
            return Err(StoreError::OperationFailed(
                "file store root must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
