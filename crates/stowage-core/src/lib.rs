//! stowage-core
//!
//! Persist model artifacts (topology, weight specs, weight bytes) in a
//! string key-value store, one model per path, three entries per model.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（artifacts, info, keys, errors）
//! - **ports**: 抽象化レイヤー（KeyValueStore, Clock, ModelIoHandler）
//! - **app**: アプリケーションロジック（KvStorageIo, codec）
//! - **impls**: KeyValueStore の実装（InMemory, File, 障害注入）
//! - **config**: ストア実装の設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{KvStorageIo, kv_storage_io};
pub use domain::{
    ModelArtifacts, ModelArtifactsInfo, ModelTopology, SaveResult, StowageError, StowageResult,
};
pub use ports::{KeyValueStore, ModelIoHandler};
