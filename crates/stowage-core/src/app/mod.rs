//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **KvStorageIo**: ModelIoHandler の KV ストア実装（save / load / remove）
//! - **codec**: 各エントリの JSON / base64 変換

pub mod codec;
pub mod kv_storage_io;

// 主要な型を再エクスポート
pub use self::kv_storage_io::{KvStorageIo, kv_storage_io};
