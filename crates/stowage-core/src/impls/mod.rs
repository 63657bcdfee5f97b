//! Impls - KeyValueStore の実装
//!
//! # 含まれる実装
//! - **InMemoryKvStore**: 開発用・テスト用
//! - **FileKvStore**: ローカルファイルによる永続化
//! - **FaultyKvStore**: 障害注入用のラッパー
//!
//! モバイル端末のネイティブ KV エンジンへのバインディングは、
//! `KeyValueStore` を実装した別クレートとして提供する想定です。

pub mod faulty_kv;
pub mod file_kv;
pub mod inmem_kv;

// 主要な型を再エクスポート
pub use self::faulty_kv::{Fault, FaultyKvStore};
pub use self::file_kv::FileKvStore;
pub use self::inmem_kv::InMemoryKvStore;
