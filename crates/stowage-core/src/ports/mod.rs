//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（KV ストレージ、時刻、上位のモデル API）への
//! インターフェースを提供し、実装の詳細を隠蔽します。

pub mod clock;
pub mod io_handler;
pub mod kv_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::io_handler::ModelIoHandler;
pub use self::kv_store::{KeyValueStore, StoreError, StoreOp};
