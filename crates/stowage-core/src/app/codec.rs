//! Entry codec - 保存用テキスト表現との相互変換
//!
//! # 変換ルール
//! - info / model_without_weight: serde_json で JSON 文字列
//! - weight_data: 標準アルファベット（パディングあり）の base64
//!
//! decode 側の失敗は `CorruptionKind` として返し、呼び出し側で
//! modelPath を付けて `StowageError::CorruptedState` にします。

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{CorruptionKind, StowageResult};

pub fn encode_json<T: Serialize>(value: &T) -> StowageResult<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: DeserializeOwned>(key: &str, text: &str) -> Result<T, CorruptionKind> {
    serde_json::from_str(text).map_err(|e| CorruptionKind::MalformedEntry {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

pub fn encode_weights(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_weights(text: &str) -> Result<Vec<u8>, CorruptionKind> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| CorruptionKind::InvalidWeightEncoding {
            reason: e.to_string(),
        })
}
