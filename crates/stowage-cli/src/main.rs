use std::path::PathBuf;
use std::process::ExitCode;

use serde_json::json;
use stowage_core::config::FileKvStoreConfig;
use stowage_core::domain::{DataType, WeightSpec};
use stowage_core::impls::FileKvStore;
use stowage_core::{ModelArtifacts, ModelIoHandler, kv_storage_io};

const USAGE: &str = "usage: stowage-cli <data-dir> <model-path>";

/// デモ用のモデル（Dense 1 層、weight 2 個 + bias 1 個）
fn sample_model() -> ModelArtifacts {
    let weights: Vec<u8> = [0.5f32, -1.25, 0.75]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();

    ModelArtifacts::with_json_topology(json!({
        "class_name": "Sequential",
        "config": {
            "layers": [{ "class_name": "Dense", "config": { "units": 1 } }]
        }
    }))
    .weight_specs(vec![
        WeightSpec::new("dense/kernel", vec![2, 1], DataType::Float32),
        WeightSpec::new("dense/bias", vec![1], DataType::Float32),
    ])
    .weight_data(weights)
}

async fn run(data_dir: PathBuf, model_path: String) -> Result<(), Box<dyn std::error::Error>> {
    // (A) ストアを開く
    let store = FileKvStore::open(FileKvStoreConfig::at(data_dir)).await?;
    let io = kv_storage_io(model_path, store)?;

    // (B) 保存
    let model = sample_model();
    let result = io.save(model.clone()).await?;
    let info = &result.model_artifacts_info;
    println!(
        "saved: path={} date_saved={} weight_data_bytes={}",
        io.model_path(),
        info.date_saved,
        info.weight_data_bytes
    );

    // (C) 読み込みと照合
    let loaded = io.load().await?;
    if loaded != model {
        return Err("loaded model differs from the saved one".into());
    }
    println!("loaded: weights round-tripped ({} bytes)", info.weight_data_bytes);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(data_dir), Some(model_path)) = (args.next(), args.next()) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(PathBuf::from(data_dir), model_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "demo failed");
            ExitCode::FAILURE
        }
    }
}
