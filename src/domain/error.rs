//! # Domain Error
//!
//! ドメイン層のエラー型

use std::path::PathBuf;
use thiserror::Error;

/// データセット操作のエラー
///
/// 外部パイプラインエンジンの失敗はここに含めず、`anyhow::Error` としてそのまま伝播する
#[derive(Error, Debug)]
pub enum LidarError {
    #[error("Would overwrite file '{}'. Pass overwrite to proceed", path.display())]
    WouldOverwrite { path: PathBuf },

    #[error("Dataset is not backed by a file")]
    NoBackingFile,

    #[error("File '{name}' not found (searched: {})", format_searched(searched))]
    FileNotFound { name: String, searched: Vec<PathBuf> },

    #[error("Invalid classification: {0}")]
    InvalidClassification(String),

    #[error("Invalid segmentation: {0}")]
    InvalidSegmentation(String),

    #[error("Path is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },
}

fn format_searched(searched: &[PathBuf]) -> String {
    searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
