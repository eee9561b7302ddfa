//! # Use Cases
//!
//! データセット操作（ユースケース）
//!
//! ## ユースケース
//!
//! - **SaveDataSetUseCase**: LAS/LAZファイルへの保存と一時ファイルへの変換
//! - **RemoveClassificationUseCase**: 分類の除去
//! - **ReprojectDataSetUseCase**: 空間参照系の変換
//! - **RestrictDataSetUseCase**: ポリゴンによる空間的な制限
//! - **ExportRasterUseCase**: メッシュ、陰影図、傾斜図の出力
//! - **ExportPointsUseCase**: 点群ビューア用のエクスポート

pub mod export_points;
pub mod export_raster;
pub mod remove_classification;
pub mod reproject_dataset;
pub mod restrict_dataset;
pub mod save_dataset;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::domain::error::LidarError;

/// Refuses to clobber `target` unless `overwrite` is set.
pub(crate) fn ensure_writable(target: &Path, overwrite: bool) -> Result<(), LidarError> {
    if !overwrite && target.exists() {
        return Err(LidarError::WouldOverwrite {
            path: target.to_path_buf(),
        });
    }
    Ok(())
}

/// `~` を展開し、作業ディレクトリ基準の絶対パスに変換する（ファイルの存在は問わない）
pub(crate) fn absolute_path(path: &Path) -> Result<PathBuf> {
    let expanded = match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    };
    std::path::absolute(&expanded)
        .with_context(|| format!("Failed to make path absolute: {}", path.display()))
}
