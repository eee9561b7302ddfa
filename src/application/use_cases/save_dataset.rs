//! # Save DataSet Use Case
//!
//! データセット保存ユースケース

use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use std::sync::Arc;

use super::{absolute_path, ensure_writable};
use crate::domain::entities::dataset::DataSet;
use crate::domain::entities::pipeline::Pipeline;
use crate::domain::repositories::pipeline_engine::PipelineEngine;
use crate::domain::repositories::scratch_space::ScratchSpace;

/// データセット保存ユースケース
///
/// データセットを新しいLAS/LAZファイルとして保存する。
/// 既存ファイルの誤った上書きを防ぐため、`overwrite` が無い限り上書きしない。
pub struct SaveDataSetUseCase<E: PipelineEngine, S: ScratchSpace> {
    engine: Arc<E>,
    scratch: Arc<S>,
}

impl<E: PipelineEngine, S: ScratchSpace> SaveDataSetUseCase<E, S> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `engine` - パイプラインエンジン（LAZ圧縮時のみ使用）
    /// * `scratch` - 一時ファイルの置き場所
    pub fn new(engine: Arc<E>, scratch: Arc<S>) -> Self {
        Self { engine, scratch }
    }

    /// データセットを保存する
    ///
    /// # Arguments
    ///
    /// * `dataset` - 保存するデータセット
    /// * `target` - 保存先（相対パスはカレントディレクトリ基準）
    /// * `compress` - LAZとして書き出すかどうか
    /// * `overwrite` - 既存ファイルを上書きするかどうか
    ///
    /// # Returns
    ///
    /// 保存先ファイルを指す、同じ来歴とSRSを持つデータセット
    ///
    /// # Errors
    ///
    /// 上書き禁止のまま既存ファイルを指定した場合に `LidarError::WouldOverwrite` を返す
    pub async fn execute(
        &self,
        dataset: &DataSet,
        target: &Path,
        compress: bool,
        overwrite: bool,
    ) -> Result<DataSet> {
        let target = absolute_path(target)?;

        // 保存先が元ファイルと同じなら何もしない（`..` やシンボリックリンク経由でも同一とみなす）
        if let Some(source) = dataset.filename() {
            if same_file(source, &target).await {
                info!("Save target equals source, nothing to do: {}", target.display());
                return Ok(dataset.clone());
            }
        }

        ensure_writable(&target, overwrite)?;
        let source = dataset.require_filename()?;

        if compress {
            let pipeline = Pipeline::reader_with_srs(source, dataset.spatial_reference())?
                .las_writer(&target, true)?;
            self.engine.execute(&pipeline).await?;
        } else {
            tokio::fs::copy(source, &target).await.with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    source.display(),
                    target.display()
                )
            })?;
        }

        info!("Saved dataset to {}", target.display());
        Ok(dataset.relocated(target))
    }

    /// データセットを一時LASファイルに変換する
    ///
    /// エンジンが直接扱える形に実体化したハンドルを返す
    pub async fn convert(&self, dataset: &DataSet) -> Result<DataSet> {
        let target = self.scratch.temporary_filename("las")?;
        self.execute(dataset, &target, false, false).await
    }
}

/// 正規化したパスで同一ファイルかを判定する
///
/// どちらかが存在しない場合は別ファイル扱い
async fn same_file(source: &Path, target: &Path) -> bool {
    if source == target {
        return true;
    }
    match (
        tokio::fs::canonicalize(source).await,
        tokio::fs::canonicalize(target).await,
    ) {
        (Ok(source), Ok(target)) => source == target,
        _ => false,
    }
}
