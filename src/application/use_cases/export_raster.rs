//! # Export Raster Use Case
//!
//! メッシュ（DFM）、陰影図、傾斜図の出力ユースケース

use anyhow::Result;
use log::{debug, info};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::ensure_writable;
use crate::application::dto::raster_options::RasterOptions;
use crate::domain::entities::dataset::DataSet;
use crate::domain::entities::pipeline::{path_value, range_filter, Pipeline};
use crate::domain::repositories::pipeline_engine::PipelineEngine;
use crate::domain::repositories::raster_renderer::{RasterKind, RasterRenderer};
use crate::domain::repositories::scratch_space::ScratchSpace;

/// ラスタ出力ユースケース
pub struct ExportRasterUseCase<E: PipelineEngine, R: RasterRenderer, S: ScratchSpace> {
    engine: Arc<E>,
    renderer: Arc<R>,
    scratch: Arc<S>,
}

impl<E: PipelineEngine, R: RasterRenderer, S: ScratchSpace> ExportRasterUseCase<E, R, S> {
    pub fn new(engine: Arc<E>, renderer: Arc<R>, scratch: Arc<S>) -> Self {
        Self {
            engine,
            renderer,
            scratch,
        }
    }

    /// 点群をGeoTIFFのメッシュとして保存する
    ///
    /// # Arguments
    ///
    /// * `dataset` - 対象データセット
    /// * `target` - 出力先のGeoTIFF
    /// * `options` - 解像度と含める分類
    /// * `overwrite` - 既存ファイルを上書きするかどうか
    ///
    /// # Returns
    ///
    /// 書き出したファイルのパス
    pub async fn save_mesh(
        &self,
        dataset: &DataSet,
        target: &Path,
        options: &RasterOptions,
        overwrite: bool,
    ) -> Result<PathBuf> {
        ensure_writable(target, overwrite)?;
        self.write_mesh(dataset, target, options).await?;
        info!(
            "Wrote {}m mesh of {} ({}) to {}",
            options.resolution,
            dataset.require_filename()?.display(),
            options.classification.describe(),
            target.display()
        );
        Ok(target.to_path_buf())
    }

    /// 陰影図または傾斜図を画像として保存する
    ///
    /// 一時メッシュを作成し、画像化は `RasterRenderer` に委譲する
    pub async fn render(
        &self,
        kind: RasterKind,
        dataset: &DataSet,
        target: &Path,
        options: &RasterOptions,
        overwrite: bool,
    ) -> Result<PathBuf> {
        ensure_writable(target, overwrite)?;

        let mesh = self.scratch.temporary_filename("tif")?;
        self.write_mesh(dataset, &mesh, options).await?;
        let result = self.renderer.render(kind, &mesh, target).await;

        if let Err(e) = tokio::fs::remove_file(&mesh).await {
            debug!("Could not remove intermediate mesh {}: {}", mesh.display(), e);
        }
        result?;

        Ok(target.to_path_buf())
    }

    async fn write_mesh(&self, dataset: &DataSet, target: &Path, options: &RasterOptions) -> Result<()> {
        let source = dataset.require_filename()?;

        let pipeline = Pipeline::reader_with_srs(source, dataset.spatial_reference())?
            .push_if(range_filter(options.classification.range_limits()))
            .push(json!({
                "type": "writers.gdal",
                "filename": path_value(target)?,
                "gdaldriver": "GTiff",
                "output_type": "idw",
                "resolution": options.resolution,
            }));
        self.engine.execute(&pipeline).await?;
        Ok(())
    }
}
