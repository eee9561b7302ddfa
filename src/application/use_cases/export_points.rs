//! # Export Points Use Case
//!
//! 点群ビューア用エクスポートのユースケース

use anyhow::Result;
use log::{info, warn};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::ensure_writable;
use crate::domain::entities::classification::ClassificationSet;
use crate::domain::entities::dataset::DataSet;
use crate::domain::entities::pipeline::{path_value, range_filter, Pipeline};
use crate::domain::repositories::pipeline_engine::PipelineEngine;

/// エクスポート結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsExport {
    pub path: PathBuf,
    /// 元データセットの点数
    pub point_count: u64,
    /// 点数が閾値を超えていたかどうか
    pub exceeds_threshold: bool,
}

/// 点群エクスポートユースケース
///
/// 分類でフィルタした点群をPLYとして書き出す。点数が閾値を超える場合は警告する。
pub struct ExportPointsUseCase<E: PipelineEngine> {
    engine: Arc<E>,
}

impl<E: PipelineEngine> ExportPointsUseCase<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self { engine }
    }

    pub async fn execute(
        &self,
        dataset: &DataSet,
        target: &Path,
        threshold: u64,
        classification: &ClassificationSet,
        overwrite: bool,
    ) -> Result<PointsExport> {
        ensure_writable(target, overwrite)?;
        let source = dataset.require_filename()?;

        let summary = self.engine.summary(source).await?;
        let exceeds_threshold = summary.point_count > threshold;
        if exceeds_threshold {
            warn!(
                "{} contains {} points (threshold {}), the viewer may be slow",
                source.display(),
                summary.point_count,
                threshold
            );
        }

        let pipeline = Pipeline::reader_with_srs(source, dataset.spatial_reference())?
            .push_if(range_filter(classification.range_limits()))
            .push(json!({
                "type": "writers.ply",
                "filename": path_value(target)?,
                "storage_mode": "little endian",
            }));
        self.engine.execute(&pipeline).await?;
        info!(
            "Exported {} points of {} to {}",
            classification.describe(),
            source.display(),
            target.display()
        );

        Ok(PointsExport {
            path: target.to_path_buf(),
            point_count: summary.point_count,
            exceeds_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::pipeline_engine::{
        DataSetSummary, MockPipelineEngine, PipelineOutput,
    };
    use tempfile::TempDir;

    fn engine_with_count(count: u64) -> MockPipelineEngine {
        let mut engine = MockPipelineEngine::new();
        engine.expect_summary().times(1).returning(move |_| {
            Ok(DataSetSummary {
                point_count: count,
                spatial_reference: None,
            })
        });
        engine
            .expect_execute()
            .withf(|pipeline| pipeline.stage_types().last() == Some(&"writers.ply"))
            .times(1)
            .returning(|_| Ok(PipelineOutput::default()));
        engine
    }

    #[tokio::test]
    async fn test_export_points_below_threshold() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("points.ply");
        let use_case = ExportPointsUseCase::new(Arc::new(engine_with_count(1_000)));
        let dataset = DataSet::from_parts(Some(PathBuf::from("/data/tile.las")), vec![], None);

        let export = use_case
            .execute(&dataset, &target, 750_000, &ClassificationSet::all(), false)
            .await
            .unwrap();

        assert_eq!(export.point_count, 1_000);
        assert!(!export.exceeds_threshold);
        assert_eq!(export.path, target);
    }

    #[tokio::test]
    async fn test_export_points_above_threshold_still_exports() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("points.ply");
        let use_case = ExportPointsUseCase::new(Arc::new(engine_with_count(2_000_000)));
        let dataset = DataSet::from_parts(Some(PathBuf::from("/data/tile.las")), vec![], None);

        let export = use_case
            .execute(&dataset, &target, 750_000, &ClassificationSet::all(), false)
            .await
            .unwrap();

        assert!(export.exceeds_threshold);
    }
}
