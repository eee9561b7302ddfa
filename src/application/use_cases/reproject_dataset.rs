//! # Reproject DataSet Use Case
//!
//! 空間参照系変換ユースケース

use anyhow::Result;
use log::{info, warn};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::domain::entities::dataset::DataSet;
use crate::domain::entities::pipeline::Pipeline;
use crate::domain::repositories::pipeline_engine::PipelineEngine;
use crate::domain::repositories::scratch_space::ScratchSpace;

const REPROJECTION_STAGE: &str = "filters.reprojection";

/// 空間参照系変換ユースケース
pub struct ReprojectDataSetUseCase<E: PipelineEngine, S: ScratchSpace> {
    engine: Arc<E>,
    scratch: Arc<S>,
}

impl<E: PipelineEngine, S: ScratchSpace> ReprojectDataSetUseCase<E, S> {
    pub fn new(engine: Arc<E>, scratch: Arc<S>) -> Self {
        Self { engine, scratch }
    }

    /// データセットを再投影する
    ///
    /// # Arguments
    ///
    /// * `dataset` - 対象データセット
    /// * `out_srs` - 変換先の空間参照系
    /// * `in_srs` - 変換元の空間参照系。省略時はデータセットのSRS（未設定ならエンジンから取得）
    ///
    /// # Returns
    ///
    /// 再投影されたデータセット。SRSはエンジンが報告したものになる
    pub async fn execute(
        &self,
        dataset: &DataSet,
        out_srs: &str,
        in_srs: Option<&str>,
    ) -> Result<DataSet> {
        let source = dataset.require_filename()?;

        let in_srs = match in_srs.or(dataset.spatial_reference()) {
            Some(srs) => Some(srs.to_string()),
            None => self.engine.summary(source).await?.spatial_reference,
        };

        let mut stage = Map::new();
        stage.insert("type".to_string(), json!(REPROJECTION_STAGE));
        match &in_srs {
            Some(srs) => {
                stage.insert("in_srs".to_string(), json!(srs));
            }
            None => warn!(
                "No spatial reference known for {}, relying on the engine",
                source.display()
            ),
        }
        stage.insert("out_srs".to_string(), json!(out_srs));

        let output = self.scratch.temporary_filename("las")?;
        let pipeline = Pipeline::reader(source)?
            .push(Value::Object(stage))
            .las_writer(&output, false)?;
        let result = self.engine.execute(&pipeline).await?;

        let spatial_reference = result
            .stage(REPROJECTION_STAGE)
            .and_then(|stage| stage.get("comp_spatialreference"))
            .and_then(Value::as_str)
            .filter(|srs| !srs.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| out_srs.to_string());
        info!("Reprojected {} to {}", source.display(), out_srs);

        Ok(dataset
            .relocated(output)
            .with_spatial_reference(Some(spatial_reference))
            .with_entry(format!(
                "Converted the dataset to spatial reference system '{}'",
                out_srs
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::paths::TemporaryFiles;
    use crate::domain::repositories::pipeline_engine::{
        DataSetSummary, MockPipelineEngine, PipelineOutput,
    };
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn use_case(
        engine: MockPipelineEngine,
        temp_dir: &TempDir,
    ) -> ReprojectDataSetUseCase<MockPipelineEngine, TemporaryFiles> {
        ReprojectDataSetUseCase::new(
            Arc::new(engine),
            Arc::new(TemporaryFiles::new(temp_dir.path().to_path_buf())),
        )
    }

    #[tokio::test]
    async fn test_reproject_uses_engine_spatial_reference() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = MockPipelineEngine::new();
        engine
            .expect_execute()
            .withf(|pipeline| {
                let stage = &pipeline.stages()[1];
                stage["type"] == REPROJECTION_STAGE
                    && stage["in_srs"] == "EPSG:25832"
                    && stage["out_srs"] == "EPSG:4326"
            })
            .times(1)
            .returning(|_| {
                Ok(PipelineOutput::new(json!({
                    "stages": {"filters.reprojection": {"comp_spatialreference": "GEOGCS[\"WGS 84\"]"}}
                })))
            });
        engine.expect_summary().never();

        let dataset = DataSet::from_parts(
            Some(PathBuf::from("/data/tile.las")),
            vec![],
            Some("EPSG:25832".to_string()),
        );

        let result = use_case(engine, &temp_dir)
            .execute(&dataset, "EPSG:4326", None)
            .await
            .unwrap();

        assert_eq!(result.spatial_reference(), Some("GEOGCS[\"WGS 84\"]"));
        assert_eq!(
            result.provenance(),
            ["Converted the dataset to spatial reference system 'EPSG:4326'"]
        );
    }

    #[tokio::test]
    async fn test_reproject_extracts_missing_input_srs() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = MockPipelineEngine::new();
        engine.expect_summary().times(1).returning(|_| {
            Ok(DataSetSummary {
                point_count: 10,
                spatial_reference: Some("EPSG:31467".to_string()),
            })
        });
        engine
            .expect_execute()
            .withf(|pipeline| pipeline.stages()[1]["in_srs"] == "EPSG:31467")
            .times(1)
            .returning(|_| Ok(PipelineOutput::default()));

        let dataset = DataSet::from_parts(Some(PathBuf::from("/data/tile.las")), vec![], None);

        let result = use_case(engine, &temp_dir)
            .execute(&dataset, "EPSG:25832", None)
            .await
            .unwrap();

        // メタデータに結果が無い場合は out_srs を使う
        assert_eq!(result.spatial_reference(), Some("EPSG:25832"));
    }

    #[tokio::test]
    async fn test_reproject_explicit_input_srs_wins() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = MockPipelineEngine::new();
        engine
            .expect_execute()
            .withf(|pipeline| pipeline.stages()[1]["in_srs"] == "EPSG:3044")
            .times(1)
            .returning(|_| Ok(PipelineOutput::default()));

        let dataset = DataSet::from_parts(
            Some(PathBuf::from("/data/tile.las")),
            vec![],
            Some("EPSG:25832".to_string()),
        );

        let result = use_case(engine, &temp_dir)
            .execute(&dataset, "EPSG:4326", Some("EPSG:3044"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_reproject_without_any_input_srs() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = MockPipelineEngine::new();
        engine.expect_summary().returning(|_| {
            Ok(DataSetSummary {
                point_count: 10,
                spatial_reference: None,
            })
        });
        engine
            .expect_execute()
            .withf(|pipeline| pipeline.stages()[1].get("in_srs").is_none())
            .times(1)
            .returning(|_| Ok(PipelineOutput::default()));

        let dataset = DataSet::from_parts(Some(PathBuf::from("/data/tile.las")), vec![], None);

        let result = use_case(engine, &temp_dir)
            .execute(&dataset, "EPSG:4326", None)
            .await;
        assert!(result.is_ok());
    }
}
