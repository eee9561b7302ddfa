//! # Remove Classification Use Case
//!
//! 分類除去ユースケース

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::dataset::DataSet;
use crate::domain::entities::pipeline::Pipeline;
use crate::domain::repositories::pipeline_engine::PipelineEngine;
use crate::domain::repositories::scratch_space::ScratchSpace;

pub const REMOVED_CLASSIFICATION_ENTRY: &str = "Removed all point classifications";

/// 分類除去ユースケース
///
/// 全ての点を分類1（unclassified）にする。自動的な事前分類を捨てて、
/// 考古学的に意味のある分類を一から作り直したい場合に使う。
pub struct RemoveClassificationUseCase<E: PipelineEngine, S: ScratchSpace> {
    engine: Arc<E>,
    scratch: Arc<S>,
}

impl<E: PipelineEngine, S: ScratchSpace> RemoveClassificationUseCase<E, S> {
    pub fn new(engine: Arc<E>, scratch: Arc<S>) -> Self {
        Self { engine, scratch }
    }

    /// 分類を除去したデータセットを返す
    ///
    /// # Errors
    ///
    /// データセットがファイルを持たない場合、またはエンジンが失敗した場合にエラーを返す
    pub async fn execute(&self, dataset: &DataSet) -> Result<DataSet> {
        let source = dataset.require_filename()?;
        let output = self.scratch.temporary_filename("las")?;

        let pipeline = Pipeline::reader_with_srs(source, dataset.spatial_reference())?
            .push(json!({
                "type": "filters.assign",
                "value": ["Classification = 1"],
            }))
            .las_writer(&output, false)?;
        self.engine.execute(&pipeline).await?;

        Ok(dataset
            .relocated(output)
            .with_entry(REMOVED_CLASSIFICATION_ENTRY))
    }
}
