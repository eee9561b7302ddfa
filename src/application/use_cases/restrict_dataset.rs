//! # Restrict DataSet Use Case
//!
//! 空間制限ユースケース

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::dataset::DataSet;
use crate::domain::entities::pipeline::Pipeline;
use crate::domain::entities::segmentation::Segmentation;
use crate::domain::repositories::pipeline_engine::PipelineEngine;
use crate::domain::repositories::scratch_space::ScratchSpace;

/// 空間制限ユースケース
///
/// セグメンテーションのポリゴン内の点だけを残す
pub struct RestrictDataSetUseCase<E: PipelineEngine, S: ScratchSpace> {
    engine: Arc<E>,
    scratch: Arc<S>,
}

impl<E: PipelineEngine, S: ScratchSpace> RestrictDataSetUseCase<E, S> {
    pub fn new(engine: Arc<E>, scratch: Arc<S>) -> Self {
        Self { engine, scratch }
    }

    pub async fn execute(&self, dataset: &DataSet, segmentation: &Segmentation) -> Result<DataSet> {
        let source = dataset.require_filename()?;
        let output = self.scratch.temporary_filename("las")?;

        let pipeline = Pipeline::reader_with_srs(source, dataset.spatial_reference())?
            .push(json!({
                "type": "filters.crop",
                "polygon": segmentation.to_wkt(),
            }))
            .las_writer(&output, false)?;
        self.engine.execute(&pipeline).await?;

        Ok(dataset.relocated(output).with_entry(format!(
            "Restricted the dataset to {} polygon(s) of a segmentation",
            segmentation.polygon_count()
        )))
    }
}
