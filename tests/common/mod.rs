//! Test doubles shared by the integration tests

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use lidarset::domain::entities::pipeline::Pipeline;
use lidarset::domain::repositories::pipeline_engine::{DataSetSummary, PipelineEngine, PipelineOutput};
use lidarset::domain::repositories::raster_renderer::{RasterKind, RasterRenderer};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// PDALの代わりにファイルをコピーするだけのエンジン
#[derive(Default)]
pub struct CopyingEngine {
    pub executed: Mutex<Vec<Vec<String>>>,
}

impl CopyingEngine {
    pub fn executed_stage_types(&self) -> Vec<Vec<String>> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl PipelineEngine for CopyingEngine {
    async fn execute(&self, pipeline: &Pipeline) -> Result<PipelineOutput> {
        let stages = pipeline.stages();
        self.executed.lock().unwrap().push(
            pipeline
                .stage_types()
                .into_iter()
                .map(str::to_string)
                .collect(),
        );

        let Some(source) = stages.first().and_then(|s| s["filename"].as_str()) else {
            bail!("pipeline has no reader");
        };
        let Some(target) = stages.last().and_then(|s| s["filename"].as_str()) else {
            bail!("pipeline has no writer");
        };

        if stages.last().and_then(|s| s["type"].as_str()) == Some("writers.las") {
            fs::copy(source, target)?;
        } else {
            fs::write(target, b"raster")?;
        }

        let mut metadata = json!({ "stages": {} });
        if let Some(stage) = stages.iter().find(|s| s["type"] == "filters.reprojection") {
            metadata["stages"]["filters.reprojection"] =
                json!({ "comp_spatialreference": stage["out_srs"].clone() });
        }
        Ok(PipelineOutput::new(metadata))
    }

    async fn summary(&self, path: &Path) -> Result<DataSetSummary> {
        Ok(DataSetSummary {
            point_count: fs::metadata(path)?.len(),
            spatial_reference: Some("EPSG:25832".to_string()),
        })
    }
}

/// gdaldemの代わりに入力をコピーするレンダラー
#[derive(Default)]
pub struct CopyingRenderer;

#[async_trait]
impl RasterRenderer for CopyingRenderer {
    async fn render(&self, kind: RasterKind, input: &Path, output: &Path) -> Result<()> {
        let content = fs::read(input)?;
        let mut rendered = kind.as_str().as_bytes().to_vec();
        rendered.extend(content);
        fs::write(output, rendered)?;
        Ok(())
    }
}

pub fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

