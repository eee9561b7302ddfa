//! PDAL CLI Engine
//!
//! PipelineEngineのPDALコマンドライン実装

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

use super::summary::parse_summary;
use crate::adapter::paths::TemporaryFiles;
use crate::domain::entities::pipeline::Pipeline;
use crate::domain::repositories::pipeline_engine::{DataSetSummary, PipelineEngine, PipelineOutput};

/// `pdal` 実行ファイルを呼び出すパイプラインエンジン
pub struct PdalCliEngine {
    executable: String,
    temporary: TemporaryFiles,
}

impl PdalCliEngine {
    pub fn new(executable: String, temporary: TemporaryFiles) -> Self {
        Self {
            executable,
            temporary,
        }
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    async fn run(&self, args: &[&std::ffi::OsStr]) -> Result<Output> {
        debug!("Running {} {:?}", self.executable, args);

        let output = Command::new(&self.executable)
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to spawn '{}'", self.executable))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.executable,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(output)
    }

    async fn run_pipeline(
        &self,
        pipeline_path: &Path,
        metadata_path: &Path,
        pipeline: &Pipeline,
    ) -> Result<PipelineOutput> {
        let json = serde_json::to_string_pretty(&pipeline.to_json())
            .context("Failed to serialize pipeline")?;
        tokio::fs::write(pipeline_path, json)
            .await
            .context("Failed to write pipeline file")?;

        self.run(&[
            "pipeline".as_ref(),
            pipeline_path.as_os_str(),
            "--metadata".as_ref(),
            metadata_path.as_os_str(),
        ])
        .await?;

        let content = tokio::fs::read_to_string(metadata_path)
            .await
            .context("Failed to read pipeline metadata")?;
        let metadata = serde_json::from_str(&content).context("Failed to parse pipeline metadata")?;

        Ok(PipelineOutput::new(metadata))
    }
}

#[async_trait]
impl PipelineEngine for PdalCliEngine {
    #[cfg_attr(coverage_nightly, coverage(off))]
    async fn execute(&self, pipeline: &Pipeline) -> Result<PipelineOutput> {
        info!("Executing PDAL pipeline: {}", pipeline.stage_types().join(" -> "));

        let pipeline_path = self.temporary.filename("json")?;
        let metadata_path = self.temporary.filename("json")?;

        let result = self
            .run_pipeline(&pipeline_path, &metadata_path, pipeline)
            .await;

        remove_quietly(&[pipeline_path, metadata_path]).await;
        result
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    async fn summary(&self, path: &Path) -> Result<DataSetSummary> {
        let output = self
            .run(&["info".as_ref(), "--summary".as_ref(), path.as_os_str()])
            .await?;
        parse_summary(&String::from_utf8_lossy(&output.stdout))
    }
}

async fn remove_quietly(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            debug!("Could not remove {}: {}", path.display(), e);
        }
    }
}
