//! Workflow Orchestration
//!
//! CLIコマンドとユースケースの接続

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::adapter::config::Config;
use crate::adapter::gdal::GdalDemRenderer;
use crate::adapter::paths::{SearchPathLocator, TemporaryFiles};
use crate::adapter::pdal::PdalCliEngine;
use crate::adapter::repositories::json_provenance_repository::JsonProvenanceRepository;
use crate::application::dto::raster_options::RasterOptions;
use crate::application::use_cases::ensure_writable;
use crate::application::use_cases::export_points::ExportPointsUseCase;
use crate::application::use_cases::export_raster::ExportRasterUseCase;
use crate::application::use_cases::remove_classification::RemoveClassificationUseCase;
use crate::application::use_cases::reproject_dataset::ReprojectDataSetUseCase;
use crate::application::use_cases::restrict_dataset::RestrictDataSetUseCase;
use crate::application::use_cases::save_dataset::SaveDataSetUseCase;
use crate::domain::entities::dataset::DataSet;
use crate::domain::entities::segmentation::Segmentation;
use crate::domain::repositories::pipeline_engine::PipelineEngine;
use crate::domain::repositories::provenance_repository::{ProvenanceRecord, ProvenanceRepository};
use crate::domain::repositories::raster_renderer::{RasterKind, RasterRenderer};
use crate::domain::services::provenance_report::ProvenanceReportService;

use super::cli::{Args, Commands, DataSetArgs, OutputArgs, RasterArgs};

/// DataSet Workflow
pub struct DataSetWorkflow<E: PipelineEngine, R: RasterRenderer> {
    config: Config,
    locator: SearchPathLocator,
    provenance_repository: Arc<JsonProvenanceRepository>,
    save_use_case: SaveDataSetUseCase<E, TemporaryFiles>,
    remove_classification_use_case: RemoveClassificationUseCase<E, TemporaryFiles>,
    reproject_use_case: ReprojectDataSetUseCase<E, TemporaryFiles>,
    restrict_use_case: RestrictDataSetUseCase<E, TemporaryFiles>,
    raster_use_case: ExportRasterUseCase<E, R, TemporaryFiles>,
    points_use_case: ExportPointsUseCase<E>,
}

impl DataSetWorkflow<PdalCliEngine, GdalDemRenderer> {
    /// Create a workflow backed by the `pdal` and `gdaldem` executables
    pub fn new(config: Config) -> Self {
        let temporary = TemporaryFiles::new(config.temporary_directory());
        let engine = Arc::new(PdalCliEngine::new(
            config.pdal_executable.clone(),
            temporary.clone(),
        ));
        let renderer = Arc::new(GdalDemRenderer::new(config.gdaldem_executable.clone()));

        Self::with_components(config, engine, renderer)
    }
}

impl<E: PipelineEngine, R: RasterRenderer> DataSetWorkflow<E, R> {
    /// Create a workflow with injected engine and renderer
    pub fn with_components(config: Config, engine: Arc<E>, renderer: Arc<R>) -> Self {
        let scratch = Arc::new(TemporaryFiles::new(config.temporary_directory()));
        let locator = SearchPathLocator::new(config.data_directory());

        Self {
            locator,
            provenance_repository: Arc::new(JsonProvenanceRepository::new()),
            save_use_case: SaveDataSetUseCase::new(engine.clone(), scratch.clone()),
            remove_classification_use_case: RemoveClassificationUseCase::new(
                engine.clone(),
                scratch.clone(),
            ),
            reproject_use_case: ReprojectDataSetUseCase::new(engine.clone(), scratch.clone()),
            restrict_use_case: RestrictDataSetUseCase::new(engine.clone(), scratch.clone()),
            raster_use_case: ExportRasterUseCase::new(engine.clone(), renderer, scratch),
            points_use_case: ExportPointsUseCase::new(engine),
            config,
        }
    }

    /// Execute one CLI command
    pub async fn execute(&self, args: Args) -> Result<()> {
        debug!("Executing {:?}", args.command);

        match args.command {
            Commands::Provenance { dataset, output } => {
                let dataset = self.open(&dataset).await?;
                match output {
                    Some(path) => {
                        let mut file = fs::File::create(&path).with_context(|| {
                            format!("Failed to create report file: {}", path.display())
                        })?;
                        ProvenanceReportService::write(&dataset, &mut file)?;
                        println!("✓ Wrote provenance report to {}", path.display());
                    }
                    None => {
                        let stdout = std::io::stdout();
                        let mut lock = stdout.lock();
                        ProvenanceReportService::write(&dataset, &mut lock)?;
                    }
                }
            }

            Commands::Save { dataset, output } => {
                let dataset = self.open(&dataset).await?;
                let saved = self
                    .save_use_case
                    .execute(&dataset, &output.target, compress_target(&output), output.overwrite)
                    .await?;
                self.persist(&saved).await?;
                println!("✓ Saved dataset to {}", output.target.display());
            }

            Commands::RemoveClassification { dataset, output } => {
                ensure_writable(&output.target, output.overwrite)?;
                let dataset = self.open(&dataset).await?;
                let transformed = self
                    .remove_classification_use_case
                    .execute(&dataset)
                    .await?;
                self.store(&transformed, &output).await?;
            }

            Commands::Reproject {
                dataset,
                output,
                out_srs,
                in_srs,
            } => {
                ensure_writable(&output.target, output.overwrite)?;
                let dataset = self.open(&dataset).await?;
                let transformed = self
                    .reproject_use_case
                    .execute(&dataset, &out_srs, in_srs.as_deref())
                    .await?;
                self.store(&transformed, &output).await?;
            }

            Commands::Restrict {
                dataset,
                segmentation,
                output,
            } => {
                ensure_writable(&output.target, output.overwrite)?;
                let content = fs::read_to_string(&segmentation).with_context(|| {
                    format!("Failed to read segmentation: {}", segmentation.display())
                })?;
                let segmentation = Segmentation::from_geojson(&content)?;

                let dataset = self.open(&dataset).await?;
                let transformed = self
                    .restrict_use_case
                    .execute(&dataset, &segmentation)
                    .await?;
                self.store(&transformed, &output).await?;
            }

            Commands::Mesh { dataset, raster } => {
                let dataset = self.open(&dataset).await?;
                let path = self
                    .raster_use_case
                    .save_mesh(&dataset, &raster.target, &self.raster_options(&raster), raster.overwrite)
                    .await?;
                println!("✓ Wrote mesh to {}", path.display());
            }

            Commands::Hillshade { dataset, raster } => {
                self.render(RasterKind::Hillshade, &dataset, &raster).await?;
            }

            Commands::Slope { dataset, raster } => {
                self.render(RasterKind::Slope, &dataset, &raster).await?;
            }

            Commands::Points {
                dataset,
                target,
                threshold,
                classification,
                overwrite,
            } => {
                let dataset = self.open(&dataset).await?;
                let threshold = threshold.unwrap_or(self.config.points_threshold);
                let export = self
                    .points_use_case
                    .execute(&dataset, &target, threshold, &classification, overwrite)
                    .await?;

                if export.exceeds_threshold {
                    println!(
                        "⚠ {} points exceed the threshold of {}",
                        export.point_count, threshold
                    );
                }
                println!(
                    "✓ Exported {} points to {}",
                    export.point_count,
                    export.path.display()
                );
            }
        }

        Ok(())
    }

    /// データセットを開き、保存済みの来歴があれば復元する
    async fn open(&self, args: &DataSetArgs) -> Result<DataSet> {
        let opened = DataSet::open(&args.dataset, None, &self.locator)?;
        let path = opened.require_filename()?;

        let dataset = match self.provenance_repository.load(path).await? {
            Some(record) => DataSet::from_parts(
                Some(path.to_path_buf()),
                record.entries,
                record.spatial_reference,
            ),
            None => opened.clone(),
        };

        // CLIで指定されたSRSはメタデータより優先する
        Ok(match &args.srs {
            Some(srs) => dataset.with_spatial_reference(Some(srs.clone())),
            None => dataset,
        })
    }

    /// 来歴をサイドカーに保存する
    async fn persist(&self, dataset: &DataSet) -> Result<()> {
        let path = dataset.require_filename()?;
        let record = ProvenanceRecord {
            entries: dataset.provenance().to_vec(),
            spatial_reference: dataset.spatial_reference().map(str::to_string),
            updated_at: Some(Utc::now().to_rfc3339()),
        };
        self.provenance_repository.save(path, &record).await
    }

    /// 一時ファイル上の変換結果を保存先へ移し、来歴を保存する
    async fn store(&self, transformed: &DataSet, output: &OutputArgs) -> Result<()> {
        let saved = self
            .save_use_case
            .execute(transformed, &output.target, compress_target(output), output.overwrite)
            .await;

        // 保存に失敗しても中間ファイルは残さない
        if let Some(intermediate) = transformed.filename() {
            let kept = saved
                .as_ref()
                .is_ok_and(|saved| saved.filename() == Some(intermediate));
            if !kept {
                if let Err(e) = tokio::fs::remove_file(intermediate).await {
                    debug!("Could not remove {}: {}", intermediate.display(), e);
                }
            }
        }

        let saved = saved?;
        self.persist(&saved).await?;

        info!(
            "Stored {} with {} provenance entries",
            output.target.display(),
            saved.provenance().len()
        );
        if let Some(entry) = saved.provenance().last() {
            println!("✓ {}", entry);
        }
        println!("✓ Wrote {}", output.target.display());
        Ok(())
    }

    async fn render(&self, kind: RasterKind, dataset: &DataSetArgs, raster: &RasterArgs) -> Result<()> {
        let dataset = self.open(dataset).await?;
        let path = self
            .raster_use_case
            .render(
                kind,
                &dataset,
                &raster.target,
                &self.raster_options(raster),
                raster.overwrite,
            )
            .await?;
        println!("✓ Wrote {} to {}", kind, path.display());
        Ok(())
    }

    fn raster_options(&self, raster: &RasterArgs) -> RasterOptions {
        RasterOptions::new(
            raster.resolution.unwrap_or(self.config.default_resolution),
            raster.classification.clone(),
        )
    }
}

/// Applies CLI overrides on top of the loaded configuration
pub fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(dir) = &args.data_dir {
        config.data_directory = Some(dir.clone());
    }
    config
}

/// Whether a path looks like a compressed point cloud
pub fn is_laz(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("laz"))
}

/// `.laz` targets are always written compressed
fn compress_target(output: &OutputArgs) -> bool {
    output.compress || is_laz(&output.target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_apply_overrides_data_dir() {
        let args = Args::parse_from(["lidarset", "--data-dir", "/srv/lidar", "provenance", "tile.las"]);
        let config = apply_overrides(Config::default(), &args);
        assert_eq!(config.data_directory.as_deref(), Some("/srv/lidar"));
    }

    #[test]
    fn test_apply_overrides_keeps_config() {
        let args = Args::parse_from(["lidarset", "provenance", "tile.las"]);
        let config = Config {
            data_directory: Some("/from/config".to_string()),
            ..Config::default()
        };
        let config = apply_overrides(config, &args);
        assert_eq!(config.data_directory.as_deref(), Some("/from/config"));
    }

    #[test]
    fn test_is_laz() {
        assert!(is_laz(Path::new("/data/tile.LAZ")));
        assert!(!is_laz(Path::new("/data/tile.las")));
        assert!(!is_laz(Path::new("/data/tile")));
    }
}
