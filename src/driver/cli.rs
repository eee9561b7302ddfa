//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::adapter::config::DEFAULT_CONFIG_PATH;
use crate::domain::entities::classification::ClassificationSet;

/// Lidarデータセットの変換と来歴管理を行うCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "lidarset")]
#[command(about = "Transform Lidar datasets through PDAL while tracking their provenance", long_about = None)]
pub struct Args {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Directory searched first for relative dataset names
    #[arg(long)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Dataset selection shared by all commands
#[derive(clap::Args, Debug, Clone)]
pub struct DataSetArgs {
    /// LAS/LAZ dataset (absolute, or relative to the data search path)
    pub dataset: String,

    /// Spatial reference overriding the one in the file metadata
    #[arg(long)]
    pub srs: Option<String>,
}

/// Options for writing a new LAS/LAZ dataset
#[derive(clap::Args, Debug, Clone)]
pub struct OutputArgs {
    /// Where to write the result
    pub target: PathBuf,

    /// Write LAZ instead of LAS
    #[arg(long)]
    pub compress: bool,

    /// Replace the target if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// Options for mesh based outputs
#[derive(clap::Args, Debug, Clone)]
pub struct RasterArgs {
    /// Where to write the raster or image
    pub target: PathBuf,

    /// Mesh resolution in meters (defaults to the configured value)
    #[arg(short, long)]
    pub resolution: Option<f64>,

    /// Classification codes to include, e.g. "2,6" or "2-6" or "all"
    #[arg(long, default_value = "all")]
    pub classification: ClassificationSet,

    /// Replace the target if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the provenance report of a dataset
    Provenance {
        #[command(flatten)]
        dataset: DataSetArgs,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store the dataset as a new LAS/LAZ file
    Save {
        #[command(flatten)]
        dataset: DataSetArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Classify every point as unclassified (1)
    RemoveClassification {
        #[command(flatten)]
        dataset: DataSetArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Reproject the dataset into another spatial reference system
    Reproject {
        #[command(flatten)]
        dataset: DataSetArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Target spatial reference system
        #[arg(long)]
        out_srs: String,

        /// Source spatial reference system (defaults to the dataset's)
        #[arg(long)]
        in_srs: Option<String>,
    },

    /// Restrict the dataset to the polygons of a GeoJSON segmentation
    Restrict {
        #[command(flatten)]
        dataset: DataSetArgs,

        /// GeoJSON file with Polygon/MultiPolygon geometry
        #[arg(long)]
        segmentation: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Write a digital feature model as GeoTIFF
    Mesh {
        #[command(flatten)]
        dataset: DataSetArgs,
        #[command(flatten)]
        raster: RasterArgs,
    },

    /// Render a hillshade image of the digital feature model
    Hillshade {
        #[command(flatten)]
        dataset: DataSetArgs,
        #[command(flatten)]
        raster: RasterArgs,
    },

    /// Render a slope image of the digital feature model
    Slope {
        #[command(flatten)]
        dataset: DataSetArgs,
        #[command(flatten)]
        raster: RasterArgs,
    },

    /// Export the points as PLY for an external viewer
    Points {
        #[command(flatten)]
        dataset: DataSetArgs,

        /// Where to write the PLY file
        target: PathBuf,

        /// Warn when the dataset has more points than this
        #[arg(long)]
        threshold: Option<u64>,

        /// Classification codes to include
        #[arg(long, default_value = "all")]
        classification: ClassificationSet,

        /// Replace the target if it already exists
        #[arg(long)]
        overwrite: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_config() {
        let args = Args::parse_from(["lidarset", "provenance", "tile.las"]);
        assert_eq!(args.config, "./.lidarset/config.json");
        assert!(args.data_dir.is_none());

        match args.command {
            Commands::Provenance { dataset, output } => {
                assert_eq!(dataset.dataset, "tile.las");
                assert!(dataset.srs.is_none());
                assert!(output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_save_flags() {
        let args = Args::parse_from([
            "lidarset",
            "save",
            "tile.las",
            "out.laz",
            "--compress",
            "--overwrite",
        ]);

        match args.command {
            Commands::Save { dataset, output } => {
                assert_eq!(dataset.dataset, "tile.las");
                assert_eq!(output.target, PathBuf::from("out.laz"));
                assert!(output.compress);
                assert!(output.overwrite);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_reproject_requires_out_srs() {
        let result = Args::try_parse_from(["lidarset", "reproject", "tile.las", "out.las"]);
        assert!(result.is_err());

        let args = Args::parse_from([
            "lidarset",
            "reproject",
            "tile.las",
            "out.las",
            "--out-srs",
            "EPSG:4326",
        ]);
        match args.command {
            Commands::Reproject { out_srs, in_srs, .. } => {
                assert_eq!(out_srs, "EPSG:4326");
                assert!(in_srs.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_raster_options() {
        let args = Args::parse_from([
            "lidarset",
            "-c",
            "/custom/config.json",
            "hillshade",
            "tile.las",
            "hs.png",
            "-r",
            "0.5",
            "--classification",
            "2,6",
        ]);
        assert_eq!(args.config, "/custom/config.json");

        match args.command {
            Commands::Hillshade { raster, .. } => {
                assert_eq!(raster.resolution, Some(0.5));
                assert_eq!(raster.classification.to_string(), "2,6");
                assert!(!raster.overwrite);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_invalid_classification() {
        let result = Args::try_parse_from([
            "lidarset",
            "mesh",
            "tile.las",
            "mesh.tif",
            "--classification",
            "ground",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_points_defaults() {
        let args = Args::parse_from(["lidarset", "--data-dir", "/srv/lidar", "points", "tile.las", "p.ply"]);
        assert_eq!(args.data_dir.as_deref(), Some("/srv/lidar"));

        match args.command {
            Commands::Points {
                threshold,
                classification,
                ..
            } => {
                assert!(threshold.is_none());
                assert!(classification.is_all());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
