//! Adapter Layer
//!
//! 外部システム（PDAL, gdaldem, ファイルシステム）との統合

pub mod config;
pub mod gdal;
pub mod paths;
pub mod pdal;
pub mod repositories;
