//! GDAL Adapter Modules
//!
//! gdaldemによるラスタ可視化

pub mod gdaldem;

pub use gdaldem::GdalDemRenderer;
