//! # Domain Repositories
//!
//! Repository trait（インターフェース）定義
//!
//! ## 特徴
//!
//! - Domain層では実装を持たない（traitの定義のみ）
//! - Adapter層で具体的な実装を提供（PDAL, gdaldem, JSONサイドカー）

pub mod file_locator;
pub mod pipeline_engine;
pub mod provenance_repository;
pub mod raster_renderer;
pub mod scratch_space;
