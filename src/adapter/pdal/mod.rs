//! PDAL Adapter Modules
//!
//! PDALコマンドラインツールとの統合

pub mod cli_engine;
pub mod summary;

pub use cli_engine::PdalCliEngine;
