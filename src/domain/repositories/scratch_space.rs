//! # Scratch Space Trait
//!
//! 中間ファイルの置き場所を抽象化

use anyhow::Result;
use std::path::PathBuf;

/// 一時ファイル名の払い出し
pub trait ScratchSpace: Send + Sync {
    /// まだ存在しない一時ファイルのパスを返す
    fn temporary_filename(&self, extension: &str) -> Result<PathBuf>;
}
