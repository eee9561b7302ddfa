//! # File Locator Trait
//!
//! データファイルの検索を抽象化

use std::path::PathBuf;

use crate::domain::error::LidarError;

/// ファイル名を絶対パスに解決する
pub trait FileLocator {
    /// # Errors
    ///
    /// 検索順のどこにもファイルが見つからない場合に `LidarError::FileNotFound` を返す
    fn locate(&self, name: &str) -> Result<PathBuf, LidarError>;
}
