//! # DataSet Entity
//!
//! Lidarデータセットのハンドル

use std::path::{Path, PathBuf};

use crate::domain::error::LidarError;
use crate::domain::repositories::file_locator::FileLocator;

/// Lidarデータセット
///
/// ファイルパス、空間参照系、来歴（provenance）を保持する受動的なレコード。
/// 変換操作は自身を変更せず、常に新しいハンドルを返す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSet {
    filename: Option<PathBuf>,
    provenance: Vec<String>,
    spatial_reference: Option<String>,
}

impl DataSet {
    /// ファイル名を検索パスで解決してデータセットを開く
    ///
    /// # Arguments
    ///
    /// * `name` - LAS/LAZファイル名（絶対パスまたは相対パス）
    /// * `spatial_reference` - メタデータのSRSを上書きする空間参照系
    /// * `locator` - ファイル検索の実装
    ///
    /// # Errors
    ///
    /// どの検索ディレクトリにもファイルが存在しない場合に `LidarError::FileNotFound` を返す
    pub fn open<L: FileLocator + ?Sized>(
        name: &str,
        spatial_reference: Option<String>,
        locator: &L,
    ) -> Result<Self, LidarError> {
        let filename = locator.locate(name)?;
        Ok(Self {
            filename: Some(filename),
            provenance: Vec::new(),
            spatial_reference,
        })
    }

    /// 解決済みのパスから直接データセットを作成
    pub fn from_parts(
        filename: Option<PathBuf>,
        provenance: Vec<String>,
        spatial_reference: Option<String>,
    ) -> Self {
        Self {
            filename,
            provenance,
            spatial_reference,
        }
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Returns the backing file or `LidarError::NoBackingFile`.
    pub fn require_filename(&self) -> Result<&Path, LidarError> {
        self.filename().ok_or(LidarError::NoBackingFile)
    }

    pub fn provenance(&self) -> &[String] {
        &self.provenance
    }

    pub fn spatial_reference(&self) -> Option<&str> {
        self.spatial_reference.as_deref()
    }

    /// 来歴エントリを追加した新しいハンドルを返す
    pub fn with_entry(&self, entry: impl Into<String>) -> Self {
        let mut provenance = self.provenance.clone();
        provenance.push(entry.into());
        Self {
            filename: self.filename.clone(),
            provenance,
            spatial_reference: self.spatial_reference.clone(),
        }
    }

    /// 同じ来歴とSRSを持つ、別ファイルのハンドルを返す
    pub fn relocated(&self, filename: PathBuf) -> Self {
        Self {
            filename: Some(filename),
            provenance: self.provenance.clone(),
            spatial_reference: self.spatial_reference.clone(),
        }
    }

    /// SRSを置き換えた新しいハンドルを返す
    pub fn with_spatial_reference(&self, spatial_reference: Option<String>) -> Self {
        Self {
            filename: self.filename.clone(),
            provenance: self.provenance.clone(),
            spatial_reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLocator;

    impl FileLocator for FixedLocator {
        fn locate(&self, name: &str) -> Result<PathBuf, LidarError> {
            if name == "tile.las" {
                Ok(PathBuf::from("/data/tile.las"))
            } else {
                Err(LidarError::FileNotFound {
                    name: name.to_string(),
                    searched: vec![PathBuf::from("/data")],
                })
            }
        }
    }

    #[test]
    fn test_open_resolves_filename() {
        let ds = DataSet::open("tile.las", None, &FixedLocator).unwrap();

        assert_eq!(ds.filename(), Some(Path::new("/data/tile.las")));
        assert!(ds.provenance().is_empty());
        assert!(ds.spatial_reference().is_none());
    }

    #[test]
    fn test_open_missing_file() {
        let result = DataSet::open("missing.las", None, &FixedLocator);
        assert!(matches!(result, Err(LidarError::FileNotFound { .. })));
    }

    #[test]
    fn test_with_entry_does_not_mutate() {
        let ds = DataSet::from_parts(Some(PathBuf::from("/a.las")), vec![], None);
        let first = ds.with_entry("one");
        let second = first.with_entry("two");

        assert!(ds.provenance().is_empty());
        assert_eq!(first.provenance(), ["one"]);
        assert_eq!(second.provenance(), ["one", "two"]);
    }

    #[test]
    fn test_relocated_keeps_provenance_and_srs() {
        let ds = DataSet::from_parts(
            Some(PathBuf::from("/a.las")),
            vec!["step".to_string()],
            Some("EPSG:25832".to_string()),
        );
        let moved = ds.relocated(PathBuf::from("/b.las"));

        assert_eq!(moved.filename(), Some(Path::new("/b.las")));
        assert_eq!(moved.provenance(), ds.provenance());
        assert_eq!(moved.spatial_reference(), Some("EPSG:25832"));
    }

    #[test]
    fn test_require_filename_without_file() {
        let ds = DataSet::from_parts(None, vec![], None);
        assert!(matches!(
            ds.require_filename(),
            Err(LidarError::NoBackingFile)
        ));
    }
}
