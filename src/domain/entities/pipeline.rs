//! # Pipeline Value Object
//!
//! PDALパイプライン（ステージの順序付きリスト）

use serde_json::{json, Map, Value};
use std::path::Path;

use crate::domain::error::LidarError;

/// PDALパイプライン
///
/// 各ステージは `type` キーを持つJSONオブジェクト
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    stages: Vec<Value>,
}

impl Pipeline {
    /// リーダーステージから始まるパイプラインを作成
    pub fn reader(path: &Path) -> Result<Self, LidarError> {
        Ok(Self {
            stages: vec![json!({
                "type": reader_type(path),
                "filename": path_value(path)?,
            })],
        })
    }

    /// SRSを上書きするリーダーステージから始まるパイプラインを作成
    ///
    /// `spatial_reference` が `None` の場合はファイルのメタデータのSRSが使われる
    pub fn reader_with_srs(path: &Path, spatial_reference: Option<&str>) -> Result<Self, LidarError> {
        let mut pipeline = Self::reader(path)?;
        if let (Some(srs), Some(Value::Object(stage))) = (spatial_reference, pipeline.stages.first_mut()) {
            stage.insert("override_srs".to_string(), json!(srs));
        }
        Ok(pipeline)
    }

    /// ステージを追加
    pub fn push(mut self, stage: Value) -> Self {
        self.stages.push(stage);
        self
    }

    /// 条件付きでステージを追加
    pub fn push_if(self, stage: Option<Value>) -> Self {
        match stage {
            Some(stage) => self.push(stage),
            None => self,
        }
    }

    /// LAS/LAZライターを追加
    pub fn las_writer(self, path: &Path, compress: bool) -> Result<Self, LidarError> {
        let mut stage = Map::new();
        stage.insert("type".to_string(), json!("writers.las"));
        stage.insert("filename".to_string(), path_value(path)?);
        if compress {
            stage.insert("compression".to_string(), json!(true));
        }
        // 元データの次元とVLRをそのまま引き継ぐ
        stage.insert("forward".to_string(), json!("all"));
        stage.insert("extra_dims".to_string(), json!("all"));
        Ok(self.push(Value::Object(stage)))
    }

    pub fn stages(&self) -> &[Value] {
        &self.stages
    }

    /// ステージ種別の一覧（ログ出力用）
    pub fn stage_types(&self) -> Vec<&str> {
        self.stages
            .iter()
            .filter_map(|stage| stage.get("type").and_then(Value::as_str))
            .collect()
    }

    /// PDALが受け付けるパイプラインJSON
    pub fn to_json(&self) -> Value {
        json!({ "pipeline": self.stages })
    }
}

/// `filters.range` ステージ（分類コードのフィルタ）
pub fn range_filter(limits: Option<String>) -> Option<Value> {
    limits.map(|limits| json!({ "type": "filters.range", "limits": limits }))
}

/// ステージの `filename` に渡すパス
///
/// PDALはUTF-8のJSONしか受け付けないので、UTF-8でないパスはエラーにする
pub fn path_value(path: &Path) -> Result<Value, LidarError> {
    path.to_str()
        .map(|s| json!(s))
        .ok_or_else(|| LidarError::NonUtf8Path {
            path: path.to_path_buf(),
        })
}

fn reader_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("ply") => "readers.ply",
        Some("txt") | Some("csv") => "readers.text",
        _ => "readers.las",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_stage() {
        let pipeline = Pipeline::reader(Path::new("/data/tile.laz")).unwrap();

        assert_eq!(pipeline.stages().len(), 1);
        assert_eq!(pipeline.stages()[0]["type"], "readers.las");
        assert_eq!(pipeline.stages()[0]["filename"], "/data/tile.laz");
    }

    #[test]
    fn test_reader_with_srs_overrides_metadata() {
        let pipeline = Pipeline::reader_with_srs(Path::new("/in.las"), Some("EPSG:25832")).unwrap();
        assert_eq!(pipeline.stages()[0]["override_srs"], "EPSG:25832");

        let plain = Pipeline::reader_with_srs(Path::new("/in.las"), None).unwrap();
        assert!(plain.stages()[0].get("override_srs").is_none());
    }

    #[test]
    fn test_stage_order_is_preserved() {
        let pipeline = Pipeline::reader(Path::new("/in.las"))
            .unwrap()
            .push(json!({"type": "filters.assign", "value": ["Classification = 1"]}))
            .las_writer(Path::new("/out.las"), false)
            .unwrap();

        assert_eq!(
            pipeline.stage_types(),
            vec!["readers.las", "filters.assign", "writers.las"]
        );
    }

    #[test]
    fn test_compressed_writer() {
        let pipeline = Pipeline::reader(Path::new("/in.las"))
            .unwrap()
            .las_writer(Path::new("/out.laz"), true)
            .unwrap();
        let writer = &pipeline.stages()[1];

        assert_eq!(writer["compression"], true);
        assert_eq!(writer["filename"], "/out.laz");
    }

    #[test]
    fn test_uncompressed_writer_has_no_compression_key() {
        let pipeline = Pipeline::reader(Path::new("/in.las"))
            .unwrap()
            .las_writer(Path::new("/out.las"), false)
            .unwrap();
        assert!(pipeline.stages()[1].get("compression").is_none());
    }

    #[test]
    fn test_push_if_none_is_noop() {
        let pipeline = Pipeline::reader(Path::new("/in.las")).unwrap().push_if(range_filter(None));
        assert_eq!(pipeline.stages().len(), 1);
    }

    #[test]
    fn test_to_json_wraps_stages() {
        let pipeline = Pipeline::reader(Path::new("/in.las")).unwrap();
        let json = pipeline.to_json();

        assert!(json["pipeline"].is_array());
        assert_eq!(json["pipeline"][0]["type"], "readers.las");
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/data/tile-\xff.las"));

        assert!(matches!(
            Pipeline::reader(path),
            Err(LidarError::NonUtf8Path { .. })
        ));
        let pipeline = Pipeline::reader(Path::new("/in.las")).unwrap();
        assert!(matches!(
            pipeline.las_writer(path, false),
            Err(LidarError::NonUtf8Path { .. })
        ));
    }
}
