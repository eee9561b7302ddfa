//! # Pipeline Engine Trait
//!
//! 外部点群パイプラインエンジン（PDAL）を抽象化

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::pipeline::Pipeline;

/// パイプライン実行結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    /// エンジンが返したメタデータ（JSON）
    pub metadata: Value,
}

impl PipelineOutput {
    pub fn new(metadata: Value) -> Self {
        Self { metadata }
    }

    /// 指定したステージのメタデータを取り出す
    ///
    /// PDALはステージを `metadata` または `stages` の下に置き、
    /// 同じ種類のステージが複数ある場合は配列になる。配列の場合は最後の要素を返す。
    pub fn stage(&self, stage_type: &str) -> Option<&Value> {
        let stage = ["metadata", "stages"]
            .iter()
            .find_map(|root| self.metadata.get(root).and_then(|m| m.get(stage_type)))
            .or_else(|| self.metadata.get(stage_type))?;

        match stage {
            Value::Array(items) => items.last(),
            other => Some(other),
        }
    }
}

/// データセットの概要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSetSummary {
    pub point_count: u64,
    pub spatial_reference: Option<String>,
}

/// パイプラインエンジン
///
/// 点群のI/O、フィルタ、再投影、メッシュ生成は全てこのエンジンに委譲する
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PipelineEngine: Send + Sync {
    /// パイプラインを実行する
    ///
    /// # Errors
    ///
    /// エンジンが失敗した場合、そのエラーをそのまま返す
    async fn execute(&self, pipeline: &Pipeline) -> Result<PipelineOutput>;

    /// データセットの点数と空間参照系を取得する
    async fn summary(&self, path: &Path) -> Result<DataSetSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stage_under_metadata_root() {
        let output = PipelineOutput::new(json!({
            "metadata": {"filters.reprojection": {"comp_spatialreference": "EPSG:4326"}}
        }));

        let stage = output.stage("filters.reprojection").unwrap();
        assert_eq!(stage["comp_spatialreference"], "EPSG:4326");
    }

    #[test]
    fn test_stage_under_stages_root_as_array() {
        let output = PipelineOutput::new(json!({
            "stages": {"filters.reprojection": [
                {"comp_spatialreference": "first"},
                {"comp_spatialreference": "second"}
            ]}
        }));

        let stage = output.stage("filters.reprojection").unwrap();
        assert_eq!(stage["comp_spatialreference"], "second");
    }

    #[test]
    fn test_stage_missing() {
        let output = PipelineOutput::new(json!({"stages": {}}));
        assert!(output.stage("filters.reprojection").is_none());
    }
}
