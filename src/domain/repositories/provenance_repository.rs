//! # Provenance Repository Trait
//!
//! データセットの来歴の永続化を抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// 永続化された来歴
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvenanceRecord {
    /// 変換履歴（古い順）
    pub entries: Vec<String>,
    /// 空間参照系
    pub spatial_reference: Option<String>,
    /// 最終更新時刻（RFC 3339）
    pub updated_at: Option<String>,
}

/// 来歴リポジトリ
#[async_trait]
pub trait ProvenanceRepository: Send + Sync {
    /// データセットに紐づく来歴を読み込む
    ///
    /// 来歴が保存されていない場合は `None` を返す
    async fn load(&self, dataset_path: &Path) -> Result<Option<ProvenanceRecord>>;

    /// データセットの来歴を保存する
    async fn save(&self, dataset_path: &Path, record: &ProvenanceRecord) -> Result<()>;
}
