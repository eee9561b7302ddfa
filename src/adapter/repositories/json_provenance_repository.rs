//! JSON Provenance Repository Implementation
//!
//! ProvenanceRepositoryのJSON実装（来歴をデータセット横のサイドカーファイルで永続化）

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::repositories::provenance_repository::{ProvenanceRecord, ProvenanceRepository};

/// サイドカーファイルの拡張子
pub const SIDECAR_SUFFIX: &str = "provenance.json";

/// JSONサイドカーベースの来歴リポジトリ
pub struct JsonProvenanceRepository;

/// 来歴（JSON永続化用の内部表現）
#[derive(Debug, Deserialize, Serialize)]
struct ProvenanceJson {
    entries: Vec<String>,
    spatial_reference: Option<String>,
    updated_at: Option<String>,
}

impl JsonProvenanceRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    /// `tile.las` に対する `tile.las.provenance.json`
    pub fn sidecar_path(dataset_path: &Path) -> PathBuf {
        let mut name = dataset_path.as_os_str().to_os_string();
        name.push(".");
        name.push(SIDECAR_SUFFIX);
        PathBuf::from(name)
    }

    /// サイドカーを読み込む（同期処理）
    fn load_sync(dataset_path: &Path) -> Result<Option<ProvenanceJson>> {
        let path = Self::sidecar_path(dataset_path);

        if !path.exists() {
            debug!("No provenance sidecar for {}", dataset_path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&path).context("Failed to read provenance file")?;
        let record: ProvenanceJson =
            serde_json::from_str(&content).context("Failed to parse provenance JSON")?;

        info!(
            "Loaded provenance for {}: {} entries",
            dataset_path.display(),
            record.entries.len()
        );

        Ok(Some(record))
    }

    /// サイドカーを保存する（同期処理）
    fn save_sync(dataset_path: &Path, record: &ProvenanceJson) -> Result<()> {
        let path = Self::sidecar_path(dataset_path);

        let json = serde_json::to_string_pretty(record).context("Failed to serialize provenance")?;
        fs::write(&path, json).context("Failed to write provenance file")?;

        debug!(
            "Saved provenance for {}: {} entries",
            dataset_path.display(),
            record.entries.len()
        );

        Ok(())
    }

    fn to_domain_record(json: ProvenanceJson) -> ProvenanceRecord {
        ProvenanceRecord {
            entries: json.entries,
            spatial_reference: json.spatial_reference,
            updated_at: json.updated_at,
        }
    }

    fn from_domain_record(record: &ProvenanceRecord) -> ProvenanceJson {
        ProvenanceJson {
            entries: record.entries.clone(),
            spatial_reference: record.spatial_reference.clone(),
            updated_at: record.updated_at.clone(),
        }
    }
}

#[async_trait]
impl ProvenanceRepository for JsonProvenanceRepository {
    async fn load(&self, dataset_path: &Path) -> Result<Option<ProvenanceRecord>> {
        let dataset_path = dataset_path.to_path_buf();
        let json = tokio::task::spawn_blocking(move || Self::load_sync(&dataset_path))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;

        Ok(json.map(Self::to_domain_record))
    }

    async fn save(&self, dataset_path: &Path, record: &ProvenanceRecord) -> Result<()> {
        let dataset_path = dataset_path.to_path_buf();
        let json = Self::from_domain_record(record);
        tokio::task::spawn_blocking(move || Self::save_sync(&dataset_path, &json))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;

        Ok(())
    }
}

impl Default for JsonProvenanceRepository {
    fn default() -> Self {
        Self::new()
    }
}
