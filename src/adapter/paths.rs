//! Path Resolution
//!
//! データファイルの検索と一時ファイル名の生成

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::LidarError;
use crate::domain::repositories::file_locator::FileLocator;
use crate::domain::repositories::scratch_space::ScratchSpace;

/// Directory name used below XDG data directories.
const XDG_SUBDIRECTORY: &str = "lidarset";

/// 検索パスに基づくファイルロケータ
///
/// 相対パスは次の順に解決する:
/// 設定されたデータディレクトリ、カレントディレクトリ、XDGデータディレクトリ（Unixのみ）、実行ファイルのディレクトリ
#[derive(Debug, Clone, Default)]
pub struct SearchPathLocator {
    data_directory: Option<PathBuf>,
}

impl SearchPathLocator {
    pub fn new(data_directory: Option<PathBuf>) -> Self {
        Self { data_directory }
    }

    /// 検索するディレクトリの一覧（順序付き）
    pub fn search_directories(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();

        if let Some(dir) = &self.data_directory {
            dirs.push(dir.clone());
        }
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd);
        }
        if cfg!(unix) {
            dirs.extend(xdg_data_directories());
        }
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            dirs.push(dir);
        }

        dirs
    }
}

impl FileLocator for SearchPathLocator {
    fn locate(&self, name: &str) -> Result<PathBuf, LidarError> {
        let expanded = shellexpand::tilde(name);
        let candidate = PathBuf::from(expanded.as_ref());

        if candidate.is_absolute() {
            if candidate.is_file() {
                return Ok(candidate);
            }
            return Err(LidarError::FileNotFound {
                name: name.to_string(),
                searched: vec![],
            });
        }

        let searched = self.search_directories();
        for dir in &searched {
            let path = dir.join(&candidate);
            if path.is_file() {
                debug!("Resolved {} to {}", name, path.display());
                return Ok(path);
            }
        }

        Err(LidarError::FileNotFound {
            name: name.to_string(),
            searched,
        })
    }
}

/// `$XDG_DATA_HOME` と `$XDG_DATA_DIRS` の下の `lidarset` ディレクトリ
fn xdg_data_directories() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    match std::env::var("XDG_DATA_HOME") {
        Ok(home) if !home.is_empty() => dirs.push(PathBuf::from(home)),
        _ => {
            if let Ok(home) = std::env::var("HOME") {
                dirs.push(Path::new(&home).join(".local/share"));
            }
        }
    }

    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    dirs.extend(
        data_dirs
            .split(':')
            .filter(|d| !d.is_empty())
            .map(PathBuf::from),
    );

    dirs.into_iter().map(|d| d.join(XDG_SUBDIRECTORY)).collect()
}

/// 一時ファイル名の生成
#[derive(Debug, Clone)]
pub struct TemporaryFiles {
    directory: PathBuf,
}

impl TemporaryFiles {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    /// 存在しない一時ファイルのパスを返す（ディレクトリは必要に応じて作成）
    pub fn filename(&self, extension: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.directory).with_context(|| {
            format!(
                "Failed to create temporary directory: {}",
                self.directory.display()
            )
        })?;

        loop {
            let path = self
                .directory
                .join(format!("{}.{}", uuid::Uuid::new_v4(), extension));
            if !path.exists() {
                return Ok(path);
            }
        }
    }
}

impl ScratchSpace for TemporaryFiles {
    fn temporary_filename(&self, extension: &str) -> Result<PathBuf> {
        self.filename(extension)
    }
}
