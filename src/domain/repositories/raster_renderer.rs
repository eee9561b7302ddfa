//! # Raster Renderer Trait
//!
//! 標高ラスタからの可視化画像生成を抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// ラスタ可視化の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterKind {
    Hillshade,
    Slope,
}

impl RasterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RasterKind::Hillshade => "hillshade",
            RasterKind::Slope => "slope",
        }
    }
}

impl fmt::Display for RasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait RasterRenderer: Send + Sync {
    /// `input` の標高ラスタから `kind` の画像を `output` に書き出す
    async fn render(&self, kind: RasterKind, input: &Path, output: &Path) -> Result<()>;
}
