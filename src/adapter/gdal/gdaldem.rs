//! gdaldem Renderer
//!
//! RasterRendererのgdaldem実装

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::info;
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command;

use crate::domain::repositories::raster_renderer::{RasterKind, RasterRenderer};

/// `gdaldem` を呼び出すレンダラー
pub struct GdalDemRenderer {
    executable: String,
}

impl GdalDemRenderer {
    pub fn new(executable: String) -> Self {
        Self { executable }
    }

    /// Builds the gdaldem argument list. PNG output is chosen from the file extension.
    pub fn arguments(kind: RasterKind, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![kind.as_str().into(), input.into(), output.into()];

        let is_png = output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png {
            args.push("-of".into());
            args.push("PNG".into());
        }
        // 端のピクセルも計算する
        args.push("-compute_edges".into());

        args
    }
}

#[async_trait]
impl RasterRenderer for GdalDemRenderer {
    #[cfg_attr(coverage_nightly, coverage(off))]
    async fn render(&self, kind: RasterKind, input: &Path, output: &Path) -> Result<()> {
        info!("Rendering {} of {} to {}", kind, input.display(), output.display());

        let result = Command::new(&self.executable)
            .args(Self::arguments(kind, input, output))
            .output()
            .await
            .with_context(|| format!("Failed to spawn '{}'", self.executable))?;

        if !result.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.executable,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            );
        }
        Ok(())
    }
}
