//! # Raster Options DTO
//!
//! メッシュ生成・可視化オプションのData Transfer Object

use crate::domain::entities::classification::ClassificationSet;

pub const DEFAULT_RESOLUTION: f64 = 2.0;
pub const DEFAULT_POINTS_THRESHOLD: u64 = 750_000;

/// ラスタ生成オプション
///
/// 考古学用途のメッシュは従来のDTMではなくDFM（地表面と建造物など関連する構造物を含み、植生を除く）である。
/// どの分類を含めるかは `classification` で指定する。
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// メッシュ解像度（メートル）
    pub resolution: f64,
    /// メッシュに含める分類コード
    pub classification: ClassificationSet,
}

impl RasterOptions {
    /// 新しいラスタ生成オプションを作成します。
    ///
    /// # 例
    ///
    /// 地表面と建物のみのDFM：
    ///
    /// ```
    /// use lidarset::application::dto::raster_options::RasterOptions;
    /// use lidarset::domain::entities::classification::{ClassificationSet, BUILDING, GROUND};
    ///
    /// let options = RasterOptions::new(0.5, ClassificationSet::from_codes([GROUND, BUILDING]));
    ///
    /// assert_eq!(options.resolution, 0.5);
    /// assert_eq!(
    ///     options.classification.range_limits().as_deref(),
    ///     Some("Classification[2:2],Classification[6:6]")
    /// );
    /// ```
    pub fn new(resolution: f64, classification: ClassificationSet) -> Self {
        Self {
            resolution,
            classification,
        }
    }
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION, ClassificationSet::all())
    }
}
