//! # Segmentation
//!
//! データセットを空間的に制限するためのポリゴン集合（GeoJSON入力）

use serde::Deserialize;
use serde_json::Value;

use crate::domain::error::LidarError;

/// 1つのポリゴン（外周リング + 穴）。座標は平面（x, y）のみ保持する
pub type Polygon = Vec<Vec<[f64; 2]>>;

/// GeoJSONのポリゴン座標。位置は高さなど追加の要素を持つことがある
type GeoJsonPolygon = Vec<Vec<Vec<f64>>>;

/// セグメンテーション
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    polygons: Vec<Polygon>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJson {
    FeatureCollection { features: Vec<Feature> },
    Feature(Feature),
    Polygon { coordinates: Value },
    MultiPolygon { coordinates: Value },
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Value>,
}

impl Segmentation {
    pub fn new(polygons: Vec<Polygon>) -> Result<Self, LidarError> {
        if polygons.is_empty() {
            return Err(LidarError::InvalidSegmentation(
                "segmentation contains no polygons".to_string(),
            ));
        }
        for polygon in &polygons {
            validate_polygon(polygon)?;
        }
        Ok(Self { polygons })
    }

    /// GeoJSON文字列からセグメンテーションを読み込む
    ///
    /// `FeatureCollection`、`Feature`、`Polygon`、`MultiPolygon` を受け付ける
    pub fn from_geojson(content: &str) -> Result<Self, LidarError> {
        let doc: GeoJson = serde_json::from_str(content)
            .map_err(|e| LidarError::InvalidSegmentation(format!("not a GeoJSON polygon document: {}", e)))?;

        let mut polygons = Vec::new();
        match doc {
            GeoJson::FeatureCollection { features } => {
                for feature in features {
                    collect_geometry(feature.geometry, &mut polygons)?;
                }
            }
            GeoJson::Feature(feature) => collect_geometry(feature.geometry, &mut polygons)?,
            GeoJson::Polygon { coordinates } => polygons.push(parse_polygon(coordinates)?),
            GeoJson::MultiPolygon { coordinates } => polygons.extend(parse_multi_polygon(coordinates)?),
        }

        Self::new(polygons)
    }

    /// ポリゴンの数（空のセグメンテーションは作れないので常に1以上）
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// `filters.crop` に渡すWKTポリゴンのリスト
    pub fn to_wkt(&self) -> Vec<String> {
        self.polygons.iter().map(|polygon| polygon_wkt(polygon)).collect()
    }
}

fn collect_geometry(geometry: Option<Value>, polygons: &mut Vec<Polygon>) -> Result<(), LidarError> {
    let Some(geometry) = geometry else {
        return Ok(());
    };
    let kind = geometry.get("type").and_then(Value::as_str).unwrap_or_default();
    let coordinates = geometry.get("coordinates").cloned().unwrap_or(Value::Null);
    match kind {
        "Polygon" => polygons.push(parse_polygon(coordinates)?),
        "MultiPolygon" => polygons.extend(parse_multi_polygon(coordinates)?),
        other => {
            return Err(LidarError::InvalidSegmentation(format!(
                "unsupported geometry type '{}'",
                other
            )))
        }
    }
    Ok(())
}

fn parse_polygon(coordinates: Value) -> Result<Polygon, LidarError> {
    let polygon: GeoJsonPolygon = serde_json::from_value(coordinates)
        .map_err(|e| LidarError::InvalidSegmentation(format!("bad polygon coordinates: {}", e)))?;
    planar(polygon)
}

fn parse_multi_polygon(coordinates: Value) -> Result<Vec<Polygon>, LidarError> {
    let polygons: Vec<GeoJsonPolygon> = serde_json::from_value(coordinates)
        .map_err(|e| LidarError::InvalidSegmentation(format!("bad multipolygon coordinates: {}", e)))?;
    polygons.into_iter().map(planar).collect()
}

/// 位置を (x, y) に落とす。高さ（3番目以降の要素）は切り捨てる
fn planar(polygon: GeoJsonPolygon) -> Result<Polygon, LidarError> {
    polygon
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|position| match position[..] {
                    [x, y, ..] => Ok([x, y]),
                    _ => Err(LidarError::InvalidSegmentation(format!(
                        "position with {} element(s), need at least 2",
                        position.len()
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

fn validate_polygon(polygon: &Polygon) -> Result<(), LidarError> {
    let Some(exterior) = polygon.first() else {
        return Err(LidarError::InvalidSegmentation("polygon has no rings".to_string()));
    };
    for ring in polygon {
        // GeoJSONのリングは閉じた4点以上
        if ring.len() < 4 {
            return Err(LidarError::InvalidSegmentation(format!(
                "ring with {} positions, need at least 4",
                ring.len()
            )));
        }
    }
    if exterior.first() != exterior.last() {
        return Err(LidarError::InvalidSegmentation("exterior ring is not closed".to_string()));
    }
    Ok(())
}

fn polygon_wkt(polygon: &Polygon) -> String {
    let rings = polygon
        .iter()
        .map(|ring| {
            let positions = ring
                .iter()
                .map(|[x, y]| format!("{} {}", x, y))
                .collect::<Vec<_>>()
                .join(", ");
            format!("({})", positions)
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("POLYGON ({})", rings)
}
