//! # ASPRS Classification
//!
//! ASPRS点群分類コードの集合

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::LidarError;

pub const CREATED_NEVER_CLASSIFIED: u8 = 0;
pub const UNCLASSIFIED: u8 = 1;
pub const GROUND: u8 = 2;
pub const LOW_VEGETATION: u8 = 3;
pub const MEDIUM_VEGETATION: u8 = 4;
pub const HIGH_VEGETATION: u8 = 5;
pub const BUILDING: u8 = 6;
pub const LOW_POINT: u8 = 7;
pub const WATER: u8 = 9;
pub const RAIL: u8 = 10;
pub const ROAD_SURFACE: u8 = 11;
pub const WIRE_GUARD: u8 = 13;
pub const WIRE_CONDUCTOR: u8 = 14;
pub const TRANSMISSION_TOWER: u8 = 15;
pub const WIRE_CONNECTOR: u8 = 16;
pub const BRIDGE_DECK: u8 = 17;
pub const HIGH_NOISE: u8 = 18;

/// LAS 1.4で定義されている標準クラスの名前
pub fn class_name(code: u8) -> Option<&'static str> {
    let name = match code {
        CREATED_NEVER_CLASSIFIED => "created, never classified",
        UNCLASSIFIED => "unclassified",
        GROUND => "ground",
        LOW_VEGETATION => "low vegetation",
        MEDIUM_VEGETATION => "medium vegetation",
        HIGH_VEGETATION => "high vegetation",
        BUILDING => "building",
        LOW_POINT => "low point",
        WATER => "water",
        RAIL => "rail",
        ROAD_SURFACE => "road surface",
        WIRE_GUARD => "wire guard (shield)",
        WIRE_CONDUCTOR => "wire conductor (phase)",
        TRANSMISSION_TOWER => "transmission tower",
        WIRE_CONNECTOR => "wire-structure connector",
        BRIDGE_DECK => "bridge deck",
        HIGH_NOISE => "high noise",
        _ => return None,
    };
    Some(name)
}

/// 分類コードの集合
///
/// メッシュ生成や可視化に含める点の分類を表す。デフォルトは全クラス。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationSet {
    codes: BTreeSet<u8>,
}

impl ClassificationSet {
    /// 全ての分類コード（0..=255）
    pub fn all() -> Self {
        Self {
            codes: (0..=u8::MAX).collect(),
        }
    }

    pub fn from_codes(codes: impl IntoIterator<Item = u8>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.codes.len() == usize::from(u8::MAX) + 1
    }

    /// ログ出力用の説明（標準クラスは名前、それ以外はコード）
    pub fn describe(&self) -> String {
        if self.is_all() {
            return "all classes".to_string();
        }
        self.codes
            .iter()
            .map(|&code| match class_name(code) {
                Some(name) => name.to_string(),
                None => format!("class {}", code),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// 連続するコードを `(start, end)` の区間にまとめる
    pub fn ranges(&self) -> Vec<(u8, u8)> {
        let mut ranges: Vec<(u8, u8)> = Vec::new();
        for &code in &self.codes {
            match ranges.last_mut() {
                Some((_, end)) if u16::from(*end) + 1 == u16::from(code) => *end = code,
                _ => ranges.push((code, code)),
            }
        }
        ranges
    }

    /// PDAL `filters.range` の `limits` 式
    ///
    /// 全クラスの場合はフィルタ不要なので `None` を返す
    pub fn range_limits(&self) -> Option<String> {
        if self.is_all() {
            return None;
        }

        let limits = self
            .ranges()
            .into_iter()
            .map(|(start, end)| format!("Classification[{}:{}]", start, end))
            .collect::<Vec<_>>()
            .join(",");
        Some(limits)
    }
}

impl Default for ClassificationSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for ClassificationSet {
    type Err = LidarError;

    /// `"all"`、`"2,6"`、`"3-5"`、`"2,9-11"` 形式をパースする
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }

        let parse_code = |token: &str| {
            token
                .trim()
                .parse::<u8>()
                .map_err(|_| LidarError::InvalidClassification(format!("'{}' is not a code in 0..=255", token.trim())))
        };

        let mut codes = BTreeSet::new();
        for token in s.split(',') {
            if token.trim().is_empty() {
                return Err(LidarError::InvalidClassification(format!(
                    "empty entry in '{}'",
                    s
                )));
            }
            match token.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (parse_code(start)?, parse_code(end)?);
                    if start > end {
                        return Err(LidarError::InvalidClassification(format!(
                            "descending range '{}'",
                            token.trim()
                        )));
                    }
                    codes.extend(start..=end);
                }
                None => {
                    codes.insert(parse_code(token)?);
                }
            }
        }

        Ok(Self { codes })
    }
}

impl fmt::Display for ClassificationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return write!(f, "all");
        }
        let parts = self
            .ranges()
            .into_iter()
            .map(|(start, end)| {
                if start == end {
                    start.to_string()
                } else {
                    format!("{}-{}", start, end)
                }
            })
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join(","))
    }
}
