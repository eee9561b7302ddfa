//! PDAL Info Parsing
//!
//! `pdal info --summary` の出力の解析

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::repositories::pipeline_engine::DataSetSummary;

#[derive(Debug, Deserialize)]
struct InfoOutput {
    summary: SummarySection,
}

#[derive(Debug, Deserialize)]
struct SummarySection {
    num_points: u64,
    #[serde(default)]
    srs: Option<SrsSection>,
}

#[derive(Debug, Deserialize)]
struct SrsSection {
    #[serde(default)]
    wkt: Option<String>,
    #[serde(default)]
    compoundwkt: Option<String>,
}

/// Parses the JSON printed by `pdal info --summary`.
pub fn parse_summary(output: &str) -> Result<DataSetSummary> {
    let info: InfoOutput =
        serde_json::from_str(output).context("Failed to parse pdal info output")?;

    // 水平+鉛直の複合SRSを優先し、空文字列はSRS無しとして扱う
    let spatial_reference = info
        .summary
        .srs
        .and_then(|srs| {
            [srs.compoundwkt, srs.wkt]
                .into_iter()
                .flatten()
                .find(|wkt| !wkt.is_empty())
        });

    Ok(DataSetSummary {
        point_count: info.summary.num_points,
        spatial_reference,
    })
}
