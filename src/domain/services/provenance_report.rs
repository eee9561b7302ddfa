//! # Provenance Report Service
//!
//! 来歴レポートの書き出し

use std::io::{self, Write};

use crate::domain::entities::dataset::DataSet;

pub const REPORT_HEADER: &str = "Provenance report generated by lidarset:";

/// 来歴レポートサービス
///
/// データセットを生成した入力データとフィルタ列を、再現可能な形でストリームに書き出す
pub struct ProvenanceReportService;

impl ProvenanceReportService {
    /// 来歴レポートを書き出す
    ///
    /// # Arguments
    ///
    /// * `dataset` - 対象データセット
    /// * `stream` - 出力先（標準出力やファイルなど）
    pub fn write<W: Write + ?Sized>(dataset: &DataSet, stream: &mut W) -> io::Result<()> {
        stream.write_all(Self::render(dataset).as_bytes())?;
        stream.flush()
    }

    /// 来歴レポートを文字列として返す
    pub fn render(dataset: &DataSet) -> String {
        let mut report = format!("{}\n\n", REPORT_HEADER);
        for (i, entry) in dataset.provenance().iter().enumerate() {
            report.push_str(&format!("Item #{}:\n{}\n\n", i, entry));
        }
        report
    }
}
