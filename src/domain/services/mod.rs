//! # Domain Services
//!
//! - **provenance_report**: 来歴レポートの書き出し

pub mod provenance_report;
