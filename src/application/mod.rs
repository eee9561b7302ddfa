//! # Application Layer
//!
//! データセット操作のユースケース
//!
//! ## 特徴
//!
//! - Domain層のエンティティとRepository traitを組み合わせて操作を実現
//! - 全ての変換は新しい `DataSet` を返し、入力を変更しない
//! - 点群処理そのものは `PipelineEngine` に委譲する
//!
//! ## 構成要素
//!
//! - **dto**: Data Transfer Object
//! - **use_cases**: ユースケース

pub mod dto;
pub mod use_cases;
