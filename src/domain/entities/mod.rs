//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **DataSet**: Lidarデータセットのハンドル
//! - **ClassificationSet**: ASPRS分類コードの集合
//! - **Pipeline**: PDALパイプラインのバリューオブジェクト
//! - **Segmentation**: 空間制限用のポリゴン集合

pub mod classification;
pub mod dataset;
pub mod pipeline;
pub mod segmentation;
