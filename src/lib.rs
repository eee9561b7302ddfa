//! # lidarset
//!
//! 考古学的な地形解析のためのLidarデータセット操作ツール
//!
//! データセットはファイルパス、空間参照系、来歴を持つ受動的なハンドルであり、
//! 点群のI/O、再投影、メッシュ生成、描画は全て外部のPDAL/GDALに委譲する。
//!
//! - **Domain層**: エンティティ、ドメインエラー、Repository trait
//! - **Application層**: データセット操作のユースケース
//! - **Adapter層**: PDAL, gdaldem, 設定, パス解決, 来歴サイドカー
//! - **Driver層**: CLI、依存性注入

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
// カバレッジ計測時に外部プロセス依存コードを除外するために使用
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（Presentation）
pub mod driver;
