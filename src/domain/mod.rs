//! # Domain Layer
//!
//! このモジュールはデータセットの核心的なルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - 外部プロセスやファイルシステムの詳細を知らない
//! - 点群処理そのものは行わず、パイプラインの記述のみを持つ
//!
//! ## 構成要素
//!
//! - **entities**: ビジネスエンティティ（DataSet, Pipelineなど）
//! - **error**: ドメインエラー
//! - **repositories**: Repository trait（インターフェース定義のみ）
//! - **services**: Domain Service（来歴レポート）

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
