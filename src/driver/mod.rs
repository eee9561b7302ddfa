//! # Driver Layer (Presentation)
//!
//! CLIやその他の外部インターフェースを提供
//!
//! ## 特徴
//!
//! - Use Caseを呼び出してデータセット操作を起動
//! - 依存性注入（DI）を行い、全てを組み立てる
//! - 来歴をサイドカーファイルとして永続化し、CLI呼び出し間で引き継ぐ
//!
//! ## 構成要素
//!
//! - **cli**: CLI引数のパース
//! - **workflow**: コマンドとユースケースの接続

pub mod cli;
pub mod workflow;

pub use cli::Args;
pub use workflow::DataSetWorkflow;
