//! lidarset - Lidar dataset CLI
//!
//! PDALを使ったLidarデータセットの変換と来歴管理

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use anyhow::Result;
use clap::Parser;

use lidarset::adapter::config::Config;
use lidarset::driver::workflow::apply_overrides;
use lidarset::driver::{Args, DataSetWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    // Load configuration
    let config = apply_overrides(Config::load(&args.config)?, &args);

    // Create workflow with injected dependencies
    let workflow = DataSetWorkflow::new(config);

    workflow.execute(args).await
}
