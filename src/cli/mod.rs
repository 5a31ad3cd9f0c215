//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `run`: 按位置参数执行一次热输运计算
//! - `bandpath`: 检查参考结构的晶格类型与高对称路径
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: run, bandpath

pub mod bandpath;
pub mod run;

use clap::{Parser, Subcommand};

/// ltcrun - 晶格热导率计算调度器
#[derive(Parser)]
#[command(name = "ltcrun")]
#[command(version)]
#[command(about = "Lattice thermal conductivity run orchestrator", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Run the dispersion / conductivity pipeline for one replica setting
    Run(run::RunArgs),

    /// Inspect the lattice type and sample a band path for a structure file
    Bandpath(bandpath::BandpathArgs),
}
