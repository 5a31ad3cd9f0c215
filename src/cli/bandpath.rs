//! # bandpath 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/bandpath.rs`

use crate::config::settings;

use clap::Args;
use std::path::PathBuf;

/// bandpath 子命令参数
#[derive(Args, Debug)]
pub struct BandpathArgs {
    /// Structure file (POSCAR / CONTCAR / *.vasp)
    pub structure: PathBuf,

    /// Special-point path, e.g. 'GXULG' or 'GXM,GR' (default: lattice default)
    #[arg(long)]
    pub path: Option<String>,

    /// Number of sampled k-points
    #[arg(long, default_value_t = settings::BAND_NPOINTS)]
    pub npoints: usize,

    /// Export the sampled path as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
