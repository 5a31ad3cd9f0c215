//! # run 子命令 CLI 定义
//!
//! 第一个位置参数为超胞复制数（可带 `u` 表示展开），其后为模式标记。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use crate::engine::process::DEFAULT_ENGINE;

use clap::Args;

const RUN_AFTER_HELP: &str = "\
Mode tokens:
  harmonic    stop after the dispersion (harmonic quantities only)
  overwrite   reuse an existing output directory

Environment:
  kaldo_inputs   root directory of force-constant inputs
  kaldo_ald      root directory of run outputs

Exit codes:
  0 completed, 3 harmonic only, 4 existing output without overwrite, 1 error";

/// run 子命令参数
#[derive(Args, Debug)]
#[command(after_help = RUN_AFTER_HELP)]
pub struct RunArgs {
    /// Replica token, e.g. '3' or '3u' (u enables band unfolding)
    pub replicas: String,

    /// Mode tokens: 'harmonic', 'overwrite'
    pub modes: Vec<String>,

    /// Engine bridge command line (program and leading arguments)
    #[arg(long, default_value = DEFAULT_ENGINE)]
    pub engine: String,
}

impl RunArgs {
    /// 按原顺序拼接全部位置参数
    pub fn tokens(&self) -> Vec<String> {
        std::iter::once(self.replicas.clone())
            .chain(self.modes.iter().cloned())
            .collect()
    }
}
