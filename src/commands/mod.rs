//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，返回进程退出码。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config/`, `pipeline/`, `geometry/`, `utils/`
//! - 子模块: run, bandpath

pub mod bandpath;
pub mod run;

use crate::cli::Commands;
use crate::config::Environment;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands, env: &Environment) -> Result<i32> {
    match cmd {
        Commands::Run(args) => run::execute(args, env),
        Commands::Bandpath(args) => bandpath::execute(args).map(|_| 0),
    }
}
