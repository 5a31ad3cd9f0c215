//! # ltcrun - 晶格热导率计算调度器
//!
//! 从位置参数与环境变量解析一次运行，准备输出目录，
//! 驱动外部声子引擎完成色散与热导率计算并汇总结果。
//!
//! ## 子命令
//! - `run`      - 执行色散 / 热导率流程
//! - `bandpath` - 检查结构的晶格类型与高对称路径
//!
//! ## 退出码
//! - 0 完成, 3 仅谐性, 4 输出已存在且不允许覆盖, 1 错误, 2 参数错误
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── config/    (运行配置解析)
//!   │     ├── rundir/    (输出目录管理)
//!   │     └── pipeline/  (计算流程控制)
//!   │           ├── engine/    (外部声子引擎)
//!   │           ├── geometry/  (晶格与能带路径)
//!   │           └── plot/      (色散图)
//!   ├── parsers/    (结构文件解析)
//!   ├── models/     (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod config;
mod engine;
mod error;
mod geometry;
mod models;
mod parsers;
mod pipeline;
mod plot;
mod rundir;
mod utils;

use clap::Parser;
use cli::Cli;
use config::Environment;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    let env = Environment::capture();

    match commands::run(cli.command, &env) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            utils::output::print_error(&format!("{}", e));
            if e.is_config() {
                utils::output::print_info("See `ltcrun run --help` for accepted arguments");
            }
            std::process::exit(1);
        }
    }
}
