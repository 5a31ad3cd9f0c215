//! # run 命令实现
//!
//! 解析配置，准备输出目录，驱动计算流程并汇报结果。
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `config/`, `engine/`, `geometry/`, `pipeline/`
//! - 使用 `utils/output.rs`

use crate::cli::run::RunArgs;
use crate::config::{ConductivityMethod, ConfigResolver, Environment, RunConfig};
use crate::engine::ProcessEngine;
use crate::error::Result;
use crate::geometry::CrystalGeometry;
use crate::pipeline::{self, ResultSummary, RunOutcome};
use crate::rundir::RunDirectoryManager;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};
use walkdir::WalkDir;

/// 执行 run 命令
pub fn execute(args: RunArgs, env: &Environment) -> Result<i32> {
    let config = ConfigResolver::resolve(&args.tokens(), env)?;
    print_settings(&config);

    let engine = ProcessEngine::new(&args.engine, config.concurrency)?;
    output::print_info(&format!(
        "Engine: {} ({} threads{})",
        engine.program(),
        config.concurrency.threads,
        if config.concurrency.cpu_only { ", cpu only" } else { "" }
    ));

    let outcome = pipeline::execute(&config, &engine, &CrystalGeometry)?;

    let run_dir = outcome.run_dir();
    match &outcome {
        RunOutcome::Aborted { .. } => {
            output::print_warning(&format!(
                "Nothing written, {} left untouched",
                run_dir.display()
            ));
        }
        RunOutcome::HarmonicOnly { .. } => list_artifacts(run_dir),
        RunOutcome::Completed { summary, .. } => {
            print_summary(summary, config.conductivity_method);
            list_artifacts(run_dir);
        }
    }

    Ok(outcome.exit_code())
}

/// 打印本次运行的设置
fn print_settings(config: &RunConfig) {
    let [a, b, c] = config.supercell();
    output::print_header("Run settings");
    println!("  Supercell        : {}x{}x{}", a, b, c);
    println!("  Unfold           : {}", config.unfold_marker());
    println!("  In folder        : {}", config.input_dir().display());
    println!("  Out folder       : {}", config.output_dir().display());
    println!("  Dispersion folder: {}", config.dispersion_dir().display());
    println!("  Dispersion only  : {}", config.harmonic_only);
    println!("  Overwrite        : {}", config.overwrite);
    println!("  k-point grid     : {:?}", config.kpoint_grid);
    println!("  Temperature (K)  : {}", config.temperature_k);
    println!("  Output state     : {:?}", RunDirectoryManager::inspect(config));
    output::print_separator();
}

/// 打印热导率汇总
fn print_summary(summary: &ResultSummary, method: ConductivityMethod) {
    #[derive(Tabled)]
    struct MatrixRow {
        #[tabled(rename = "")]
        axis: &'static str,
        #[tabled(rename = "x")]
        x: String,
        #[tabled(rename = "y")]
        y: String,
        #[tabled(rename = "z")]
        z: String,
    }

    let rows: Vec<MatrixRow> = ["x", "y", "z"]
        .into_iter()
        .zip(summary.matrix.iter())
        .map(|(axis, row)| MatrixRow {
            axis,
            x: format!("{:.3}", row[0]),
            y: format!("{:.3}", row[1]),
            z: format!("{:.3}", row[2]),
        })
        .collect();

    output::print_header("Thermal conductivity");
    output::print_success(&conductivity_line(summary, method));
    output::print_info(&format!(
        "Sum of off-diagonal terms: {:.3}",
        summary.offdiag_sum
    ));
    println!("{}", Table::new(&rows));
}

/// 热导率标题行，方法名取自实际使用的求解方法
fn conductivity_line(summary: &ResultSummary, method: ConductivityMethod) -> String {
    format!(
        "Conductivity from {} (W/m-K): {:.3}",
        method.description(),
        summary.diagonal_mean
    )
}

/// 列出运行目录中的产物
fn list_artifacts(run_dir: &Path) {
    let files: Vec<_> = WalkDir::new(run_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .collect();

    if files.is_empty() {
        return;
    }

    output::print_header(&format!("Artifacts in {}", run_dir.display()));
    for entry in files {
        let rel = entry.path().strip_prefix(run_dir).unwrap_or(entry.path());
        println!("  {}", rel.display());
    }
}
