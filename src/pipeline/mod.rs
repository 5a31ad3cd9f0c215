//! # 计算流程控制
//!
//! 依次执行谐性阶段（色散）与非谐阶段（热导率），每个阶段只执行一次，
//! 协作者的任何错误原样向上传递，不做重试。
//!
//! ## 阶段
//! 1. 构建力常数模型（仅谐性时只读二阶力常数）
//! 2. 构建声子上下文，推导能带路径，导出色散图
//! 3. 仅谐性模式在此提前结束
//! 4. 计算热导率并汇总
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `engine/` 的协作者接口, `rundir/`
//! - 子模块: summary

pub mod summary;

pub use summary::ResultSummary;

use crate::config::RunConfig;
use crate::engine::{GeometryProvider, ModelRequest, PhononEngine, PhononRequest};
use crate::error::Result;
use crate::geometry;
use crate::rundir::{Preparation, RunDirectoryManager};
use crate::utils::output;

use std::path::{Path, PathBuf};

/// 流程控制器的结果
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// 仅谐性，色散完成后结束
    EarlyExit,
    /// 完成全部阶段
    Completed(ResultSummary),
}

/// 一次调用的最终结果
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// 输出目录已存在且不允许覆盖
    Aborted { run_dir: PathBuf },
    /// 仅谐性量已生成
    HarmonicOnly { run_dir: PathBuf },
    /// 全部完成
    Completed {
        run_dir: PathBuf,
        summary: ResultSummary,
    },
}

impl RunOutcome {
    /// 进程退出码：0 完成, 3 仅谐性, 4 覆盖保护中止
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed { .. } => 0,
            RunOutcome::HarmonicOnly { .. } => 3,
            RunOutcome::Aborted { .. } => 4,
        }
    }

    /// 运行目录
    pub fn run_dir(&self) -> &Path {
        match self {
            RunOutcome::Aborted { run_dir }
            | RunOutcome::HarmonicOnly { run_dir }
            | RunOutcome::Completed { run_dir, .. } => run_dir,
        }
    }
}

/// 流程控制器
pub struct PipelineController<'a, E, G> {
    engine: &'a E,
    geometry: &'a G,
}

impl<'a, E: PhononEngine, G: GeometryProvider> PipelineController<'a, E, G> {
    pub fn new(engine: &'a E, geometry: &'a G) -> Self {
        Self { engine, geometry }
    }

    /// 在已准备好的输出目录中执行流程
    pub fn run(&self, config: &RunConfig, run_dir: &Path) -> Result<PipelineOutcome> {
        // 1. 力常数模型
        output::print_info(&format!(
            "Loading force constants from {}",
            config.input_dir().display()
        ));
        let model = self.engine.build_model(&ModelRequest {
            folder: config.input_dir(),
            supercell: config.supercell(),
            third_supercell: config.third_supercell,
            include_third_order: !config.harmonic_only,
            format: config.fc_format.clone(),
            acoustic_sum: config.acoustic_sum,
        })?;

        // 2. 谐性阶段
        let phonons = self.engine.build_phonon_context(
            &model,
            &PhononRequest {
                kpts: config.kpoint_grid,
                unfold: config.unfold,
                temperature_k: config.temperature_k,
                is_classic: config.is_classic,
                folder: run_dir.to_path_buf(),
                storage: config.storage.clone(),
            },
        )?;

        let crystal = self.geometry.load_structure(&config.reference_structure())?;
        let path = self.geometry.derive_band_path(
            &crystal,
            &config.band_path.path,
            config.band_path.npoints,
        )?;
        geometry::print_band_path(&crystal, &path);

        let dispersion_dir = run_dir.join("dispersion");
        self.engine
            .render_dispersion(&phonons, &path, &dispersion_dir)?;
        output::print_success(&format!(
            "Dispersion written to {}",
            dispersion_dir.display()
        ));

        // 3. 提前结束
        if config.harmonic_only {
            output::print_done("Harmonic quantities generated, exiting safely ..");
            return Ok(PipelineOutcome::EarlyExit);
        }

        // 4. 非谐阶段
        output::print_info(&format!(
            "Computing conductivity ({})",
            config.conductivity_method.description()
        ));
        let modes = self
            .engine
            .compute_conductivity(&phonons, config.conductivity_method)?;

        Ok(PipelineOutcome::Completed(ResultSummary::from_modes(&modes)))
    }
}

/// 准备目录并执行流程
pub fn execute<E: PhononEngine, G: GeometryProvider>(
    config: &RunConfig,
    engine: &E,
    geometry: &G,
) -> Result<RunOutcome> {
    let run_dir = match RunDirectoryManager::prepare(config)? {
        Preparation::Abort { run_dir } => return Ok(RunOutcome::Aborted { run_dir }),
        Preparation::Ready { run_dir, .. } => run_dir,
    };

    let outcome = match PipelineController::new(engine, geometry).run(config, &run_dir)? {
        PipelineOutcome::EarlyExit => RunOutcome::HarmonicOnly { run_dir },
        PipelineOutcome::Completed(summary) => RunOutcome::Completed { run_dir, summary },
    };

    Ok(outcome)
}
