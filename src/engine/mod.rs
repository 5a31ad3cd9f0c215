//! # 外部协作者接口
//!
//! 物理引擎与几何工具的窄接口。编排层对每个阶段只调用一次，阻塞直至返回，
//! 引擎内部的并发完全由 `EngineConcurrency` 配置。
//!
//! ## 引擎调用约定
//! - `build_model(input_dir, supercell, include_third_order)` -> 力常数模型
//! - `build_phonon_context(model, kpts, unfold, temperature, folder)` -> 声子上下文
//! - `render_dispersion(context, band_path, folder)` -> 仅副作用
//! - `compute_conductivity(context, method)` -> 各模式的 3x3 贡献
//!
//! ## 依赖关系
//! - 被 `pipeline/` 使用
//! - 实现: `engine/process.rs`（子进程桥接）, `geometry/`（几何）
//! - 子模块: exchange, process

pub mod exchange;
pub mod process;

pub use process::ProcessEngine;

use crate::config::ConductivityMethod;
use crate::error::Result;
use crate::geometry::BandPath;
use crate::models::Crystal;

use std::path::{Path, PathBuf};

/// 3x3 矩阵
pub type Matrix3 = [[f64; 3]; 3];

/// 力常数模型构建请求
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    /// 力常数目录
    pub folder: PathBuf,
    /// 二阶力常数超胞
    pub supercell: [u32; 3],
    /// 三阶力常数超胞
    pub third_supercell: [u32; 3],
    /// 是否读取三阶力常数
    pub include_third_order: bool,
    /// 数据格式
    pub format: String,
    /// 是否施加声学求和规则
    pub acoustic_sum: bool,
}

/// 已构建的力常数模型句柄
#[derive(Debug, Clone, PartialEq)]
pub struct ForceConstantModel {
    pub request: ModelRequest,
}

/// 声子上下文构建请求
#[derive(Debug, Clone, PartialEq)]
pub struct PhononRequest {
    /// k 点网格
    pub kpts: [u32; 3],
    /// 是否展开力常数
    pub unfold: bool,
    /// 温度 (K)
    pub temperature_k: f64,
    /// 经典统计（否则为量子统计）
    pub is_classic: bool,
    /// 引擎输出目录
    pub folder: PathBuf,
    /// 引擎存储模式
    pub storage: String,
}

/// 声子采样上下文句柄
#[derive(Debug, Clone, PartialEq)]
pub struct PhononContext {
    pub model: ForceConstantModel,
    pub settings: PhononRequest,
}

/// 物理引擎
pub trait PhononEngine {
    /// 构建力常数模型
    fn build_model(&self, request: &ModelRequest) -> Result<ForceConstantModel>;

    /// 构建声子采样上下文
    fn build_phonon_context(
        &self,
        model: &ForceConstantModel,
        request: &PhononRequest,
    ) -> Result<PhononContext>;

    /// 沿路径计算并导出色散曲线到 `folder`
    fn render_dispersion(&self, context: &PhononContext, path: &BandPath, folder: &Path)
        -> Result<()>;

    /// 计算热导率，返回各模式的贡献
    fn compute_conductivity(
        &self,
        context: &PhononContext,
        method: ConductivityMethod,
    ) -> Result<Vec<Matrix3>>;
}

/// 晶体几何工具
pub trait GeometryProvider {
    /// 读取结构文件
    fn load_structure(&self, path: &Path) -> Result<Crystal>;

    /// 由特殊点序列生成采样路径
    fn derive_band_path(&self, crystal: &Crystal, path: &str, npoints: usize) -> Result<BandPath>;
}
