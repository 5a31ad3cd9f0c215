//! # 固定运行参数
//!
//! 不从命令行读取的运行常量，随 `RunConfig` 一起记录以便追溯。
//!
//! ## 依赖关系
//! - 被 `config/resolver.rs` 使用
//! - 无外部模块依赖

/// 输入根目录环境变量
pub const INPUT_ROOT_VAR: &str = "kaldo_inputs";

/// 输出根目录环境变量
pub const OUTPUT_ROOT_VAR: &str = "kaldo_ald";

// ─────────────────────────────────────────────────────────────
// 谐性阶段
// ─────────────────────────────────────────────────────────────

/// 高对称路径
pub const BAND_PATH: &str = "GXULG";

/// 路径采样点数
pub const BAND_NPOINTS: usize = 150;

/// 提取晶胞几何的参考超胞目录
pub const REFERENCE_SUPERCELL: &str = "3x3x3";

/// 参考结构文件名
pub const REFERENCE_STRUCTURE: &str = "POSCAR";

// ─────────────────────────────────────────────────────────────
// 非谐阶段
// ─────────────────────────────────────────────────────────────

/// 每个引擎进程的线程数
pub const ENGINE_THREADS: usize = 2;

/// k 点网格（立方）
pub const KPOINTS: u32 = 7;

/// 三阶力常数超胞
pub const THIRD_SUPERCELL: [u32; 3] = [3, 3, 3];

/// 温度 (K)
pub const TEMPERATURE_K: f64 = 300.0;

/// 力常数格式
pub const FC_FORMAT: &str = "shengbte-qe";

/// 引擎存储模式
pub const STORAGE: &str = "numpy";
