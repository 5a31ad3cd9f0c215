//! # 运行配置模块
//!
//! 定义不可变的 `RunConfig` 及其派生路径，由 `ConfigResolver` 一次性构造。
//!
//! ## 派生路径
//! ```text
//! <input_root>/<r>x<r>x<r>/          力常数数据
//! <input_root>/3x3x3/POSCAR          参考结构（仅用于能带路径）
//! <output_root>/<r>[u]/              声子 / 热导率输出
//! <output_root>/<r>[u]/dispersion/   色散图
//! ```
//!
//! ## 依赖关系
//! - 被 `rundir/`, `pipeline/`, `engine/`, `commands/` 使用
//! - 子模块: resolver, settings

pub mod resolver;
pub mod settings;

pub use resolver::ConfigResolver;

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// 进程环境快照，仅在程序入口处读取一次
///
/// 值保留为 `OsString`，非 UTF-8 路径原样传递。
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    /// 捕获当前进程的环境变量
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    /// 设置变量（构建器风格）
    #[cfg(test)]
    pub fn with(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// 读取变量，空值视为未设置
    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars
            .get(OsStr::new(key))
            .map(|v| v.as_os_str())
            .filter(|v| !v.is_empty())
    }
}

/// 热导率求解方法
///
/// 固定为完全求逆；引擎侧的方法名由 `engine_name` 给出。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConductivityMethod {
    /// 散射矩阵完全求逆
    Inverse,
}

impl ConductivityMethod {
    /// 引擎使用的方法名
    pub fn engine_name(&self) -> &'static str {
        match self {
            ConductivityMethod::Inverse => "inverse",
        }
    }

    /// 人类可读描述
    pub fn description(&self) -> &'static str {
        match self {
            ConductivityMethod::Inverse => "full inversion",
        }
    }
}

impl std::fmt::Display for ConductivityMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.engine_name())
    }
}

/// 色散路径规格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandPathSpec {
    /// 特殊点序列，如 "GXULG"
    pub path: String,
    /// 采样点数
    pub npoints: usize,
}

/// 传递给外部引擎的并发配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConcurrency {
    /// 线程数提示
    pub threads: usize,
    /// 是否对引擎隐藏所有加速设备
    pub cpu_only: bool,
}

/// 不可变运行配置
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub replica_count: u32,
    pub unfold: bool,
    pub harmonic_only: bool,
    pub overwrite: bool,
    pub concurrency: EngineConcurrency,
    pub kpoint_grid: [u32; 3],
    pub conductivity_method: ConductivityMethod,
    pub band_path: BandPathSpec,
    pub temperature_k: f64,
    pub is_classic: bool,
    pub third_supercell: [u32; 3],
    pub fc_format: String,
    pub acoustic_sum: bool,
    pub storage: String,
    pub input_root: PathBuf,
    pub output_root: PathBuf,
}

impl RunConfig {
    /// 超胞形状 r×r×r
    pub fn supercell(&self) -> [u32; 3] {
        [self.replica_count; 3]
    }

    /// 力常数输入目录
    pub fn input_dir(&self) -> PathBuf {
        let r = self.replica_count;
        self.input_root.join(format!("{}x{}x{}", r, r, r))
    }

    /// 参考结构文件
    pub fn reference_structure(&self) -> PathBuf {
        self.input_root
            .join(settings::REFERENCE_SUPERCELL)
            .join(settings::REFERENCE_STRUCTURE)
    }

    /// 运行目录名：副本数 + 可选的展开标记 `u`
    pub fn run_name(&self) -> String {
        format!(
            "{}{}",
            self.replica_count,
            if self.unfold { "u" } else { "" }
        )
    }

    /// 运行输出目录，只取决于 (replica_count, unfold)
    pub fn output_dir(&self) -> PathBuf {
        self.output_root.join(self.run_name())
    }

    /// 色散图目录
    pub fn dispersion_dir(&self) -> PathBuf {
        self.output_dir().join("dispersion")
    }

    /// 展开标记字符，用于显示
    pub fn unfold_marker(&self) -> char {
        if self.unfold {
            'u'
        } else {
            'n'
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_env() -> Environment {
        Environment::default()
            .with(settings::INPUT_ROOT_VAR, "/data/inputs")
            .with(settings::OUTPUT_ROOT_VAR, "/data/ald")
    }

    fn resolve(tokens: &[&str]) -> RunConfig {
        let tokens: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
        ConfigResolver::resolve(&tokens, &sample_env()).unwrap()
    }

    #[test]
    fn test_derived_paths() {
        let config = resolve(&["4u"]);
        assert_eq!(config.input_dir(), PathBuf::from("/data/inputs/4x4x4"));
        assert_eq!(
            config.reference_structure(),
            PathBuf::from("/data/inputs/3x3x3/POSCAR")
        );
        assert_eq!(config.output_dir(), PathBuf::from("/data/ald/4u"));
        assert_eq!(
            config.dispersion_dir(),
            PathBuf::from("/data/ald/4u/dispersion")
        );
        assert_eq!(config.supercell(), [4, 4, 4]);
    }

    #[test]
    fn test_output_dir_without_unfold_has_no_suffix() {
        let config = resolve(&["3n"]);
        assert_eq!(config.output_dir(), PathBuf::from("/data/ald/3"));
        assert_eq!(config.unfold_marker(), 'n');
    }

    #[test]
    fn test_output_dir_ignores_mode_flags() {
        let plain = resolve(&["5u"]);
        let flagged = resolve(&["5u", "harmonic", "overwrite"]);
        assert_eq!(plain.output_dir(), flagged.output_dir());
        assert_ne!(plain.harmonic_only, flagged.harmonic_only);
        assert_ne!(plain.overwrite, flagged.overwrite);
    }

    #[test]
    fn test_environment_treats_empty_as_unset() {
        let env = Environment::default().with("kaldo_ald", "");
        assert_eq!(env.get("kaldo_ald"), None);
        assert_eq!(env.get("missing"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_environment_keeps_non_utf8_values() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(b"/data/ald-\xff".to_vec());
        let env = Environment::default().with("kaldo_ald", raw.clone());
        assert_eq!(env.get("kaldo_ald"), Some(raw.as_os_str()));
    }

    #[test]
    fn test_conductivity_method_names() {
        assert_eq!(ConductivityMethod::Inverse.engine_name(), "inverse");
        assert_eq!(ConductivityMethod::Inverse.to_string(), "inverse");
        assert_eq!(ConductivityMethod::Inverse.description(), "full inversion");
    }
}
