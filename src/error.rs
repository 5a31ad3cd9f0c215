//! # 统一错误处理模块
//!
//! 定义 ltcrun 的所有错误类型，使用 `thiserror` 派生。
//!
//! 目录冲突导致的中止不是错误，而是 `RunOutcome::Aborted`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// ltcrun 统一错误类型
#[derive(Error, Debug)]
pub enum LtcError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory: {path}")]
    DirectoryCreate {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid replica specification '{token}': {reason}")]
    InvalidReplica { token: String, reason: String },

    #[error("Unknown mode token '{0}' (expected 'harmonic' or 'overwrite')")]
    UnknownModeToken(String),

    #[error("Environment variable '{name}' is not set")]
    MissingEnvironment { name: String },

    // ─────────────────────────────────────────────────────────────
    // 外部引擎错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Unexpected engine output in {path}: {reason}")]
    EngineOutput { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 几何错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported lattice: {0}")]
    UnsupportedLattice(String),

    #[error("Special point '{label}' is not defined for {lattice} lattices")]
    UnknownSpecialPoint { label: String, lattice: String },

    #[error("Invalid band path: {0}")]
    InvalidBandPath(String),

    // ─────────────────────────────────────────────────────────────
    // 绘图 / CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Plot rendering failed: {0}")]
    PlotError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl LtcError {
    /// 是否属于配置错误（命令行参数或环境变量）
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            LtcError::InvalidReplica { .. }
                | LtcError::UnknownModeToken(_)
                | LtcError::MissingEnvironment { .. }
        )
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, LtcError>;
