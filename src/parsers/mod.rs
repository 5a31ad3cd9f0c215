//! # 解析器模块
//!
//! 读取参考结构文件。
//!
//! ## 依赖关系
//! - 被 `geometry/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar

pub mod poscar;

use crate::error::{LtcError, Result};
use crate::models::Crystal;
use std::path::Path;

/// 从文件名推断格式并解析
pub fn parse_structure_file(path: &Path) -> Result<Crystal> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let is_vasp = name.starts_with("POSCAR")
        || name.starts_with("CONTCAR")
        || path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("vasp"))
            .unwrap_or(false);

    if is_vasp {
        poscar::parse_poscar_file(path)
    } else {
        Err(LtcError::ParseError {
            format: "structure".to_string(),
            path: path.display().to_string(),
            reason: "Cannot determine format (expected POSCAR, CONTCAR or *.vasp)".to_string(),
        })
    }
}
