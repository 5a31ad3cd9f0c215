//! # 热导率结果汇总
//!
//! 将各模式贡献求和为 3x3 矩阵，并给出对角均值与非对角绝对值之和。
//!
//! ## 依赖关系
//! - 被 `pipeline/mod.rs` 和 `commands/run.rs` 使用
//! - 无外部模块依赖

use crate::engine::Matrix3;

/// 单次运行的热导率汇总
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    /// 热导率矩阵 (W/m-K)
    pub matrix: Matrix3,
    /// 对角元均值
    pub diagonal_mean: f64,
    /// 非对角元绝对值之和
    pub offdiag_sum: f64,
}

impl ResultSummary {
    /// 由热导率矩阵计算汇总
    pub fn from_matrix(matrix: Matrix3) -> Self {
        let diag = [matrix[0][0], matrix[1][1], matrix[2][2]];
        let abs_total: f64 = matrix.iter().flatten().map(|x| x.abs()).sum();
        let abs_diag: f64 = diag.iter().map(|x| x.abs()).sum();

        ResultSummary {
            matrix,
            diagonal_mean: diag.iter().sum::<f64>() / 3.0,
            offdiag_sum: abs_total - abs_diag,
        }
    }

    /// 先对各模式贡献求和
    pub fn from_modes(modes: &[Matrix3]) -> Self {
        let mut total = [[0.0; 3]; 3];
        for mode in modes {
            for (row, mode_row) in total.iter_mut().zip(mode.iter()) {
                for (x, m) in row.iter_mut().zip(mode_row.iter()) {
                    *x += m;
                }
            }
        }
        Self::from_matrix(total)
    }
}
