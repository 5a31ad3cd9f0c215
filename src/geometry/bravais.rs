//! # Bravais 晶格识别
//!
//! 根据晶格参数识别晶格类型，并给出高对称点的分数倒空间坐标。
//!
//! ## 支持的晶格
//! | 类型 | 条件 | 默认路径 |
//! |------|------|----------|
//! | CUB  | a=b=c, α=β=γ=90°        | GXMGRX,MR |
//! | FCC  | a=b=c, α=β=γ=60°        | GXWKGLUWLK,UX |
//! | BCC  | a=b=c, α=β=γ=109.47°    | GHNGPH,PN |
//! | TET  | a=b≠c, α=β=γ=90°        | GXMGZRAZ,XR,MA |
//! | ORC  | a≠b≠c, α=β=γ=90°        | GXSYGZURTZ,YT,UX,SR |
//! | HEX  | a=b, α=β=90°, γ=120°    | GMKGALHA,LM,KH |
//!
//! 特殊点坐标采用 Setyawan & Curtarolo 的约定。
//!
//! ## 依赖关系
//! - 被 `geometry/bandpath.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{LtcError, Result};
use crate::models::Lattice;

const LENGTH_TOL: f64 = 1e-3;
const ANGLE_TOL: f64 = 0.1;

/// 体心立方原胞的夹角 acos(-1/3)
const BCC_ANGLE: f64 = 109.471_220_634_490_7;

/// Bravais 晶格类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BravaisLattice {
    Cubic,
    FaceCenteredCubic,
    BodyCenteredCubic,
    Tetragonal,
    Orthorhombic,
    Hexagonal,
}

impl BravaisLattice {
    /// 从晶格参数识别类型
    pub fn detect(lattice: &Lattice) -> Result<Self> {
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        if lattice.inverse().is_none() || [a, b, c].iter().any(|x| !x.is_finite()) {
            return Err(LtcError::UnsupportedLattice(
                "degenerate lattice vectors".to_string(),
            ));
        }

        let ab = same_length(a, b);
        let bc = same_length(b, c);
        let all_angles = |target: f64| {
            [alpha, beta, gamma]
                .iter()
                .all(|x| (x - target).abs() < ANGLE_TOL)
        };

        let kind = if ab && bc && all_angles(90.0) {
            BravaisLattice::Cubic
        } else if ab && bc && all_angles(60.0) {
            BravaisLattice::FaceCenteredCubic
        } else if ab && bc && all_angles(BCC_ANGLE) {
            BravaisLattice::BodyCenteredCubic
        } else if all_angles(90.0) && ab {
            BravaisLattice::Tetragonal
        } else if all_angles(90.0) {
            BravaisLattice::Orthorhombic
        } else if ab
            && (alpha - 90.0).abs() < ANGLE_TOL
            && (beta - 90.0).abs() < ANGLE_TOL
            && (gamma - 120.0).abs() < ANGLE_TOL
        {
            BravaisLattice::Hexagonal
        } else {
            return Err(LtcError::UnsupportedLattice(format!(
                "a={:.4} b={:.4} c={:.4} alpha={:.2} beta={:.2} gamma={:.2}",
                a, b, c, alpha, beta, gamma
            )));
        };

        Ok(kind)
    }

    /// 简称
    pub fn short_name(&self) -> &'static str {
        match self {
            BravaisLattice::Cubic => "CUB",
            BravaisLattice::FaceCenteredCubic => "FCC",
            BravaisLattice::BodyCenteredCubic => "BCC",
            BravaisLattice::Tetragonal => "TET",
            BravaisLattice::Orthorhombic => "ORC",
            BravaisLattice::Hexagonal => "HEX",
        }
    }

    /// 推荐的默认路径
    pub fn default_path(&self) -> &'static str {
        match self {
            BravaisLattice::Cubic => "GXMGRX,MR",
            BravaisLattice::FaceCenteredCubic => "GXWKGLUWLK,UX",
            BravaisLattice::BodyCenteredCubic => "GHNGPH,PN",
            BravaisLattice::Tetragonal => "GXMGZRAZ,XR,MA",
            BravaisLattice::Orthorhombic => "GXSYGZURTZ,YT,UX,SR",
            BravaisLattice::Hexagonal => "GMKGALHA,LM,KH",
        }
    }

    /// 高对称点（分数倒空间坐标）
    pub fn special_points(&self) -> &'static [(&'static str, [f64; 3])] {
        const G: (&str, [f64; 3]) = ("G", [0.0, 0.0, 0.0]);
        match self {
            BravaisLattice::Cubic => &[
                G,
                ("M", [0.5, 0.5, 0.0]),
                ("R", [0.5, 0.5, 0.5]),
                ("X", [0.0, 0.5, 0.0]),
            ],
            BravaisLattice::FaceCenteredCubic => &[
                G,
                ("K", [0.375, 0.375, 0.75]),
                ("L", [0.5, 0.5, 0.5]),
                ("U", [0.625, 0.25, 0.625]),
                ("W", [0.5, 0.25, 0.75]),
                ("X", [0.5, 0.0, 0.5]),
            ],
            BravaisLattice::BodyCenteredCubic => &[
                G,
                ("H", [0.5, -0.5, 0.5]),
                ("N", [0.0, 0.0, 0.5]),
                ("P", [0.25, 0.25, 0.25]),
            ],
            BravaisLattice::Tetragonal => &[
                G,
                ("A", [0.5, 0.5, 0.5]),
                ("M", [0.5, 0.5, 0.0]),
                ("R", [0.0, 0.5, 0.5]),
                ("X", [0.0, 0.5, 0.0]),
                ("Z", [0.0, 0.0, 0.5]),
            ],
            BravaisLattice::Orthorhombic => &[
                G,
                ("R", [0.5, 0.5, 0.5]),
                ("S", [0.5, 0.5, 0.0]),
                ("T", [0.0, 0.5, 0.5]),
                ("U", [0.5, 0.0, 0.5]),
                ("X", [0.5, 0.0, 0.0]),
                ("Y", [0.0, 0.5, 0.0]),
                ("Z", [0.0, 0.0, 0.5]),
            ],
            BravaisLattice::Hexagonal => &[
                G,
                ("A", [0.0, 0.0, 0.5]),
                ("H", [1.0 / 3.0, 1.0 / 3.0, 0.5]),
                ("K", [1.0 / 3.0, 1.0 / 3.0, 0.0]),
                ("L", [0.5, 0.0, 0.5]),
                ("M", [0.5, 0.0, 0.0]),
            ],
        }
    }

    /// 按标签查找高对称点
    pub fn special_point(&self, label: &str) -> Result<[f64; 3]> {
        self.special_points()
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, k)| *k)
            .ok_or_else(|| LtcError::UnknownSpecialPoint {
                label: label.to_string(),
                lattice: self.short_name().to_string(),
            })
    }
}

impl std::fmt::Display for BravaisLattice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// 图表显示用标签（G 显示为 Γ）
pub fn display_label(label: &str) -> String {
    if label == "G" {
        "Γ".to_string()
    } else {
        label.to_string()
    }
}

fn same_length(x: f64, y: f64) -> bool {
    (x - y).abs() <= LENGTH_TOL * x.abs().max(y.abs())
}
