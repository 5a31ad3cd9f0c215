//! # 晶体几何模块
//!
//! 参考结构读取、Bravais 晶格识别与能带路径采样。
//!
//! ## 依赖关系
//! - 被 `pipeline/` 和 `commands/bandpath.rs` 使用
//! - 使用 `parsers/`, `models/`, `utils/output.rs`
//! - 子模块: bravais, bandpath

pub mod bandpath;
pub mod bravais;

pub use bandpath::BandPath;
pub use bravais::BravaisLattice;

use crate::engine::GeometryProvider;
use crate::error::Result;
use crate::models::Crystal;
use crate::parsers;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 基于本地 POSCAR 解析的几何实现
#[derive(Debug, Default, Clone, Copy)]
pub struct CrystalGeometry;

impl GeometryProvider for CrystalGeometry {
    fn load_structure(&self, path: &Path) -> Result<Crystal> {
        parsers::parse_structure_file(path)
    }

    fn derive_band_path(&self, crystal: &Crystal, path: &str, npoints: usize) -> Result<BandPath> {
        bandpath::sample_band_path(crystal, path, npoints)
    }
}

/// 打印晶胞、特殊点与路径信息
pub fn print_band_path(crystal: &Crystal, path: &BandPath) {
    #[derive(Tabled)]
    struct PointRow {
        #[tabled(rename = "Label")]
        label: String,
        #[tabled(rename = "k (fractional)")]
        kpt: String,
    }

    output::print_info(&format!(
        "Unit cell detected: {} ({} lattice)",
        crystal.formula(),
        path.lattice.short_name()
    ));

    let rows: Vec<PointRow> = path
        .lattice
        .special_points()
        .iter()
        .map(|(label, k)| PointRow {
            label: bravais::display_label(label),
            kpt: format!("{:>7.4} {:>7.4} {:>7.4}", k[0], k[1], k[2]),
        })
        .collect();

    output::print_header("Special points");
    println!("{}", Table::new(&rows));

    output::print_info(&format!(
        "Band path: {} ({} points, length {:.4} 1/Å)",
        path.path,
        path.kpts.len(),
        path.total_length()
    ));
}
