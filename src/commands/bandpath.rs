//! # bandpath 命令实现
//!
//! 读取结构文件，识别 Bravais 晶格，采样高对称路径并可导出 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/bandpath.rs` 定义的参数
//! - 使用 `geometry/`, `engine/exchange.rs`, `utils/output.rs`

use crate::cli::bandpath::BandpathArgs;
use crate::engine::exchange;
use crate::engine::GeometryProvider;
use crate::error::Result;
use crate::geometry::{self, BravaisLattice, CrystalGeometry};
use crate::utils::output;

/// 执行 bandpath 命令
pub fn execute(args: BandpathArgs) -> Result<()> {
    let provider = CrystalGeometry;
    let crystal = provider.load_structure(&args.structure)?;

    let path = match args.path {
        Some(p) => p,
        None => BravaisLattice::detect(&crystal.lattice)?
            .default_path()
            .to_string(),
    };

    let band_path = provider.derive_band_path(&crystal, &path, args.npoints)?;
    geometry::print_band_path(&crystal, &band_path);

    if let Some(csv) = args.csv {
        exchange::write_band_path_csv(&band_path, &csv)?;
        output::print_success(&format!("Band path saved to '{}'", csv.display()));
    }

    Ok(())
}
