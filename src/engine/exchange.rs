//! # 引擎交换文件
//!
//! 与外部引擎之间通过 CSV 文件交换数据。
//!
//! ## 文件格式
//! - `band_path.csv`: `index,kx,ky,kz,distance,label`（分数倒空间坐标）
//! - `frequencies.csv`: 每行一个路径点，每列一支声子 (THz)，首行为表头
//! - `conductivity_modes.csv`: `mode,xx,xy,xz,yx,yy,yz,zx,zy,zz` (W/m-K)
//!
//! ## 依赖关系
//! - 被 `engine/process.rs` 和 `commands/bandpath.rs` 使用
//! - 使用 `csv` 和 `serde`

use super::Matrix3;
use crate::error::{LtcError, Result};
use crate::geometry::BandPath;

use serde::Deserialize;
use std::path::Path;

/// 导出路径采样点
pub fn write_band_path_csv(path: &BandPath, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["index", "kx", "ky", "kz", "distance", "label"])?;

    for (i, (k, d)) in path.kpts.iter().zip(path.distances.iter()).enumerate() {
        let label = path
            .labels
            .iter()
            .find(|l| l.index == i)
            .map(|l| l.label.as_str())
            .unwrap_or("");
        wtr.write_record(&[
            i.to_string(),
            format!("{:.10}", k[0]),
            format!("{:.10}", k[1]),
            format!("{:.10}", k[2]),
            format!("{:.10}", d),
            label.to_string(),
        ])?;
    }

    wtr.flush().map_err(|e| LtcError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 读取色散频率表
pub fn read_frequencies_csv(input_path: &Path) -> Result<Vec<Vec<f64>>> {
    let mut rdr = csv::Reader::from_path(input_path)?;
    let mut rows = Vec::new();

    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| field.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()
            .map_err(|e| LtcError::EngineOutput {
                path: input_path.display().to_string(),
                reason: format!("row {}: {}", line + 1, e),
            })?;
        rows.push(row);
    }

    if let Some(first) = rows.first() {
        if first.is_empty() || rows.iter().any(|r| r.len() != first.len()) {
            return Err(LtcError::EngineOutput {
                path: input_path.display().to_string(),
                reason: "rows have inconsistent branch counts".to_string(),
            });
        }
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct ModeRecord {
    #[allow(dead_code)]
    mode: usize,
    xx: f64,
    xy: f64,
    xz: f64,
    yx: f64,
    yy: f64,
    yz: f64,
    zx: f64,
    zy: f64,
    zz: f64,
}

/// 读取各模式热导率贡献
pub fn read_mode_conductivity_csv(input_path: &Path) -> Result<Vec<Matrix3>> {
    let mut rdr = csv::Reader::from_path(input_path)?;
    let mut modes = Vec::new();

    for record in rdr.deserialize() {
        let r: ModeRecord = record?;
        modes.push([[r.xx, r.xy, r.xz], [r.yx, r.yy, r.yz], [r.zx, r.zy, r.zz]]);
    }

    if modes.is_empty() {
        return Err(LtcError::EngineOutput {
            path: input_path.display().to_string(),
            reason: "no conductivity contributions".to_string(),
        });
    }

    Ok(modes)
}
