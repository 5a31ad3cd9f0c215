//! # 色散图生成
//!
//! 使用 `plotters` 绘制沿高对称路径的声子色散曲线。
//!
//! ## 功能
//! - 每支声子一条曲线
//! - 特殊点处的竖直分隔线与标签（Γ, X, U|K ...）
//! - 支持 PNG 和 SVG 输出（按扩展名选择）
//!
//! ## 依赖关系
//! - 被 `engine/process.rs` 调用
//! - 使用 `geometry/bandpath.rs` 的 BandPath
//! - 使用 `plotters` 渲染图表

use crate::error::{LtcError, Result};
use crate::geometry::BandPath;

use plotters::prelude::*;
use std::path::Path;

/// 生成色散图
pub fn generate_dispersion_plot(
    path: &BandPath,
    frequencies: &[Vec<f64>],
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
) -> Result<()> {
    let use_svg = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_dispersion_chart(&root, path, frequencies, title)?;
        root.present()
            .map_err(|e| LtcError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_dispersion_chart(&root, path, frequencies, title)?;
        root.present()
            .map_err(|e| LtcError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 频率范围，上方留 5% 空白
fn frequency_range(frequencies: &[Vec<f64>]) -> (f64, f64) {
    let values = frequencies.iter().flatten().copied().filter(|v| v.is_finite());
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let lower = min.min(0.0);
    let upper = if max > lower { max * 1.05 } else { lower + 1.0 };
    (lower, upper)
}

/// 绘制色散图的核心逻辑
fn draw_dispersion_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    path: &BandPath,
    frequencies: &[Vec<f64>],
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| LtcError::PlotError(format!("{:?}", e)))?;

    let x_max = path.total_length().max(f64::EPSILON);
    let (y_min, y_max) = frequency_range(frequencies);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)
        .map_err(|e| LtcError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .y_desc("Frequency (THz)")
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| LtcError::PlotError(format!("{:?}", e)))?;

    // 特殊点分隔线与标签
    let tick_style = ("sans-serif", 18).into_font().color(&BLACK);
    for (distance, label) in path.tick_labels() {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(distance, y_min), (distance, y_max)],
                BLACK.mix(0.4).stroke_width(1),
            )))
            .map_err(|e| LtcError::PlotError(format!("{:?}", e)))?;

        chart
            .draw_series(std::iter::once(Text::new(
                label,
                (distance, y_min + (y_max - y_min) * 0.04),
                tick_style.clone(),
            )))
            .map_err(|e| LtcError::PlotError(format!("{:?}", e)))?;
    }

    // 各支声子
    let branches = frequencies.first().map(|row| row.len()).unwrap_or(0);
    let line_color = RGBColor(0, 102, 204);
    for branch in 0..branches {
        // 子路径断点处不连线
        let mut segment: Vec<(f64, f64)> = Vec::new();
        for (i, row) in frequencies.iter().enumerate() {
            let x = path.distances[i];
            let prev_x = segment.last().map(|p| p.0);
            if prev_x.map(|p| (x - p).abs() < 1e-12).unwrap_or(false) {
                chart
                    .draw_series(LineSeries::new(
                        std::mem::take(&mut segment),
                        line_color.stroke_width(2),
                    ))
                    .map_err(|e| LtcError::PlotError(format!("{:?}", e)))?;
            }
            segment.push((x, row[branch]));
        }
        chart
            .draw_series(LineSeries::new(segment, line_color.stroke_width(2)))
            .map_err(|e| LtcError::PlotError(format!("{:?}", e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_range() {
        let (lo, hi) = frequency_range(&[vec![0.0, 2.0], vec![-0.5, 10.0]]);
        assert_eq!(lo, -0.5);
        assert!((hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_range_degenerate() {
        assert_eq!(frequency_range(&[]), (0.0, 1.0));
        assert_eq!(frequency_range(&[vec![0.0, 0.0]]), (0.0, 1.0));
    }
}
