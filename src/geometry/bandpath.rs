//! # 能带路径采样
//!
//! 将特殊点序列（如 `GXULG`，逗号分隔不连续的子路径）展开为倒空间采样点。
//!
//! ## 采样规则
//! - 每个特殊点都被精确采样
//! - 各段的采样数与其倒空间长度成正比（最大余数法分配）
//! - 子路径之间的跳跃不增加累计距离
//!
//! ## 依赖关系
//! - 被 `geometry/mod.rs` 调用
//! - 使用 `geometry/bravais.rs`
//! - 使用 `regex` 切分特殊点标签

use super::bravais::{display_label, BravaisLattice};
use crate::error::{LtcError, Result};
use crate::models::structure::norm;
use crate::models::Crystal;

use regex::Regex;

/// 路径上的一个特殊点标记
#[derive(Debug, Clone, PartialEq)]
pub struct PathLabel {
    /// 在采样点中的下标
    pub index: usize,
    /// 累计距离
    pub distance: f64,
    /// 特殊点标签
    pub label: String,
}

/// 采样后的能带路径
#[derive(Debug, Clone)]
pub struct BandPath {
    /// 晶格类型
    pub lattice: BravaisLattice,
    /// 原始路径字符串
    pub path: String,
    /// 分数倒空间坐标
    pub kpts: Vec<[f64; 3]>,
    /// 累计距离 (1/Å)
    pub distances: Vec<f64>,
    /// 特殊点位置
    pub labels: Vec<PathLabel>,
}

impl BandPath {
    /// 总长度
    pub fn total_length(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// 合并同一位置的标签（子路径断点显示为 `X|U`）
    pub fn tick_labels(&self) -> Vec<(f64, String)> {
        let mut ticks: Vec<(f64, String)> = Vec::new();
        for label in &self.labels {
            let text = display_label(&label.label);
            match ticks.last_mut() {
                Some((distance, existing)) if (*distance - label.distance).abs() < 1e-12 => {
                    if *existing != text {
                        existing.push('|');
                        existing.push_str(&text);
                    }
                }
                _ => ticks.push((label.distance, text)),
            }
        }
        ticks
    }
}

/// 切分路径字符串为子路径标签列表
pub fn parse_path(path: &str) -> Result<Vec<Vec<String>>> {
    let label_re = Regex::new(r"[A-Z][a-z0-9]*")
        .map_err(|e| LtcError::InvalidBandPath(e.to_string()))?;

    let mut subpaths = Vec::new();
    for chunk in path.split(',') {
        let chunk = chunk.trim();
        let labels: Vec<String> = label_re
            .find_iter(chunk)
            .map(|m| m.as_str().to_string())
            .collect();

        let consumed: usize = labels.iter().map(|l| l.len()).sum();
        if consumed != chunk.len() {
            return Err(LtcError::InvalidBandPath(format!(
                "unexpected characters in '{}'",
                chunk
            )));
        }
        if labels.len() < 2 {
            return Err(LtcError::InvalidBandPath(format!(
                "sub-path '{}' needs at least two special points",
                chunk
            )));
        }
        subpaths.push(labels);
    }

    Ok(subpaths)
}

struct Segment {
    from: [f64; 3],
    to: [f64; 3],
    from_label: String,
    length: f64,
}

/// 在晶体的倒空间中采样路径
pub fn sample_band_path(crystal: &Crystal, path: &str, npoints: usize) -> Result<BandPath> {
    let lattice = BravaisLattice::detect(&crystal.lattice)?;
    let recip = crystal.lattice.reciprocal().ok_or_else(|| {
        LtcError::UnsupportedLattice("singular lattice has no reciprocal".to_string())
    })?;
    let to_cart = |k: [f64; 3]| -> [f64; 3] {
        let mut cart = [0.0; 3];
        for (i, ki) in k.iter().enumerate() {
            for (j, c) in cart.iter_mut().enumerate() {
                *c += ki * recip[i][j];
            }
        }
        cart
    };

    let subpaths = parse_path(path)?;

    // 每个子路径：(段列表, 终点坐标, 终点标签)
    let mut resolved: Vec<(Vec<Segment>, [f64; 3], String)> = Vec::new();
    for labels in &subpaths {
        let points = labels
            .iter()
            .map(|l| lattice.special_point(l))
            .collect::<Result<Vec<_>>>()?;

        let segments: Vec<Segment> = points
            .windows(2)
            .zip(labels.iter())
            .map(|(pair, label)| {
                let (a, b) = (to_cart(pair[0]), to_cart(pair[1]));
                Segment {
                    from: pair[0],
                    to: pair[1],
                    from_label: label.clone(),
                    length: norm([b[0] - a[0], b[1] - a[1], b[2] - a[2]]),
                }
            })
            .collect();

        let end = points[points.len() - 1];
        let end_label = labels[labels.len() - 1].clone();
        resolved.push((segments, end, end_label));
    }

    let n_segments: usize = resolved.iter().map(|(s, _, _)| s.len()).sum();
    let n_subpaths = resolved.len();
    if npoints < n_segments + n_subpaths {
        return Err(LtcError::InvalidBandPath(format!(
            "'{}' needs at least {} points, got {}",
            path,
            n_segments + n_subpaths,
            npoints
        )));
    }

    let lengths: Vec<f64> = resolved
        .iter()
        .flat_map(|(s, _, _)| s.iter().map(|seg| seg.length))
        .collect();
    let counts = allocate_points(&lengths, npoints - n_subpaths);

    let mut kpts = Vec::with_capacity(npoints);
    let mut distances = Vec::with_capacity(npoints);
    let mut labels = Vec::new();
    let mut offset = 0.0;
    let mut counts_iter = counts.into_iter();

    for (segments, end, end_label) in resolved {
        for seg in segments {
            let n = counts_iter.next().unwrap_or(1);
            labels.push(PathLabel {
                index: kpts.len(),
                distance: offset,
                label: seg.from_label.clone(),
            });
            for j in 0..n {
                let t = j as f64 / n as f64;
                kpts.push([
                    seg.from[0] + t * (seg.to[0] - seg.from[0]),
                    seg.from[1] + t * (seg.to[1] - seg.from[1]),
                    seg.from[2] + t * (seg.to[2] - seg.from[2]),
                ]);
                distances.push(offset + t * seg.length);
            }
            offset += seg.length;
        }
        labels.push(PathLabel {
            index: kpts.len(),
            distance: offset,
            label: end_label,
        });
        kpts.push(end);
        distances.push(offset);
    }

    Ok(BandPath {
        lattice,
        path: path.to_string(),
        kpts,
        distances,
        labels,
    })
}

/// 按长度比例分配每段采样数（每段至少 1 个，总和为 budget）
fn allocate_points(lengths: &[f64], budget: usize) -> Vec<usize> {
    let total: f64 = lengths.iter().sum();
    let ideal: Vec<f64> = if total > 0.0 {
        lengths
            .iter()
            .map(|l| budget as f64 * l / total)
            .collect()
    } else {
        vec![budget as f64 / lengths.len() as f64; lengths.len()]
    };

    let mut counts: Vec<usize> = ideal.iter().map(|x| (x.floor() as usize).max(1)).collect();
    let mut assigned: usize = counts.iter().sum();

    while assigned < budget {
        let i = (0..counts.len())
            .max_by(|&a, &b| {
                let ra = ideal[a] - counts[a] as f64;
                let rb = ideal[b] - counts[b] as f64;
                ra.total_cmp(&rb)
            })
            .unwrap_or(0);
        counts[i] += 1;
        assigned += 1;
    }

    while assigned > budget {
        let candidate = (0..counts.len())
            .filter(|&i| counts[i] > 1)
            .min_by(|&a, &b| {
                let ra = ideal[a] - counts[a] as f64;
                let rb = ideal[b] - counts[b] as f64;
                ra.total_cmp(&rb)
            });
        match candidate {
            Some(i) => {
                counts[i] -= 1;
                assigned -= 1;
            }
            None => break,
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    fn silicon() -> Crystal {
        let h = 5.43 / 2.0;
        Crystal::new(
            "Si",
            Lattice::from_vectors([[0.0, h, h], [h, 0.0, h], [h, h, 0.0]]),
            vec![
                Atom::new("Si", [0.0, 0.0, 0.0]),
                Atom::new("Si", [0.25, 0.25, 0.25]),
            ],
        )
    }

    #[test]
    fn test_parse_path() {
        let parsed = parse_path("GXWKGLUWLK,UX").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].join(""), "GXWKGLUWLK");
        assert_eq!(parsed[1], vec!["U", "X"]);

        let parsed = parse_path("GX1").unwrap();
        assert_eq!(parsed[0], vec!["G", "X1"]);
    }

    #[test]
    fn test_parse_path_rejects_garbage() {
        assert!(matches!(parse_path("G-X"), Err(LtcError::InvalidBandPath(_))));
        assert!(matches!(parse_path("G"), Err(LtcError::InvalidBandPath(_))));
        assert!(matches!(parse_path("GX,"), Err(LtcError::InvalidBandPath(_))));
    }

    #[test]
    fn test_silicon_dispersion_path() {
        let path = sample_band_path(&silicon(), "GXULG", 150).unwrap();

        assert_eq!(path.lattice, BravaisLattice::FaceCenteredCubic);
        assert_eq!(path.kpts.len(), 150);
        assert_eq!(path.distances.len(), 150);
        assert_eq!(path.kpts[0], [0.0, 0.0, 0.0]);
        assert_eq!(path.kpts[149], [0.0, 0.0, 0.0]);
        assert!(path.distances.windows(2).all(|w| w[1] >= w[0]));

        let labels: Vec<&str> = path.labels.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["G", "X", "U", "L", "G"]);
        for label in &path.labels {
            let expected = path.lattice.special_point(&label.label).unwrap();
            assert_eq!(path.kpts[label.index], expected);
            assert!((path.distances[label.index] - label.distance).abs() < 1e-12);
        }
    }

    #[test]
    fn test_uniform_spacing_on_single_segment() {
        let cubic = Crystal::new(
            "cubic",
            Lattice::from_parameters(4.0, 4.0, 4.0, 90.0, 90.0, 90.0),
            vec![Atom::new("X", [0.0, 0.0, 0.0])],
        );
        let path = sample_band_path(&cubic, "GX", 11).unwrap();

        assert_eq!(path.kpts.len(), 11);
        assert!((path.total_length() - 0.125).abs() < 1e-12);
        for (i, d) in path.distances.iter().enumerate() {
            assert!((d - 0.0125 * i as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn test_disconnected_subpaths() {
        let path = sample_band_path(&silicon(), "GX,LG", 20).unwrap();
        assert_eq!(path.kpts.len(), 20);

        let ticks = path.tick_labels();
        let texts: Vec<&str> = ticks.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["Γ", "X|L", "Γ"]);
    }

    #[test]
    fn test_too_few_points() {
        assert!(sample_band_path(&silicon(), "GX,LG", 4).is_ok());
        let err = sample_band_path(&silicon(), "GX,LG", 3).unwrap_err();
        assert!(matches!(err, LtcError::InvalidBandPath(_)));
    }

    #[test]
    fn test_unknown_label_for_lattice() {
        let err = sample_band_path(&silicon(), "GM", 10).unwrap_err();
        assert!(matches!(err, LtcError::UnknownSpecialPoint { .. }));
    }

    #[test]
    fn test_allocate_points_sums_to_budget() {
        let counts = allocate_points(&[1.0, 2.0, 0.0, 3.0], 20);
        assert_eq!(counts.iter().sum::<usize>(), 20);
        assert!(counts.iter().all(|&c| c >= 1));
        assert!(counts[3] > counts[0]);
    }
}
