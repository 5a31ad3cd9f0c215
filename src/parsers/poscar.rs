//! # VASP POSCAR 格式解析器
//!
//! 读取参考超胞目录下的 POSCAR/CONTCAR，只用于提取晶胞几何。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{LtcError, Result};
use crate::models::{Atom, Crystal, Lattice};
use std::fs;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Crystal> {
    if !path.exists() {
        return Err(LtcError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| LtcError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 POSCAR 格式
pub fn parse_poscar_content(content: &str, origin: &str) -> Result<Crystal> {
    let fail = |reason: String| LtcError::ParseError {
        format: "poscar".to_string(),
        path: origin.to_string(),
        reason,
    };

    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 8 {
        return Err(fail("File too short".to_string()));
    }

    let name = match lines[0].trim() {
        "" => "unknown".to_string(),
        comment => comment.to_string(),
    };

    let scale: f64 = lines[1]
        .trim()
        .parse()
        .map_err(|_| fail(format!("Invalid scaling factor '{}'", lines[1].trim())))?;

    let mut matrix = [[0.0; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        let parts: Vec<f64> = lines[2 + i]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.len() < 3 {
            return Err(fail(format!("Invalid lattice vector at line {}", 3 + i)));
        }
        *row = [parts[0] * scale, parts[1] * scale, parts[2] * scale];
    }
    let lattice = Lattice::from_vectors(matrix);

    // VASP 4 没有元素行，直接是原子数
    let line5_parts: Vec<&str> = lines[5].split_whitespace().collect();
    let first = line5_parts
        .first()
        .ok_or_else(|| fail("Missing species line".to_string()))?;
    let (elements, counts, atom_line_start) = if first.parse::<usize>().is_ok() {
        let counts: Vec<usize> = line5_parts.iter().filter_map(|s| s.parse().ok()).collect();
        let elements: Vec<String> = (0..counts.len()).map(|i| format!("X{}", i + 1)).collect();
        (elements, counts, 6)
    } else {
        let elements: Vec<String> = line5_parts.iter().map(|s| s.to_string()).collect();
        let counts: Vec<usize> = lines[6]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        (elements, counts, 7)
    };

    if counts.len() != elements.len() {
        return Err(fail(format!(
            "{} species but {} atom counts",
            elements.len(),
            counts.len()
        )));
    }

    let mut coord_line = atom_line_start;
    if lines.len() > coord_line
        && lines[coord_line]
            .trim()
            .to_lowercase()
            .starts_with('s')
    {
        coord_line += 1;
    }

    if lines.len() <= coord_line {
        return Err(fail("Missing coordinate type line".to_string()));
    }

    let coord_type = lines[coord_line].trim().to_lowercase();
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');

    let mut atoms: Vec<Atom> = Vec::new();
    let mut line_idx = coord_line + 1;

    for (elem, &count) in elements.iter().zip(counts.iter()) {
        for _ in 0..count {
            let parts: Vec<f64> = lines
                .get(line_idx)
                .map(|l| {
                    l.split_whitespace()
                        .take(3)
                        .filter_map(|s| s.parse().ok())
                        .collect()
                })
                .unwrap_or_default();

            if parts.len() < 3 {
                return Err(fail(format!("Invalid atom position at line {}", line_idx + 1)));
            }

            let position = if is_cartesian {
                lattice.cart_to_frac([parts[0] * scale, parts[1] * scale, parts[2] * scale])
            } else {
                [parts[0], parts[1], parts[2]]
            };
            atoms.push(Atom::new(elem.clone(), position));
            line_idx += 1;
        }
    }

    Ok(Crystal::new(name, lattice, atoms))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SILICON_PRIMITIVE: &str = r#"Si
1.0
0.0 2.715 2.715
2.715 0.0 2.715
2.715 2.715 0.0
Si
2
Direct
0.00 0.00 0.00
0.25 0.25 0.25
"#;

    #[test]
    fn test_parse_poscar_vasp5() {
        let crystal = parse_poscar_content(SILICON_PRIMITIVE, "Si").unwrap();
        assert_eq!(crystal.name, "Si");
        assert_eq!(crystal.atoms.len(), 2);
        assert_eq!(crystal.formula(), "Si2");
        assert!((crystal.atoms[1].position[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_parse_poscar_with_scale() {
        let content = r#"Ge
2.0
2.0 0.0 0.0
0.0 2.0 0.0
0.0 0.0 2.0
Ge
1
Direct
0.0 0.0 0.0
"#;
        let crystal = parse_poscar_content(content, "Ge").unwrap();
        let (a, _, _, _, _, _) = crystal.lattice.parameters();
        assert!((a - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_poscar_vasp4_cartesian() {
        let content = r#"cubic
1.0
4.0 0.0 0.0
0.0 4.0 0.0
0.0 0.0 4.0
1 1
Cartesian
0.0 0.0 0.0
2.0 2.0 2.0
"#;
        let crystal = parse_poscar_content(content, "cubic").unwrap();
        assert_eq!(crystal.atoms[0].element, "X1");
        assert_eq!(crystal.atoms[1].element, "X2");
        for x in crystal.atoms[1].position {
            assert!((x - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_parse_poscar_selective_dynamics() {
        let content = r#"Si selective
1.0
5.43 0.0 0.0
0.0 5.43 0.0
0.0 0.0 5.43
Si
2
Selective dynamics
Direct
0.0 0.0 0.0 T T T
0.25 0.25 0.25 F F F
"#;
        let crystal = parse_poscar_content(content, "Si").unwrap();
        assert_eq!(crystal.atoms.len(), 2);
    }

    #[test]
    fn test_truncated_positions_rejected() {
        let content = r#"Si
1.0
5.43 0.0 0.0
0.0 5.43 0.0
0.0 0.0 5.43
Si
3
Direct
0.0 0.0 0.0
0.25 0.25 0.25
"#;
        let err = parse_poscar_content(content, "Si").unwrap_err();
        assert!(matches!(err, LtcError::ParseError { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_poscar_file(Path::new("/nonexistent/3x3x3/POSCAR")).unwrap_err();
        assert!(matches!(err, LtcError::FileNotFound { .. }));
    }
}
