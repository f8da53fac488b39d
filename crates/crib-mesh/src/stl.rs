//! ASCII STL output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crib_core::{CribError, Result};
use crib_math::Point3;
use log::info;

use crate::{triangle_normal, TriangleMesh};

/// Write `solid name`, one facet block per index triple, then `endsolid name`.
///
/// Facet normals come from each triangle's own winding.
pub fn write_ascii<W: Write>(writer: &mut W, name: &str, points: &[Point3], indices: &[usize]) -> Result<()> {
    if indices.len() % 3 != 0 {
        return Err(CribError::InvalidInputCount {
            what: "triangle indices",
            expected: indices.len() - indices.len() % 3,
            found: indices.len(),
        });
    }
    if let Some(&index) = indices.iter().find(|&&i| i >= points.len()) {
        return Err(CribError::IndexOutOfBounds {
            index,
            len: points.len(),
        });
    }

    writeln!(writer, "solid {name}")?;
    for tri in indices.chunks_exact(3) {
        let corners = [points[tri[0]], points[tri[1]], points[tri[2]]];
        let n = triangle_normal(corners[0], corners[1], corners[2]);
        writeln!(writer, "facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "  outer loop")?;
        for p in corners {
            writeln!(writer, "    vertex {:.6e} {:.6e} {:.6e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "  endloop")?;
        writeln!(writer, "endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;
    Ok(())
}

/// Write a triangle mesh to an ASCII STL file at `path`.
pub fn save_ascii<P: AsRef<Path>>(path: P, name: &str, mesh: &TriangleMesh) -> Result<()> {
    let indices: Vec<usize> = mesh.indices.iter().map(|&i| i as usize).collect();
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_ascii(&mut writer, name, &mesh.positions, &indices)?;
    writer.flush()?;
    info!(
        "wrote {} triangles to {}",
        mesh.triangle_count(),
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crib_math::DVec3;

    fn render(points: &[Point3], indices: &[usize]) -> Result<String> {
        let mut out = Vec::new();
        write_ascii(&mut out, "crib", points, indices)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn numbers(line: &str, keyword: &str) -> Vec<f64> {
        line.trim()
            .strip_prefix(keyword)
            .unwrap()
            .split_whitespace()
            .map(|x| x.parse().unwrap())
            .collect()
    }

    #[test]
    fn test_single_triangle_layout() {
        let points = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let text = render(&points, &[0, 1, 2]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "solid crib");
        assert_eq!(numbers(lines[1], "facet normal"), vec![0.0, 0.0, 1.0]);
        assert_eq!(lines[2], "  outer loop");
        assert_eq!(lines[3], "    vertex 0.000000e0 0.000000e0 0.000000e0");
        assert_eq!(lines[4], "    vertex 1.000000e0 0.000000e0 0.000000e0");
        assert_eq!(numbers(lines[4], "vertex"), vec![1.0, 0.0, 0.0]);
        assert_eq!(numbers(lines[5], "vertex"), vec![0.0, 1.0, 0.0]);
        assert_eq!(&lines[6..], &["  endloop", "endfacet", "endsolid crib"]);
    }

    #[test]
    fn test_normal_follows_winding() {
        let points = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let text = render(&points, &[0, 2, 1]).unwrap();
        let normal = text.lines().nth(1).unwrap();
        assert_eq!(numbers(normal, "facet normal"), vec![0.0, 0.0, -1.0]);
        assert_eq!(numbers(text.lines().nth(4).unwrap(), "vertex"), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_empty_solid() {
        let text = render(&[], &[]).unwrap();
        assert_eq!(text, "solid crib\nendsolid crib\n");
    }

    #[test]
    fn test_rejects_partial_triangle() {
        let points = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let err = render(&points, &[0, 1, 2, 0]).unwrap_err();
        assert!(matches!(err, CribError::InvalidInputCount { expected: 3, found: 4, .. }));
    }

    #[test]
    fn test_rejects_dangling_index() {
        let points = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let err = render(&points, &[0, 1, 3]).unwrap_err();
        assert!(matches!(err, CribError::IndexOutOfBounds { index: 3, len: 3 }));
    }
}
