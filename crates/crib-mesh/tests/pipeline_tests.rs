use crib_core::traits::Validate;
use crib_geometry::intersect::intersect_with_plane;
use crib_geometry::samples::bowl;
use crib_geometry::{SolverConfig, Surface};
use crib_math::{dvec3, Plane};
use crib_mesh::{curve_strip, facet_mesh_to_triangles, skin_mesh, stl, SurfaceMesh};

fn facet_blocks(text: &str) -> usize {
    text.lines().filter(|l| l.starts_with("facet normal")).count()
}

#[test]
fn test_plane_cut_strip_to_stl() {
    let s = bowl();
    let config = SolverConfig::default();
    // x = 0.5 is the line u = 0.5 across the whole patch
    let plane = Plane::new(dvec3(0.5, 0.0, 0.0), dvec3(1.0, 0.0, 0.0)).unwrap();
    let curve = intersect_with_plane(&s, &plane, 1e-5, &config).unwrap().unwrap();

    let polyline: Vec<_> = curve.subdivide(0.002).unwrap().collect();
    assert!(polyline.len() > 2);
    for p in &polyline {
        assert!((p.x - 0.5).abs() < 1e-3, "cut point off the plane: {p}");
    }

    let strip = curve_strip(&curve, 10, 0.2).unwrap();
    strip.validate().unwrap();
    assert_eq!(strip.facet_count(), 20);
    assert_eq!(strip.boundary_edges().len(), 22);

    let triangles = facet_mesh_to_triangles(&strip);
    assert_eq!(triangles.vertex_count(), 22);
    assert_eq!(triangles.triangle_count(), 20);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.stl");
    stl::save_ascii(&path, "cut", &triangles).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("solid cut\n"));
    assert!(text.ends_with("endsolid cut\n"));
    assert_eq!(facet_blocks(&text), 20);
    assert_eq!(text.lines().filter(|l| l.trim_start().starts_with("vertex")).count(), 60);
}

#[test]
fn test_cut_region_overlaps_grid_columns() {
    let s = bowl();
    let plane = Plane::new(dvec3(0.5, 0.0, 0.0), dvec3(1.0, 0.0, 0.0)).unwrap();
    let curve = intersect_with_plane(&s, &plane, 1e-5, &SolverConfig::default())
        .unwrap()
        .unwrap();
    let region = curve.bounding_box_uv().unwrap();

    let grid = SurfaceMesh::uniform(&s, 8, 8).unwrap();
    let hits = grid.overlap(&region);
    // one or two columns of eight cells, two triangles per cell
    assert!(hits.len() == 16 || hits.len() == 32, "{} triangles", hits.len());
    for &i in &hits {
        let extent = grid.extent(i).unwrap();
        assert!(extent.min.x <= 0.5 + 1e-3 && extent.max.x >= 0.5 - 1e-3);
    }
}

#[test]
fn test_skin_exports_every_facet() {
    let s = bowl();
    let skin = skin_mesh(&s, 6, 5, 0.05).unwrap();
    skin.validate().unwrap();
    assert_eq!(skin.facet_count(), 60);
    assert_eq!(skin.boundary_edges().len(), 22);

    let (points, indices) = skin.to_indexed();
    assert_eq!(points.len(), 42);

    let mut out = Vec::new();
    stl::write_ascii(&mut out, "skin", &points, &indices).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(facet_blocks(&text), 60);

    // Outward facets on a bowl point up in the middle of the patch.
    let middle = s.normal_at(0.5, 0.5).unwrap();
    assert!(middle.z > 0.0);
    let upward = skin.facets().filter(|(_, f)| f.normal().z > 0.0).count();
    assert_eq!(upward, 60);
}

#[test]
fn test_uniform_grid_export() {
    let s = bowl();
    let mesh = SurfaceMesh::uniform(&s, 4, 4).unwrap().to_triangle_mesh().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.stl");
    stl::save_ascii(&path, "grid", &mesh).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(facet_blocks(&text), 32);
}
