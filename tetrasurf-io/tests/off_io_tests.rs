//! File-level tests for OFF reading and writing

use std::fs;
use std::path::PathBuf;
use tetrasurf_core::{Error, Point3d};
use tetrasurf_io::{read_mesh, write_mesh, OffWriteOptions, OffWriter};
use tetrasurf_reconstruction::{MarchingTetrahedra, RadialDensity, SamplingBox};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tetrasurf_{}_{}", std::process::id(), name))
}

#[test]
fn test_extracted_mesh_survives_file_roundtrip() {
    let bounds = SamplingBox::cube(-1.0, 1.0, 10).unwrap();
    let mesh = MarchingTetrahedra::default()
        .extract(&bounds, &RadialDensity)
        .unwrap();

    let path = temp_path("density.off");
    write_mesh(&mesh, &path).unwrap();
    let loaded = read_mesh(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(loaded.faces, mesh.faces);
    assert_eq!(loaded.vertex_count(), mesh.vertex_count());
    for (a, b) in mesh.vertices.iter().zip(&loaded.vertices) {
        assert!((a - b).norm() < 1e-5);
    }
    assert_eq!(loaded.euler_characteristic(), 2);
    assert!((loaded.radius_from(&Point3d::origin()) - 0.5_f64.sqrt()).abs() < 0.2);
}

#[test]
fn test_header_comments_and_precision() {
    let bounds = SamplingBox::cube(-1.0, 1.0, 4).unwrap();
    let mesh = MarchingTetrahedra::default()
        .extract(&bounds, &RadialDensity)
        .unwrap();

    let path = temp_path("comments.off");
    let options = OffWriteOptions::default()
        .with_precision(3)
        .with_comment("Produced by tetrasurf")
        .with_comment("threshold 0.5");
    OffWriter::write_mesh_with_options(&mesh, &path, &options).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    let loaded = read_mesh(&path).unwrap();
    let _ = fs::remove_file(&path);

    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("OFF"));
    assert_eq!(lines.next(), Some("# Produced by tetrasurf"));
    assert_eq!(lines.next(), Some("# threshold 0.5"));
    assert_eq!(
        lines.next(),
        Some(format!("{} {} 0", mesh.vertex_count(), mesh.face_count()).as_str())
    );
    for line in lines.take(mesh.vertex_count()) {
        for token in line.split_whitespace() {
            let mantissa = token.split('e').next().unwrap();
            let significant: String = mantissa
                .chars()
                .filter(|c| c.is_ascii_digit())
                .skip_while(|&c| c == '0')
                .collect();
            assert!(significant.len() <= 3, "coordinate {}", token);
        }
    }
    assert_eq!(loaded.faces, mesh.faces);
}

#[test]
fn test_unknown_extension_is_rejected() {
    let mesh = tetrasurf_core::TriangleMesh::new();
    assert!(matches!(
        write_mesh(&mesh, temp_path("mesh.stl")),
        Err(Error::UnsupportedFormat(_))
    ));
    assert!(matches!(
        read_mesh(temp_path("mesh")),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_file_is_an_io_error() {
    assert!(matches!(
        read_mesh(temp_path("does_not_exist.off")),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_malformed_file_reports_line() {
    let path = temp_path("broken.off");
    fs::write(&path, "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 x\n3 0 1 2\n").unwrap();
    let result = read_mesh(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(result, Err(Error::Parse { line: 5, .. })));
}
