//! I/O operations for meshes
//!
//! This crate reads and writes extracted surfaces. The OFF format is supported; the
//! free functions [`read_mesh`] and [`write_mesh`] pick the format from the file
//! extension.

pub mod error;
pub mod off;

pub use error::*;
pub use off::{format_significant, OffReader, OffWriteOptions, OffWriter};

use std::path::Path;
use tetrasurf_core::{Error, Result, TriangleMesh};

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()>;
}

fn is_off(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("off"))
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    if is_off(path) {
        OffReader::read_mesh(path)
    } else {
        Err(Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        )))
    }
}

/// Auto-detect format and write mesh
pub fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    if is_off(path) {
        OffWriter::write_mesh(mesh, path)
    } else {
        Err(Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        )))
    }
}
