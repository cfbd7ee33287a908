//! # Tetrasurf Reconstruction
//!
//! Isosurface extraction from implicit density fields.
//!
//! The extractor samples a field on a body-centred cubic lattice, marches the 24
//! tetrahedra around every node that straddles the surface, and optionally merges each
//! topologically simple node's crossings into a single vertex. A second build repairs any
//! non-manifold edges that merging introduced.
//!
//! ```no_run
//! use tetrasurf_reconstruction::{MarchingTetrahedra, MarchingTetrahedraConfig, RadialDensity, SamplingBox};
//!
//! let bounds = SamplingBox::cube(-1.0, 1.0, 32)?;
//! let extractor = MarchingTetrahedra::new(MarchingTetrahedraConfig::default());
//! let mesh = extractor.extract(&bounds, &RadialDensity)?;
//! println!("{} vertices, {} faces", mesh.vertex_count(), mesh.face_count());
//! # Ok::<(), tetrasurf_core::Error>(())
//! ```

pub mod fields;
pub mod lattice;
pub mod marching_tetrahedra;
pub mod neighbors;
pub mod repair;
pub mod sampler;
pub mod triangulate;
pub mod vertices;

// Re-export commonly used items
pub use fields::*;
pub use lattice::{AxisSpec, Lattice, SamplingBox};
pub use marching_tetrahedra::*;
pub use neighbors::{NeighborTable, Topology};
