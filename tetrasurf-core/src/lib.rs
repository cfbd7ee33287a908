//! Core data structures and traits for tetrasurf
//!
//! This crate provides the mesh type produced by isosurface extraction, the
//! [`ScalarField`] abstraction it samples, and the edge bookkeeping used to
//! diagnose manifoldness.

pub mod edges;
pub mod error;
pub mod mesh;
pub mod point;
pub mod traits;

pub use edges::*;
pub use error::*;
pub use mesh::*;
pub use point::*;
pub use traits::*;
