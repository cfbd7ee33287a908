//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Narrow a sampling-space point to the precision stored in meshes.
#[inline]
pub fn to_mesh_point(p: &Point3d) -> Point3f {
    p.cast::<f32>()
}

/// Widen a mesh point back to sampling precision.
#[inline]
pub fn to_sample_point(p: &Point3f) -> Point3d {
    p.cast::<f64>()
}
