//! Core traits for tetrasurf

use crate::{mesh::*, point::*};

/// A scalar density sampled over 3D space
///
/// Positive values lie on the inside of an extracted surface once the threshold has
/// been subtracted. Any `Fn(&Point3d) -> f64` closure is a field.
pub trait ScalarField {
    /// Evaluate the field at `p`
    fn evaluate(&self, p: &Point3d) -> f64;
}

impl<F> ScalarField for F
where
    F: Fn(&Point3d) -> f64,
{
    fn evaluate(&self, p: &Point3d) -> f64 {
        self(p)
    }
}

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f;
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        let Some(first) = self.vertices.first() else {
            return (Point3f::origin(), Point3f::origin());
        };

        self.vertices
            .iter()
            .fold((*first, *first), |(min, max), v| (min.inf(v), max.sup(v)))
    }

    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}
