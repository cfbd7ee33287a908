//! Analytic density fields
//!
//! All fields are positive inside the shape they describe and zero on its boundary, so
//! they extract with threshold `0`. [`RadialDensity`] is the exception: it peaks at `1` in
//! the origin and is usually cut at `0.5`.

use tetrasurf_core::{Point3d, ScalarField, Vector3d};

const METABALL_EPSILON: f64 = 1e-8;

/// Solid sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3d,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point3d, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl ScalarField for Sphere {
    fn evaluate(&self, p: &Point3d) -> f64 {
        self.radius - (p - self.center).norm()
    }
}

/// Axis-aligned ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub center: Point3d,
    pub radii: Vector3d,
}

impl Ellipsoid {
    pub fn new(center: Point3d, radii: Vector3d) -> Self {
        Self { center, radii }
    }
}

impl ScalarField for Ellipsoid {
    fn evaluate(&self, p: &Point3d) -> f64 {
        1.0 - (p - self.center).component_div(&self.radii).norm()
    }
}

/// Torus around the z axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    /// Distance from the axis to the tube centre
    pub major_radius: f64,
    /// Tube radius
    pub minor_radius: f64,
}

impl Torus {
    pub fn new(major_radius: f64, minor_radius: f64) -> Self {
        Self {
            major_radius,
            minor_radius,
        }
    }
}

impl ScalarField for Torus {
    fn evaluate(&self, p: &Point3d) -> f64 {
        let ring = p.x.hypot(p.y) - self.major_radius;
        self.minor_radius - ring.hypot(p.z)
    }
}

/// A single metaball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetaBall {
    pub center: Point3d,
    pub radius: f64,
}

impl MetaBall {
    pub const fn new(center: Point3d, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Falls off with the squared distance; `1` at `radius`
    pub fn influence(&self, p: &Point3d) -> f64 {
        let dist_sq = (p - self.center).norm_squared() + METABALL_EPSILON;
        self.radius * self.radius / dist_sq
    }
}

/// Blended metaballs, inside where the summed influence exceeds `1`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metaballs {
    pub balls: Vec<MetaBall>,
}

impl Metaballs {
    pub fn new(balls: Vec<MetaBall>) -> Self {
        Self { balls }
    }
}

impl ScalarField for Metaballs {
    fn evaluate(&self, p: &Point3d) -> f64 {
        self.balls.iter().map(|ball| ball.influence(p)).sum::<f64>() - 1.0
    }
}

/// `1 - |p|²`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RadialDensity;

impl ScalarField for RadialDensity {
    fn evaluate(&self, p: &Point3d) -> f64 {
        1.0 - p.coords.norm_squared()
    }
}
