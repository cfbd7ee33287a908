//! Body-centred sampling lattice
//!
//! Each axis `[min, max]` with `N` subdivisions is padded to `N + 3` points: one margin
//! point below `min`, the `N + 1` grid points, and one margin point above `max`. The
//! lattice stacks, for every `k`, an even layer on that grid followed by an odd layer
//! shifted half a step along all three axes. Odd layers drop their last row and the
//! last slot of the remaining rows so that the two layers pack into a single flat array
//! where every one of the 14 neighbours of a node sits at a fixed signed offset.
//!
//! Positions are also described in half-step units: an even node `(nx, ny, nz)` sits at
//! `(2nx, 2ny, 2nz)`, an odd node at `(2nx + 1, 2ny + 1, 2nz + 1)`.

use tetrasurf_core::{Error, Point3d, Result};

/// One axis of the sampling region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpec {
    min: f64,
    max: f64,
    subdivisions: usize,
}

impl AxisSpec {
    /// Create an axis with `subdivisions` steps over `[min, max]`
    pub fn new(min: f64, max: f64, subdivisions: usize) -> Result<Self> {
        if subdivisions == 0 {
            return Err(Error::InvalidData(
                "Axis must have at least one subdivision".to_string(),
            ));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::InvalidData(format!(
                "Axis bounds must be finite, got [{}, {}]",
                min, max
            )));
        }
        if min >= max {
            return Err(Error::InvalidData(format!(
                "Axis minimum {} must be below maximum {}",
                min, max
            )));
        }

        Ok(Self {
            min,
            max,
            subdivisions,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    /// Distance between consecutive grid points
    pub fn step(&self) -> f64 {
        (self.max - self.min) / self.subdivisions as f64
    }

    /// Padded number of lattice points along this axis
    pub fn point_count(&self) -> usize {
        self.subdivisions + 3
    }

    /// Coordinate of lattice index `n`, shifted by half a step on odd layers.
    ///
    /// Index 1 maps to `min` and index `N + 1` to `max`.
    pub fn pos(&self, n: usize, shifted: bool) -> f64 {
        let half = if shifted { 0.5 } else { 0.0 };
        self.min + (half + n as f64 - 1.0) * self.step()
    }
}

/// Axis-aligned sampling region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingBox {
    pub x: AxisSpec,
    pub y: AxisSpec,
    pub z: AxisSpec,
}

impl SamplingBox {
    pub fn new(x: AxisSpec, y: AxisSpec, z: AxisSpec) -> Self {
        Self { x, y, z }
    }

    /// Same bounds and resolution on all three axes
    pub fn cube(min: f64, max: f64, subdivisions: usize) -> Result<Self> {
        let axis = AxisSpec::new(min, max, subdivisions)?;
        Ok(Self::new(axis, axis, axis))
    }

    pub fn axes(&self) -> [&AxisSpec; 3] {
        [&self.x, &self.y, &self.z]
    }

    /// Largest step over the three axes
    pub fn max_step(&self) -> f64 {
        self.axes()
            .iter()
            .map(|axis| axis.step())
            .fold(0.0, f64::max)
    }
}

/// Integer coordinates of a lattice slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCoord {
    pub n: [usize; 3],
    pub odd: bool,
}

impl NodeCoord {
    /// Position in half-step units
    pub fn half_steps(&self) -> [usize; 3] {
        let parity = usize::from(self.odd);
        self.n.map(|n| 2 * n + parity)
    }
}

/// Flattened interleaved lattice over a [`SamplingBox`]
#[derive(Debug, Clone)]
pub struct Lattice {
    bounds: SamplingBox,
    counts: [usize; 3],
    layer: usize,
    stride: usize,
    node_count: usize,
}

impl Lattice {
    /// Lay out the lattice for `bounds`
    pub fn new(bounds: &SamplingBox) -> Result<Self> {
        let counts = bounds.axes().map(|axis| axis.point_count());
        let [mx, my, mz] = counts;

        let too_large = || {
            Error::InvalidData(format!(
                "Lattice of {}x{}x{} points does not fit in memory",
                mx, my, mz
            ))
        };
        let layer = mx.checked_mul(my).ok_or_else(too_large)?;
        // Even layer plus an odd layer missing one row and one slot
        let stride = layer
            .checked_mul(2)
            .map(|two_layers| two_layers - mx - 1)
            .ok_or_else(too_large)?;
        let node_count = stride.checked_mul(mz).ok_or_else(too_large)?;

        Ok(Self {
            bounds: *bounds,
            counts,
            layer,
            stride,
            node_count,
        })
    }

    pub fn bounds(&self) -> &SamplingBox {
        &self.bounds
    }

    /// Padded point counts per axis
    pub fn counts(&self) -> [usize; 3] {
        self.counts
    }

    /// Slots in one even layer; also the linear offset from an even node to the odd
    /// node half a step above it
    pub fn layer_size(&self) -> usize {
        self.layer
    }

    /// Total number of slots, padding included
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Coordinates of slot `index`
    pub fn coord(&self, index: usize) -> NodeCoord {
        let mx = self.counts[0];
        let nz = index / self.stride;
        let mut rest = index % self.stride;
        let odd = rest >= self.layer;
        if odd {
            rest -= self.layer;
        }
        NodeCoord {
            n: [rest % mx, rest / mx, nz],
            odd,
        }
    }

    /// Linear index of `coord`
    pub fn index(&self, coord: &NodeCoord) -> usize {
        let [nx, ny, nz] = coord.n;
        let layer_start = nz * self.stride + if coord.odd { self.layer } else { 0 };
        layer_start + ny * self.counts[0] + nx
    }

    /// Whether the slot holds a real sample point.
    ///
    /// Odd layers pad the end of every row, and the final odd layer lies past the margin.
    pub fn is_sampled(&self, coord: &NodeCoord) -> bool {
        !coord.odd || (coord.n[0] + 1 < self.counts[0] && coord.n[2] + 1 < self.counts[2])
    }

    /// Whether the node lies within the sampling bounds on every axis.
    ///
    /// Only such nodes may be inside; all their neighbours are sampled slots.
    pub fn is_interior(&self, coord: &NodeCoord) -> bool {
        coord
            .half_steps()
            .iter()
            .zip(self.counts)
            .all(|(&h, m)| h >= 2 && h + 4 <= 2 * m)
    }

    /// World position of `coord`
    pub fn position(&self, coord: &NodeCoord) -> Point3d {
        let [x, y, z] = self.bounds.axes();
        Point3d::new(
            x.pos(coord.n[0], coord.odd),
            y.pos(coord.n[1], coord.odd),
            z.pos(coord.n[2], coord.odd),
        )
    }

    /// World position of slot `index`
    pub fn position_of(&self, index: usize) -> Point3d {
        self.position(&self.coord(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_lattice(n: usize) -> Lattice {
        Lattice::new(&SamplingBox::cube(-1.0, 1.0, n).unwrap()).unwrap()
    }

    #[test]
    fn test_axis_rejects_bad_input() {
        assert!(AxisSpec::new(-1.0, 1.0, 0).is_err());
        assert!(AxisSpec::new(1.0, 1.0, 4).is_err());
        assert!(AxisSpec::new(2.0, 1.0, 4).is_err());
        assert!(AxisSpec::new(f64::NAN, 1.0, 4).is_err());
        assert!(AxisSpec::new(0.0, f64::INFINITY, 4).is_err());
        assert!(AxisSpec::new(-1.0, 1.0, 1).is_ok());
    }

    #[test]
    fn test_axis_positions() {
        let axis = AxisSpec::new(-1.0, 1.0, 10).unwrap();
        assert_eq!(axis.point_count(), 13);
        assert_relative_eq!(axis.step(), 0.2);
        assert_relative_eq!(axis.pos(0, false), -1.2);
        assert_relative_eq!(axis.pos(1, false), -1.0);
        assert_relative_eq!(axis.pos(11, false), 1.0, epsilon = 1e-12);
        assert_relative_eq!(axis.pos(1, true), -0.9);
        for n in 0..axis.point_count() - 1 {
            assert_relative_eq!(axis.pos(n + 1, false) - axis.pos(n, false), axis.step(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_layout_sizes() {
        let lattice = unit_lattice(2);
        // 5 points per axis: even layer 25, odd layer 25 - 5 - 1
        assert_eq!(lattice.counts(), [5, 5, 5]);
        assert_eq!(lattice.layer_size(), 25);
        assert_eq!(lattice.node_count(), 5 * 44);
    }

    #[test]
    fn test_index_coord_roundtrip() {
        let bounds = SamplingBox::new(
            AxisSpec::new(0.0, 1.0, 3).unwrap(),
            AxisSpec::new(0.0, 2.0, 2).unwrap(),
            AxisSpec::new(-1.0, 0.0, 4).unwrap(),
        );
        let lattice = Lattice::new(&bounds).unwrap();
        for index in 0..lattice.node_count() {
            let coord = lattice.coord(index);
            assert_eq!(lattice.index(&coord), index);
            if coord.odd {
                assert!(coord.n[1] + 1 < lattice.counts()[1]);
            }
        }
    }

    #[test]
    fn test_interior_matches_bounds() {
        let lattice = unit_lattice(4);
        let eps = 1e-9;
        for index in 0..lattice.node_count() {
            let coord = lattice.coord(index);
            if !lattice.is_sampled(&coord) {
                assert!(!lattice.is_interior(&coord));
                continue;
            }
            let p = lattice.position(&coord);
            let within = [p.x, p.y, p.z]
                .iter()
                .all(|&c| (-1.0 - eps..=1.0 + eps).contains(&c));
            assert_eq!(lattice.is_interior(&coord), within, "slot {:?}", coord);
        }
    }
}
