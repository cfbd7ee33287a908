//! Surface node classification and crossing vertices

use crate::lattice::Lattice;
use crate::neighbors::{NeighborTable, Signature, NEIGHBOR_COUNT};
use crate::sampler::SampledField;
use std::collections::BTreeSet;
use tetrasurf_core::{to_mesh_point, Point3d, TriangleMesh, Vector3d};
use tracing::debug;

/// An inside node with at least one outside neighbour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceNode {
    /// Lattice index
    pub index: usize,
    pub signature: Signature,
    /// All crossings merged into `first_vertex`
    pub collapsed: bool,
    /// Mesh index of the node's first vertex
    pub first_vertex: usize,
}

impl SurfaceNode {
    /// Vertex on the edge towards neighbour `n`, which must be outside
    pub fn vertex(&self, n: usize) -> usize {
        if self.collapsed {
            self.first_vertex
        } else {
            let below = self.signature & ((1 << n) - 1);
            self.first_vertex + below.count_ones() as usize
        }
    }

    /// Number of mesh vertices owned by this node
    pub fn vertex_count(&self) -> usize {
        if self.collapsed {
            1
        } else {
            self.signature.count_ones() as usize
        }
    }

    pub fn is_outside(&self, n: usize) -> bool {
        self.signature & (1 << n) != 0
    }
}

/// Surface nodes of one build, sorted by lattice index
#[derive(Debug, Clone, Default)]
pub struct SurfaceNodes {
    nodes: Vec<SurfaceNode>,
    collapsed: usize,
}

impl SurfaceNodes {
    pub fn nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn collapsed_count(&self) -> usize {
        self.collapsed
    }

    /// Surface node at lattice `index`, if any
    pub fn find(&self, index: usize) -> Option<&SurfaceNode> {
        self.nodes
            .binary_search_by_key(&index, |node| node.index)
            .ok()
            .map(|i| &self.nodes[i])
    }

    /// Lattice index of the node owning each mesh vertex
    pub fn vertex_owners(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .flat_map(|node| std::iter::repeat(node.index).take(node.vertex_count()))
            .collect()
    }
}

/// Point where the field crosses zero between `from` (inside) and `to`.
///
/// Falls back to `to` when its value is not strictly negative.
fn crossing(from: &Point3d, value: f64, to: &Point3d, to_value: f64) -> Point3d {
    let t = if to_value < 0.0 {
        value / (value - to_value)
    } else {
        1.0
    };
    from + (to - from) * t
}

/// Classify every inside node and append its crossing vertices to `mesh`.
///
/// Nodes in `rejected` keep one vertex per crossing even when their signature could be
/// collapsed; with `regularize` off no node collapses.
pub fn build_vertices(
    lattice: &Lattice,
    table: &NeighborTable,
    sampled: &SampledField,
    rejected: &BTreeSet<usize>,
    regularize: bool,
    mesh: &mut TriangleMesh,
) -> SurfaceNodes {
    let topology = table.topology();
    let mut surface = SurfaceNodes::default();
    let mut crossings: Vec<Point3d> = Vec::with_capacity(NEIGHBOR_COUNT);

    for &index in sampled.inside_nodes() {
        let position = lattice.position_of(index);
        let value = sampled.value(index);
        let mut signature: Signature = 0;
        crossings.clear();

        for n in 0..NEIGHBOR_COUNT {
            let neighbor = table.neighbor(index, n);
            if sampled.is_inside(neighbor) {
                continue;
            }
            signature |= 1 << n;
            crossings.push(crossing(
                &position,
                value,
                &lattice.position_of(neighbor),
                sampled.value(neighbor),
            ));
        }

        if signature == 0 {
            continue;
        }

        let collapsed =
            regularize && !rejected.contains(&index) && topology.is_collapsible(signature);
        let first_vertex = mesh.vertex_count();
        if collapsed {
            let sum = crossings
                .iter()
                .fold(Vector3d::zeros(), |acc, p| acc + p.coords);
            let centroid = Point3d::from(sum / crossings.len() as f64);
            mesh.add_vertex(to_mesh_point(&centroid));
            surface.collapsed += 1;
        } else {
            for p in &crossings {
                mesh.add_vertex(to_mesh_point(p));
            }
        }

        surface.nodes.push(SurfaceNode {
            index,
            signature,
            collapsed,
            first_vertex,
        });
    }

    debug!(
        surface_nodes = surface.len(),
        collapsed = surface.collapsed,
        vertices = mesh.vertex_count(),
        "Built crossing vertices"
    );

    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::SamplingBox;
    use crate::sampler::sample_field;
    use approx::assert_relative_eq;
    use tetrasurf_core::to_sample_point;

    fn sphere(p: &Point3d) -> f64 {
        0.6 - p.coords.norm()
    }

    #[test]
    fn test_vertex_lookup() {
        let node = SurfaceNode {
            index: 0,
            signature: 0b10_0000_0101_0010,
            collapsed: false,
            first_vertex: 10,
        };
        assert_eq!(node.vertex_count(), 4);
        assert_eq!(node.vertex(1), 10);
        assert_eq!(node.vertex(4), 11);
        assert_eq!(node.vertex(6), 12);
        assert_eq!(node.vertex(13), 13);

        let collapsed = SurfaceNode {
            collapsed: true,
            ..node
        };
        assert_eq!(collapsed.vertex_count(), 1);
        assert_eq!(collapsed.vertex(13), 10);
    }

    #[test]
    fn test_crossing_interpolation() {
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(1.0, 0.0, 0.0);
        assert_relative_eq!(crossing(&a, 1.0, &b, -3.0).x, 0.25);
        assert_eq!(crossing(&a, 1.0, &b, 0.0), b);
        assert_eq!(crossing(&a, 1.0, &b, f64::NAN), b);
    }

    #[test]
    fn test_crossings_lie_on_sphere() {
        let lattice = Lattice::new(&SamplingBox::cube(-1.0, 1.0, 12).unwrap()).unwrap();
        let table = NeighborTable::new(&lattice);
        let sampled = sample_field(&lattice, &sphere, 0.0);
        let mut mesh = TriangleMesh::new();
        let surface = build_vertices(&lattice, &table, &sampled, &BTreeSet::new(), false, &mut mesh);

        assert!(!surface.is_empty());
        assert_eq!(surface.collapsed_count(), 0);
        // Linear interpolation of a cone-shaped field along a chord stays within a step
        for v in &mesh.vertices {
            let r = to_sample_point(v).coords.norm();
            assert!((r - 0.6).abs() < lattice.bounds().max_step(), "radius {}", r);
        }

        let owners = surface.vertex_owners();
        assert_eq!(owners.len(), mesh.vertex_count());
        for node in surface.nodes() {
            assert_eq!(surface.find(node.index), Some(node));
            assert_eq!(owners[node.first_vertex], node.index);
        }
    }

    #[test]
    fn test_rejected_nodes_do_not_collapse() {
        let lattice = Lattice::new(&SamplingBox::cube(-1.0, 1.0, 12).unwrap()).unwrap();
        let table = NeighborTable::new(&lattice);
        let sampled = sample_field(&lattice, &sphere, 0.0);

        let mut regular = TriangleMesh::new();
        let surface = build_vertices(&lattice, &table, &sampled, &BTreeSet::new(), true, &mut regular);
        assert!(surface.collapsed_count() > 0);

        let rejected: BTreeSet<usize> = surface
            .nodes()
            .iter()
            .filter(|node| node.collapsed)
            .map(|node| node.index)
            .collect();
        let mut repaired = TriangleMesh::new();
        let rebuilt = build_vertices(&lattice, &table, &sampled, &rejected, true, &mut repaired);
        assert_eq!(rebuilt.collapsed_count(), 0);
        assert!(repaired.vertex_count() > regular.vertex_count());
    }
}
