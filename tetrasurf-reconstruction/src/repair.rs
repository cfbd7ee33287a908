//! Non-manifold edge detection between the two builds

use crate::vertices::SurfaceNodes;
use std::collections::BTreeSet;
use tetrasurf_core::{EdgeRegistry, TriangleMesh};

/// Nodes implicated in non-manifold edges of a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairPlan {
    /// Lattice indices of nodes that must not collapse in the next build
    pub rejected: BTreeSet<usize>,
    /// Edges used by more than two faces
    pub non_manifold_edges: usize,
}

impl RepairPlan {
    pub fn is_empty(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Collect the owners of both endpoints of every edge shared by more than two faces
pub fn plan_repair(mesh: &TriangleMesh, surface: &SurfaceNodes) -> RepairPlan {
    let edges = EdgeRegistry::from_faces(&mesh.faces).non_manifold_edges();
    if edges.is_empty() {
        return RepairPlan::default();
    }

    let owners = surface.vertex_owners();
    let rejected = edges
        .iter()
        .flat_map(|&(a, b)| [owners[a], owners[b]])
        .collect();

    RepairPlan {
        rejected,
        non_manifold_edges: edges.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{Lattice, SamplingBox};
    use crate::neighbors::NeighborTable;
    use crate::sampler::sample_field;
    use crate::vertices::build_vertices;
    use tetrasurf_core::Point3d;

    #[test]
    fn test_manifold_mesh_needs_no_repair() {
        let lattice = Lattice::new(&SamplingBox::cube(-1.0, 1.0, 6).unwrap()).unwrap();
        let table = NeighborTable::new(&lattice);
        let sampled = sample_field(&lattice, &|p: &Point3d| 0.5 - p.coords.norm(), 0.0);
        let mut mesh = TriangleMesh::new();
        let surface = build_vertices(&lattice, &table, &sampled, &BTreeSet::new(), false, &mut mesh);
        crate::triangulate::triangulate(&table, &surface, &mut mesh);

        let plan = plan_repair(&mesh, &surface);
        assert!(plan.is_empty());
        assert_eq!(plan.non_manifold_edges, 0);
    }

    #[test]
    fn test_fan_edge_rejects_both_owners() {
        let lattice = Lattice::new(&SamplingBox::cube(-1.0, 1.0, 4).unwrap()).unwrap();
        let table = NeighborTable::new(&lattice);
        let sampled = sample_field(&lattice, &|p: &Point3d| 0.1 - p.coords.norm(), 0.0);
        let mut mesh = TriangleMesh::new();
        let surface = build_vertices(&lattice, &table, &sampled, &BTreeSet::new(), false, &mut mesh);
        let centre = surface.nodes()[0].index;

        // Three faces on the edge (0, 1), all owned by the single surface node
        mesh.faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let plan = plan_repair(&mesh, &surface);
        assert_eq!(plan.non_manifold_edges, 1);
        assert_eq!(plan.rejected.into_iter().collect::<Vec<_>>(), vec![centre]);
    }
}
