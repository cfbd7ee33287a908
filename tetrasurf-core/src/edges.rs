//! Edge multiplicity bookkeeping for triangle meshes
//!
//! Every undirected edge is keyed by its ordered vertex pair. Registering a directed
//! edge bumps its occurrence count and adds `+1` to the orientation sum when it was
//! given as `(lo, hi)`, `-1` when given as `(hi, lo)`. On a closed, consistently wound
//! manifold every edge ends up with `count == 2` and `orientation == 0`.

use std::collections::HashMap;

/// Occurrence data for a single undirected edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeInfo {
    /// Number of faces using this edge
    pub count: usize,
    /// Signed sum of the directions the edge was registered with
    pub orientation: i64,
}

/// Multiset over unordered vertex-index pairs
#[derive(Debug, Clone, Default)]
pub struct EdgeRegistry {
    edges: HashMap<(usize, usize), EdgeInfo>,
}

#[inline]
fn normalize_edge(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl EdgeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the three edges of every face
    pub fn from_faces(faces: &[[usize; 3]]) -> Self {
        let mut registry = Self {
            edges: HashMap::with_capacity(faces.len() * 3 / 2),
        };
        for face in faces {
            registry.register(face[0], face[1]);
            registry.register(face[1], face[2]);
            registry.register(face[2], face[0]);
        }
        registry
    }

    /// Register the directed edge `a -> b`
    pub fn register(&mut self, a: usize, b: usize) {
        let info = self.edges.entry(normalize_edge(a, b)).or_default();
        info.count += 1;
        info.orientation += if a <= b { 1 } else { -1 };
    }

    /// Number of distinct undirected edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Occurrence data for the edge between `a` and `b`, in either direction
    pub fn get(&self, a: usize, b: usize) -> Option<EdgeInfo> {
        self.edges.get(&normalize_edge(a, b)).copied()
    }

    /// Iterate over all edges as `((lo, hi), info)`
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), EdgeInfo)> + '_ {
        self.edges.iter().map(|(&edge, &info)| (edge, info))
    }

    /// Edges shared by more than two faces, sorted for reproducible output
    pub fn non_manifold_edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<_> = self
            .edges
            .iter()
            .filter(|(_, info)| info.count > 2)
            .map(|(&edge, _)| edge)
            .collect();
        edges.sort_unstable();
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_triangle() {
        let registry = EdgeRegistry::from_faces(&[[0, 1, 2]]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(1, 0), Some(EdgeInfo { count: 1, orientation: 1 }));
        assert_eq!(registry.get(2, 0), Some(EdgeInfo { count: 1, orientation: -1 }));
        assert!(registry.get(0, 3).is_none());
        assert!(registry.non_manifold_edges().is_empty());
    }

    #[test]
    fn test_shared_edge_cancels_orientation() {
        // Two triangles wound consistently around the shared edge (1, 2)
        let registry = EdgeRegistry::from_faces(&[[0, 1, 2], [2, 1, 3]]);
        let shared = registry.get(1, 2).unwrap();
        assert_eq!(shared.count, 2);
        assert_eq!(shared.orientation, 0);
    }

    #[test]
    fn test_fan_of_three_is_non_manifold() {
        let registry = EdgeRegistry::from_faces(&[[0, 1, 2], [1, 0, 3], [0, 1, 4]]);
        assert_eq!(registry.non_manifold_edges(), vec![(0, 1)]);
        assert_eq!(registry.get(0, 1).unwrap().count, 3);
    }
}
