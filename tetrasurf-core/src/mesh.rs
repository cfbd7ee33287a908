//! Mesh data structures and functionality

use crate::edges::EdgeRegistry;
use crate::point::*;

/// A triangle mesh with vertices and faces
///
/// Vertices are only ever appended, so an index handed out by [`TriangleMesh::add_vertex`]
/// stays valid for the lifetime of the mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
}

/// Edge statistics of a mesh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeReport {
    /// Number of distinct undirected edges
    pub edge_count: usize,
    /// Edges used by exactly one face
    pub boundary_edges: usize,
    /// Edges used by two faces that traverse it in the same direction
    pub inconsistent_edges: usize,
    /// Edges used by more than two faces
    pub non_manifold_edges: usize,
}

impl EdgeReport {
    /// Closed, consistently oriented two-manifold
    pub fn is_closed_manifold(&self) -> bool {
        self.boundary_edges == 0 && self.inconsistent_edges == 0 && self.non_manifold_edges == 0
    }
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    /// Add a face unless two of its corners share an index.
    ///
    /// Returns whether the face was kept.
    pub fn add_face_if_nondegenerate(&mut self, face: [usize; 3]) -> bool {
        if face[0] == face[1] || face[1] == face[2] || face[2] == face[0] {
            return false;
        }
        self.faces.push(face);
        true
    }

    /// Register every face edge
    pub fn edge_registry(&self) -> EdgeRegistry {
        EdgeRegistry::from_faces(&self.faces)
    }

    /// Summarize edge multiplicities and orientation consistency
    pub fn edge_report(&self) -> EdgeReport {
        let registry = self.edge_registry();
        let mut report = EdgeReport {
            edge_count: registry.len(),
            ..Default::default()
        };
        for (_, info) in registry.iter() {
            if info.count > 2 {
                report.non_manifold_edges += 1;
            } else if info.count == 1 {
                report.boundary_edges += 1;
            } else if info.orientation != 0 {
                report.inconsistent_edges += 1;
            }
        }
        report
    }

    /// `V - E + F`
    pub fn euler_characteristic(&self) -> i64 {
        let edges = self.edge_registry().len();
        self.vertices.len() as i64 - edges as i64 + self.faces.len() as i64
    }

    /// Total surface area
    pub fn area(&self) -> f64 {
        self.faces
            .iter()
            .map(|f| {
                let [a, b, c] = self.face_points(f);
                (b - a).cross(&(c - a)).norm() / 2.0
            })
            .sum()
    }

    /// Signed enclosed volume; positive when faces wind counter-clockwise seen from outside
    pub fn volume(&self) -> f64 {
        self.faces
            .iter()
            .map(|f| {
                let [a, b, c] = self.face_points(f);
                a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
            })
            .sum()
    }

    /// Average of the vertex positions
    pub fn mass_center(&self) -> Point3d {
        if self.vertices.is_empty() {
            return Point3d::origin();
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3d::zeros(), |acc, v| acc + to_sample_point(v).coords);
        Point3d::from(sum / self.vertices.len() as f64)
    }

    /// Largest distance from `center` to any vertex
    pub fn radius_from(&self, center: &Point3d) -> f64 {
        self.vertices
            .iter()
            .map(|v| (to_sample_point(v) - center).norm())
            .fold(0.0, f64::max)
    }

    fn face_points(&self, face: &[usize; 3]) -> [Point3d; 3] {
        [
            to_sample_point(&self.vertices[face[0]]),
            to_sample_point(&self.vertices[face[1]]),
            to_sample_point(&self.vertices[face[2]]),
        ]
    }
}
