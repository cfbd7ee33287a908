//! Triangle emission over the tetrahedra around each surface node
//!
//! A tetrahedron with one inside corner is cut by a single triangle. Tetrahedra with two
//! or three inside corners are shared between several surface nodes; only the inside
//! corner reached through non-negative offsets from every other inside corner emits them.

use crate::neighbors::NeighborTable;
use crate::vertices::{SurfaceNode, SurfaceNodes};
use tetrasurf_core::TriangleMesh;
use tracing::debug;

fn surface_node(surface: &SurfaceNodes, index: usize) -> &SurfaceNode {
    surface
        .find(index)
        .unwrap_or_else(|| panic!("inside node {} has no crossing vertices", index))
}

/// Append the triangles of every surface node to `mesh`
pub fn triangulate(table: &NeighborTable, surface: &SurfaceNodes, mesh: &mut TriangleMesh) {
    let topology = table.topology();
    let first_face = mesh.face_count();
    let mut dropped = 0usize;
    let mut emit = |mesh: &mut TriangleMesh, face: [usize; 3]| {
        if !mesh.add_face_if_nondegenerate(face) {
            dropped += 1;
        }
    };

    for node in surface.nodes() {
        for &tetrahedron in topology.tetrahedra() {
            let [mut n1, mut n2, mut n3] = tetrahedron;
            let inside = |n: usize| !node.is_outside(n);
            let inside_count = tetrahedron.iter().filter(|&&n| inside(n)).count();

            match inside_count {
                3 => continue,
                0 => {
                    emit(mesh, [node.vertex(n1), node.vertex(n2), node.vertex(n3)]);
                    continue;
                }
                _ => {}
            }

            // Rotate the inside corners to the front, preserving winding
            for _ in 0..3 {
                if inside(n1) && !inside(n3) {
                    break;
                }
                (n1, n2, n3) = (n2, n3, n1);
            }

            if table.offset(n1) < 0 {
                continue;
            }
            let node1 = surface_node(surface, table.neighbor(node.index, n1));

            if inside_count == 1 {
                let p02 = node.vertex(n2);
                let p03 = node.vertex(n3);
                let p12 = node1.vertex(topology.link(n1, n2));
                let p13 = node1.vertex(topology.link(n1, n3));

                // Split the quad along its shorter diagonal
                let length = |a: usize, b: usize| (mesh.vertices[a] - mesh.vertices[b]).norm_squared();
                if length(p02, p13) > length(p12, p03) {
                    emit(mesh, [p03, p13, p12]);
                    emit(mesh, [p03, p12, p02]);
                } else {
                    emit(mesh, [p13, p12, p02]);
                    emit(mesh, [p13, p02, p03]);
                }
            } else {
                if table.offset(n2) < 0 {
                    continue;
                }
                let node2 = surface_node(surface, table.neighbor(node.index, n2));
                emit(
                    mesh,
                    [
                        node.vertex(n3),
                        node1.vertex(topology.link(n1, n3)),
                        node2.vertex(topology.link(n2, n3)),
                    ],
                );
            }
        }
    }

    debug!(
        faces = mesh.face_count() - first_face,
        degenerate = dropped,
        "Triangulated surface nodes"
    );
}
