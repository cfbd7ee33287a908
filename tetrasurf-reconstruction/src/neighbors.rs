//! Neighbour table of the interleaved lattice
//!
//! Every node has 14 neighbours: the six axis neighbours one full step away and the eight
//! body-diagonal neighbours half a step away on the other sub-lattice. Neighbours come in
//! opposite pairs `(2i, 2i + 1)`; the even member of each pair has a negative linear
//! offset. The 24 tetrahedra spanned by a node and three mutually linked neighbours tile
//! the space around that node.
//!
//! Everything except the linear offsets is independent of the lattice size and is built
//! once per process in [`Topology::get`].

use crate::lattice::Lattice;
use itertools::iproduct;
use std::collections::VecDeque;
use std::sync::OnceLock;

/// Number of neighbours of a lattice node
pub const NEIGHBOR_COUNT: usize = 14;

/// Number of tetrahedra incident to a lattice node
pub const TETRAHEDRON_COUNT: usize = 24;

/// Bit `i` set iff neighbour `i` is not inside
pub type Signature = u16;

/// Neighbour displacements in half-step units
pub const DIRECTIONS: [[i32; 3]; NEIGHBOR_COUNT] = [
    [0, 0, -2],
    [0, 0, 2],
    [-1, -1, -1],
    [1, 1, 1],
    [1, -1, -1],
    [-1, 1, 1],
    [-1, 1, -1],
    [1, -1, 1],
    [1, 1, -1],
    [-1, -1, 1],
    [0, -2, 0],
    [0, 2, 0],
    [-2, 0, 0],
    [2, 0, 0],
];

// Each seed (a, b, c) also yields the opposite tetrahedron (a^1, c^1, b^1)
const TETRAHEDRON_SEEDS: [[usize; 3]; TETRAHEDRON_COUNT / 2] = [
    [0, 2, 6],
    [0, 6, 8],
    [0, 8, 4],
    [0, 4, 2],
    [10, 2, 4],
    [10, 4, 7],
    [10, 7, 9],
    [10, 9, 2],
    [12, 2, 9],
    [12, 9, 5],
    [12, 5, 6],
    [12, 6, 2],
];

const SIGNATURE_COUNT: usize = 1 << NEIGHBOR_COUNT;

/// Size-independent neighbourhood structure
#[derive(Debug)]
pub struct Topology {
    adjacency: [[Option<u8>; NEIGHBOR_COUNT]; NEIGHBOR_COUNT],
    tetrahedra: [[usize; 3]; TETRAHEDRON_COUNT],
    corners: [Signature; 8],
    collapsible: Box<[bool]>,
}

static TOPOLOGY: OnceLock<Topology> = OnceLock::new();

impl Topology {
    /// Shared instance, built on first use
    pub fn get() -> &'static Topology {
        TOPOLOGY.get_or_init(Topology::build)
    }

    fn build() -> Self {
        let mut adjacency = [[None; NEIGHBOR_COUNT]; NEIGHBOR_COUNT];
        for (a, b) in iproduct!(0..NEIGHBOR_COUNT, 0..NEIGHBOR_COUNT) {
            let diff: [i32; 3] = std::array::from_fn(|i| DIRECTIONS[b][i] - DIRECTIONS[a][i]);
            adjacency[a][b] = DIRECTIONS
                .iter()
                .position(|d| *d == diff)
                .map(|n| n as u8);
        }

        let mut tetrahedra = [[0; 3]; TETRAHEDRON_COUNT];
        for (i, &[a, b, c]) in TETRAHEDRON_SEEDS.iter().enumerate() {
            tetrahedra[2 * i] = [a, b, c];
            tetrahedra[2 * i + 1] = [a ^ 1, c ^ 1, b ^ 1];
        }

        let corners = octant_masks();

        let mut topology = Self {
            adjacency,
            tetrahedra,
            corners,
            collapsible: Box::default(),
        };
        topology.collapsible = (0..SIGNATURE_COUNT)
            .map(|sig| topology.compute_collapsible(sig as Signature))
            .collect();
        topology
    }

    /// Direction from neighbour `a` to neighbour `b`, as seen from `a`
    pub fn adjacency(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency[a][b].map(usize::from)
    }

    /// Like [`Topology::adjacency`], for pairs known to share a tetrahedron edge
    pub fn link(&self, a: usize, b: usize) -> usize {
        self.adjacency(a, b)
            .unwrap_or_else(|| panic!("neighbours {} and {} are not linked", a, b))
    }

    /// The 24 tetrahedra around a node, each wound so its outward face is counter-clockwise
    pub fn tetrahedra(&self) -> &[[usize; 3]; TETRAHEDRON_COUNT] {
        &self.tetrahedra
    }

    /// Neighbour masks of the eight cube corners
    pub fn corners(&self) -> &[Signature; 8] {
        &self.corners
    }

    /// Whether the crossings of a node with signature `sig` may merge into one vertex
    pub fn is_collapsible(&self, sig: Signature) -> bool {
        self.collapsible[usize::from(sig)]
    }

    fn compute_collapsible(&self, sig: Signature) -> bool {
        let outside = sig.count_ones() as usize;
        if !(2..=NEIGHBOR_COUNT - 2).contains(&outside) {
            return false;
        }
        if !self.corners.iter().any(|&corner| corner & sig == 0) {
            return false;
        }
        self.component_count(sig) == 2
    }

    /// Connected components of the neighbour link graph after cutting every link that
    /// crosses between inside and outside slots
    pub fn component_count(&self, sig: Signature) -> usize {
        let side = |n: usize| sig & (1 << n) != 0;
        let mut visited = [false; NEIGHBOR_COUNT];
        let mut queue = VecDeque::with_capacity(NEIGHBOR_COUNT);
        let mut components = 0;

        for start in 0..NEIGHBOR_COUNT {
            if visited[start] {
                continue;
            }
            components += 1;
            visited[start] = true;
            queue.push_back(start);
            while let Some(a) = queue.pop_front() {
                for b in 0..NEIGHBOR_COUNT {
                    if !visited[b] && self.adjacency[a][b].is_some() && side(a) == side(b) {
                        visited[b] = true;
                        queue.push_back(b);
                    }
                }
            }
        }
        components
    }
}

/// For each octant, the body diagonal pointing into it plus the three axis neighbours
/// bounding it
fn octant_masks() -> [Signature; 8] {
    std::array::from_fn(|octant| {
        let signs = [octant & 1, octant & 2, octant & 4].map(|bit| if bit == 0 { -1 } else { 1 });
        DIRECTIONS
            .iter()
            .enumerate()
            .filter(|(_, d)| d.iter().zip(signs).all(|(&c, s)| c == 0 || c.signum() == s))
            .fold(0, |mask, (n, _)| mask | (1 << n))
    })
}

/// Linear neighbour offsets for a concrete lattice, plus the shared [`Topology`]
#[derive(Debug, Clone)]
pub struct NeighborTable {
    offsets: [isize; NEIGHBOR_COUNT],
    topology: &'static Topology,
}

impl NeighborTable {
    pub fn new(lattice: &Lattice) -> Self {
        let dx = 1isize;
        let dy = lattice.counts()[0] as isize;
        let dz = lattice.layer_size() as isize;
        let base = [
            -2 * dz + dy + dx,
            -dz,
            dx - dz,
            dy - dz,
            dx + dy - dz,
            -dy,
            -dx,
        ];

        let mut offsets = [0; NEIGHBOR_COUNT];
        for (i, d) in base.into_iter().enumerate() {
            offsets[2 * i] = d;
            offsets[2 * i + 1] = -d;
        }

        Self {
            offsets,
            topology: Topology::get(),
        }
    }

    pub fn offset(&self, n: usize) -> isize {
        self.offsets[n]
    }

    /// Linear index of neighbour `n` of the node at `index`
    pub fn neighbor(&self, index: usize, n: usize) -> usize {
        index.wrapping_add_signed(self.offsets[n])
    }

    pub fn topology(&self) -> &'static Topology {
        self.topology
    }
}
