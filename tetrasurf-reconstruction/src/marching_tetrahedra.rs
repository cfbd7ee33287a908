//! Marching tetrahedra isosurface extraction
//!
//! Samples a [`ScalarField`] on a body-centred lattice and emits the surface separating
//! nodes above the threshold from the rest. With regularization on, surface nodes whose
//! neighbourhood splits cleanly into one inside and one outside region contribute a
//! single averaged vertex instead of one vertex per crossing. Collapsing can pinch the
//! surface; a second build keeps every node touching a non-manifold edge uncollapsed.

use crate::lattice::{Lattice, SamplingBox};
use crate::neighbors::NeighborTable;
use crate::repair::{plan_repair, RepairPlan};
use crate::sampler::{sample_field, SampledField};
use crate::triangulate::triangulate;
use crate::vertices::{build_vertices, SurfaceNodes};
use std::collections::BTreeSet;
use tetrasurf_core::{Error, Result, ScalarField, TriangleMesh};
use tracing::{debug, info, warn};

/// Configuration for marching tetrahedra extraction
#[derive(Debug, Clone, PartialEq)]
pub struct MarchingTetrahedraConfig {
    /// Field level of the extracted surface
    pub threshold: f64,
    /// Merge the crossings of topologically simple nodes
    pub regularize: bool,
}

impl Default for MarchingTetrahedraConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            regularize: true,
        }
    }
}

impl MarchingTetrahedraConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_regularization(mut self, regularize: bool) -> Self {
        self.regularize = regularize;
        self
    }
}

/// Counters describing one extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Field evaluations
    pub sampled_nodes: usize,
    pub inside_nodes: usize,
    /// Inside nodes with at least one outside neighbour
    pub surface_nodes: usize,
    pub collapsed_nodes: usize,
    /// Nodes kept uncollapsed in the second build
    pub rejected_nodes: usize,
    /// Edges used by more than two faces in the returned mesh
    pub non_manifold_edges: usize,
    /// Whether the second build ran
    pub rebuilt: bool,
}

/// Marching tetrahedra implementation
#[derive(Debug, Clone, Default)]
pub struct MarchingTetrahedra {
    config: MarchingTetrahedraConfig,
}

impl MarchingTetrahedra {
    /// Create a new extractor
    pub fn new(config: MarchingTetrahedraConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MarchingTetrahedraConfig {
        &self.config
    }

    /// Extract the isosurface of `field` within `bounds`
    pub fn extract<F>(&self, bounds: &SamplingBox, field: &F) -> Result<TriangleMesh>
    where
        F: ScalarField + ?Sized,
    {
        self.extract_with_stats(bounds, field).map(|(mesh, _)| mesh)
    }

    /// Extract the isosurface and report what each phase did
    pub fn extract_with_stats<F>(
        &self,
        bounds: &SamplingBox,
        field: &F,
    ) -> Result<(TriangleMesh, ExtractionStats)>
    where
        F: ScalarField + ?Sized,
    {
        if !self.config.threshold.is_finite() {
            return Err(Error::InvalidData(format!(
                "Threshold must be finite, got {}",
                self.config.threshold
            )));
        }

        let lattice = Lattice::new(bounds)?;
        let table = NeighborTable::new(&lattice);
        let sampled = sample_field(&lattice, field, self.config.threshold);

        let mut stats = ExtractionStats {
            sampled_nodes: sampled.sampled_count(),
            inside_nodes: sampled.inside_nodes().len(),
            ..Default::default()
        };

        let (mut mesh, mut surface) = self.build(&lattice, &table, &sampled, &BTreeSet::new());
        let mut plan = plan_repair(&mesh, &surface);

        // Without collapsing, the second build would reproduce the first
        if self.config.regularize && !plan.is_empty() {
            debug!(
                non_manifold_edges = plan.non_manifold_edges,
                rejected = plan.rejected.len(),
                "Rebuilding without collapsing rejected nodes"
            );
            stats.rejected_nodes = plan.rejected.len();
            stats.rebuilt = true;
            (mesh, surface) = self.build(&lattice, &table, &sampled, &plan.rejected);
            plan = plan_repair(&mesh, &surface);
        }

        stats.surface_nodes = surface.len();
        stats.collapsed_nodes = surface.collapsed_count();
        stats.non_manifold_edges = plan.non_manifold_edges;
        report(&stats, &plan, &mesh);

        Ok((mesh, stats))
    }

    fn build(
        &self,
        lattice: &Lattice,
        table: &NeighborTable,
        sampled: &SampledField,
        rejected: &BTreeSet<usize>,
    ) -> (TriangleMesh, SurfaceNodes) {
        let mut mesh = TriangleMesh::new();
        let surface = build_vertices(
            lattice,
            table,
            sampled,
            rejected,
            self.config.regularize,
            &mut mesh,
        );
        triangulate(table, &surface, &mut mesh);
        (mesh, surface)
    }
}

fn report(stats: &ExtractionStats, plan: &RepairPlan, mesh: &TriangleMesh) {
    if plan.non_manifold_edges > 0 {
        warn!(
            non_manifold_edges = plan.non_manifold_edges,
            "Extracted surface still has non-manifold edges"
        );
    }

    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        surface_nodes = stats.surface_nodes,
        collapsed = stats.collapsed_nodes,
        rebuilt = stats.rebuilt,
        "Extracted isosurface"
    );
}

/// Convenience function for regularized extraction at `threshold`
pub fn marching_tetrahedra<F>(bounds: &SamplingBox, field: &F, threshold: f64) -> Result<TriangleMesh>
where
    F: ScalarField + ?Sized,
{
    let config = MarchingTetrahedraConfig::default().with_threshold(threshold);
    MarchingTetrahedra::new(config).extract(bounds, field)
}
