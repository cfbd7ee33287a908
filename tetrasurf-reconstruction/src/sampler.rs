//! Field sampling over the lattice

use crate::lattice::Lattice;
use tetrasurf_core::ScalarField;
use tracing::debug;

/// Thresholded field values at every lattice slot
#[derive(Debug, Clone)]
pub struct SampledField {
    values: Vec<f64>,
    inside: Vec<bool>,
    inside_nodes: Vec<usize>,
    sampled: usize,
}

impl SampledField {
    /// Field value minus threshold; NaN for padding slots
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    pub fn is_inside(&self, index: usize) -> bool {
        self.inside[index]
    }

    /// Inside nodes in ascending lattice order
    pub fn inside_nodes(&self) -> &[usize] {
        &self.inside_nodes
    }

    /// Number of field evaluations performed
    pub fn sampled_count(&self) -> usize {
        self.sampled
    }
}

/// Evaluate `field` once per sampled slot and classify nodes against `threshold`.
///
/// A node is inside when its shifted value is finite and positive and it lies within the
/// sampling bounds; margin nodes are sampled but never inside.
pub fn sample_field<F>(lattice: &Lattice, field: &F, threshold: f64) -> SampledField
where
    F: ScalarField + ?Sized,
{
    let count = lattice.node_count();
    let mut values = vec![f64::NAN; count];
    let mut inside = vec![false; count];
    let mut inside_nodes = Vec::new();
    let mut sampled = 0;

    for index in 0..count {
        let coord = lattice.coord(index);
        if !lattice.is_sampled(&coord) {
            continue;
        }

        let value = field.evaluate(&lattice.position(&coord)) - threshold;
        values[index] = value;
        sampled += 1;

        if value.is_finite() && value > 0.0 && lattice.is_interior(&coord) {
            inside[index] = true;
            inside_nodes.push(index);
        }
    }

    debug!(
        sampled = sampled,
        inside = inside_nodes.len(),
        "Sampled field"
    );

    SampledField {
        values,
        inside,
        inside_nodes,
        sampled,
    }
}
