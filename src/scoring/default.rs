// Default overlap scoring policy.
//
// The composite score is a weighted blend of three [0, 1] signals:
//
//   score = jaccard_weight * jaccard
//         + magnitude_weight * (shared / (shared + magnitude_saturation))
//         + concentration_weight * cluster_concentration
//
// The magnitude term saturates: 8 shared suspects with the default
// saturation of 25 contributes ~0.24 of its weight, 100 contributes 0.8.
// This keeps a pair of huge accounts with incidental overlap from
// outranking a pair of small accounts whose audiences are near-identical.

use crate::db::models::ClusterCount;

use super::{OverlapScoring, ScoreInputs};

/// Configurable weights for the default overlap score.
///
/// The three weights sum to 1.0 by default, which bounds the composite in
/// [0, 1] without clamping. Custom weights that sum above 1.0 are clamped.
pub struct ScoreWeights {
    /// Weight of the Jaccard similarity term (default 0.5)
    pub jaccard_weight: f64,
    /// Weight of the saturating raw-magnitude term (default 0.3)
    pub magnitude_weight: f64,
    /// Weight of the cluster-concentration term (default 0.2)
    pub concentration_weight: f64,
    /// Shared-suspect count at which the magnitude term reaches 0.5
    /// (default 25.0)
    pub magnitude_saturation: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            jaccard_weight: 0.5,
            magnitude_weight: 0.3,
            concentration_weight: 0.2,
            magnitude_saturation: 25.0,
        }
    }
}

/// The stock scoring policy used unless a caller injects another one.
#[derive(Default)]
pub struct DefaultScoring {
    pub weights: ScoreWeights,
}

impl OverlapScoring for DefaultScoring {
    fn jaccard(&self, shared: u32, total_a: u32, total_b: u32) -> f64 {
        let union = total_a as f64 + total_b as f64 - shared as f64;
        if union <= 0.0 {
            return 0.0;
        }
        shared as f64 / union
    }

    fn cluster_concentration(&self, top_clusters: &[ClusterCount], shared: u32) -> f64 {
        if shared == 0 || top_clusters.is_empty() {
            return 0.0;
        }
        let clustered: u32 = top_clusters.iter().map(|c| c.count).sum();
        (clustered as f64 / shared as f64).clamp(0.0, 1.0)
    }

    fn overlap_score(&self, inputs: &ScoreInputs) -> f64 {
        let w = &self.weights;
        let shared = inputs.shared_suspects as f64;
        let magnitude = shared / (shared + w.magnitude_saturation);

        let score = w.jaccard_weight * inputs.jaccard
            + w.magnitude_weight * magnitude
            + w.concentration_weight * inputs.cluster_concentration;

        score.clamp(0.0, 1.0)
    }
}
