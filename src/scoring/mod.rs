// Scoring boundary — the three formulas that turn raw overlap counts into
// normalized scores.
//
// The engine treats scoring as an injected policy: the Pairwise Overlap
// Computer and the Graph Store never call a concrete formula directly.
// Swapping in an alternative weighting scheme means implementing
// OverlapScoring and handing it to FarmGraph — nothing else changes.

pub mod default;

pub use default::{DefaultScoring, ScoreWeights};

use crate::db::models::ClusterCount;

/// Inputs to the composite overlap score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs {
    pub shared_suspects: u32,
    pub jaccard: f64,
    pub cluster_concentration: f64,
}

/// The scoring-formula boundary.
///
/// Every method must be deterministic and return a value in [0, 1] —
/// the store applies no range validation of its own.
pub trait OverlapScoring: Send + Sync {
    /// Jaccard similarity of two suspect sets from their intersection size
    /// and cardinalities. Must return 0 when the union size
    /// (total_a + total_b - shared) is not positive.
    fn jaccard(&self, shared: u32, total_a: u32, total_b: u32) -> f64;

    /// Fraction of shared suspects attributable to the dominant
    /// bot-cluster signatures.
    fn cluster_concentration(&self, top_clusters: &[ClusterCount], shared: u32) -> f64;

    /// Composite risk score blending magnitude, similarity, and
    /// concentration.
    fn overlap_score(&self, inputs: &ScoreInputs) -> f64;
}

/// Round to 4 decimal places before storage, so stored values stay stable
/// across floating-point re-derivations and compare equal in idempotence
/// checks.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
