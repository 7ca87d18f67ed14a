// Driftnet: follower-farm overlap detection for influencer networks.
//
// This is the library root. Each module corresponds to a stage of the
// overlap-detection pipeline: storage, suspect-set retrieval, pairwise
// overlap, scoring, and the graph facade that ties them together.

pub mod config;
pub mod db;
pub mod engine;
pub mod output;
pub mod scoring;
