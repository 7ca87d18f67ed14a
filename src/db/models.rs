// Data models — Rust structs that map to database rows.
//
// These are the types that flow through the application. They're separate
// from the database queries so other modules can use them without depending
// on rusqlite directly.

use serde::{Deserialize, Serialize};

/// A scored edge between two actors sharing flagged-inauthentic followers.
///
/// The pair key is canonical: `actor_a < actor_b` lexicographically, so one
/// unordered pair maps to exactly one stored row no matter what order the
/// actors were passed to recompute in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapEdge {
    pub actor_a: String,
    pub actor_b: String,
    /// Number of flagged followers common to both actors.
    pub shared_suspects: u32,
    /// Currently mirrors shared_suspects; reserved for a richer
    /// total-overlap metric that also counts unflagged shared followers.
    pub shared_total: u32,
    /// Jaccard similarity of the two suspect sets, rounded to 4 decimals.
    pub jaccard: f64,
    /// Composite risk score in [0, 1], rounded to 4 decimals.
    pub overlap_score: f64,
    /// Dominant bot-cluster signatures among the shared suspects
    /// (JSON-encoded in the DB). The computation path currently always
    /// leaves this empty.
    pub top_clusters: Vec<ClusterCount>,
    pub updated_at: String,
}

/// One bot-cluster signature and how many shared suspects carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterCount {
    pub hash: String,
    pub count: u32,
}

/// A node in the farm overlap graph. The type marker is always "ACTOR";
/// it exists so graph consumers can mix node kinds later without a schema
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
}

impl GraphNode {
    pub fn actor(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: "ACTOR".to_string(),
        }
    }
}

/// The derived graph payload returned by get_graph. Never persisted —
/// rebuilt from the edge table on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmGraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<OverlapEdge>,
}

/// Summary returned by recompute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecomputeSummary {
    pub edge_count: usize,
    /// RFC 3339 timestamp shared by every edge written in this batch.
    pub updated_at: String,
}

/// Canonicalize an unordered actor pair as (min, max).
///
/// Applied before every edge read and write so (a, b) and (b, a) can never
/// produce two distinct rows.
pub fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Input file format for `driftnet import` — actor/follower relations plus
/// follower flags, as exported by an upstream classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportFile {
    #[serde(default)]
    pub relations: Vec<RelationRow>,
    #[serde(default)]
    pub flags: Vec<FlagRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationRow {
    pub actor_id: String,
    pub follower_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagRow {
    pub follower_id: String,
    pub is_suspect: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_pair_orders_lexicographically() {
        assert_eq!(
            canonical_pair("beta", "alpha"),
            ("alpha".to_string(), "beta".to_string())
        );
        assert_eq!(
            canonical_pair("alpha", "beta"),
            ("alpha".to_string(), "beta".to_string())
        );
    }

    #[test]
    fn test_canonical_pair_identity() {
        assert_eq!(
            canonical_pair("same", "same"),
            ("same".to_string(), "same".to_string())
        );
    }

    #[test]
    fn test_graph_node_serializes_type_field() {
        let node = GraphNode::actor("actor-1");
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"id":"actor-1","type":"ACTOR"}"#);
    }
}
