// Farm overlap graph facade — the two public operations.
//
// `recompute` is the batch job: fan out per-actor suspect-set retrieval
// across a bounded worker pool, pair and rank in memory, enrich through the
// scoring boundary, and upsert every surviving edge. `get_graph` is the read
// path: threshold-filtered edges plus the node set derived from their
// endpoints.
//
// All working state (the suspect-set map, the count map) is owned by one
// recompute call and dropped when it returns. Nothing is cached across
// calls, so concurrent recomputes are last-write-wins per canonical pair.

pub mod overlap;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::db::models::{
    canonical_pair, FarmGraphData, GraphNode, OverlapEdge, RecomputeSummary,
};
use crate::db::Database;
use crate::scoring::{round4, OverlapScoring, ScoreInputs};

pub const DEFAULT_MIN_SHARED_SUSPECTS: u32 = 8;
pub const DEFAULT_LIMIT_PAIRS: usize = 200;
pub const DEFAULT_MIN_SCORE: f64 = 0.35;
pub const DEFAULT_GRAPH_LIMIT: u32 = 200;

/// Parameters for one recompute batch.
pub struct RecomputeParams {
    /// Unique actor ids to pair. The caller owns deduplication.
    pub actor_ids: Vec<String>,
    /// Pairs sharing fewer suspects than this are discarded.
    pub min_shared_suspects: u32,
    /// At most this many top-ranked pairs are kept and written.
    pub limit_pairs: usize,
    /// How many suspect-set queries run concurrently.
    pub concurrency: usize,
    /// Hard ceiling on actor-list size; the O(n²) pairing phase makes an
    /// unbounded list a runaway batch.
    pub max_actors: usize,
    /// Per-call deadline covering retrieval, pairing, and writes.
    pub deadline: Duration,
}

impl RecomputeParams {
    pub fn new(actor_ids: Vec<String>) -> Self {
        Self {
            actor_ids,
            min_shared_suspects: DEFAULT_MIN_SHARED_SUSPECTS,
            limit_pairs: DEFAULT_LIMIT_PAIRS,
            concurrency: 8,
            max_actors: 500,
            deadline: Duration::from_secs(300),
        }
    }
}

/// The overlap-detection engine: storage plus an injected scoring policy.
pub struct FarmGraph {
    db: Arc<dyn Database>,
    scoring: Arc<dyn OverlapScoring>,
}

impl FarmGraph {
    pub fn new(db: Arc<dyn Database>, scoring: Arc<dyn OverlapScoring>) -> Self {
        Self { db, scoring }
    }

    /// Rebuild the overlap edges for the given actors.
    ///
    /// Returns only after every surviving edge has been written. A storage
    /// failure aborts the batch — edges written before the failure remain
    /// (each upsert is an independent full-record replace), but no
    /// partial-failure bookkeeping is kept.
    pub async fn recompute(&self, params: RecomputeParams) -> Result<RecomputeSummary> {
        if params.actor_ids.len() > params.max_actors {
            anyhow::bail!(
                "Refusing to pair {} actors (ceiling is {}). Pairing is O(n²) — \
                 split the batch or raise DRIFTNET_MAX_ACTORS.",
                params.actor_ids.len(),
                params.max_actors
            );
        }

        let deadline = params.deadline;
        tokio::time::timeout(deadline, self.recompute_inner(params))
            .await
            .map_err(|_| {
                anyhow::anyhow!("Recompute exceeded its {}s deadline", deadline.as_secs())
            })?
    }

    async fn recompute_inner(&self, params: RecomputeParams) -> Result<RecomputeSummary> {
        info!(
            actors = params.actor_ids.len(),
            min_shared = params.min_shared_suspects,
            limit = params.limit_pairs,
            "Recomputing farm overlap graph"
        );

        // Step 1: fan out suspect-set and suspect-count retrieval. Each
        // actor's queries are independent, so they run buffer_unordered
        // and fan in to per-call maps keyed by actor id.
        let pb = ProgressBar::new(params.actor_ids.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Suspects [{bar:30}] {pos}/{len} ({eta})")
                .unwrap(),
        );

        let db = &self.db;
        let fetched: Vec<Result<(String, HashSet<String>, u32)>> =
            stream::iter(params.actor_ids.iter().cloned().map(|actor_id| {
                let pb = &pb;
                async move {
                    let suspects = db.suspect_followers(&actor_id).await?;
                    // Independent COUNT query, not |suspects| — the two
                    // must agree, and tests hold them to it.
                    let count = db.count_suspects(&actor_id).await?;
                    pb.inc(1);
                    Ok((actor_id, suspects, count))
                }
            }))
            .buffer_unordered(params.concurrency.max(1))
            .collect()
            .await;
        pb.finish_and_clear();

        let mut suspect_sets: HashMap<String, HashSet<String>> = HashMap::new();
        let mut suspect_totals: HashMap<String, u32> = HashMap::new();
        for result in fetched {
            let (actor_id, suspects, count) =
                result.context("Failed to fetch suspect set for actor")?;
            debug!(actor = %actor_id, suspects = count, "Suspect set fetched");
            suspect_sets.insert(actor_id.clone(), suspects);
            suspect_totals.insert(actor_id, count);
        }

        // Step 2: pair in the caller's input order (ties in the ranking
        // stay in first-encounter order).
        let suspects_by_actor: Vec<(String, HashSet<String>)> = params
            .actor_ids
            .iter()
            .map(|id| {
                let set = suspect_sets.remove(id).unwrap_or_default();
                (id.clone(), set)
            })
            .collect();

        let raw = overlap::raw_overlaps(
            &suspects_by_actor,
            params.min_shared_suspects,
            params.limit_pairs,
        );
        info!(pairs = raw.len(), "Pairs above threshold");

        // Step 3: enrich through the scoring boundary. A missing count
        // lookup defaults to zero and flows through the zero-denominator
        // rule inside the policy.
        let now = Utc::now().to_rfc3339();
        let edges: Vec<OverlapEdge> = raw
            .into_iter()
            .map(|r| {
                let total_a = suspect_totals.get(&r.a).copied().unwrap_or(0);
                let total_b = suspect_totals.get(&r.b).copied().unwrap_or(0);

                let jaccard = self.scoring.jaccard(r.shared_suspects, total_a, total_b);
                let concentration = self
                    .scoring
                    .cluster_concentration(&r.top_clusters, r.shared_suspects);
                let score = self.scoring.overlap_score(&ScoreInputs {
                    shared_suspects: r.shared_suspects,
                    jaccard,
                    cluster_concentration: concentration,
                });

                let (actor_a, actor_b) = canonical_pair(&r.a, &r.b);
                OverlapEdge {
                    actor_a,
                    actor_b,
                    shared_suspects: r.shared_suspects,
                    shared_total: r.shared_suspects,
                    jaccard: round4(jaccard),
                    overlap_score: round4(score),
                    top_clusters: r.top_clusters,
                    updated_at: now.clone(),
                }
            })
            .collect();

        // Step 4: persist. Writes serialize behind the connection anyway,
        // so they run in sequence; any failure aborts the batch.
        for edge in &edges {
            self.db.upsert_edge(edge).await?;
        }

        info!(edges = edges.len(), "Recompute complete");
        Ok(RecomputeSummary {
            edge_count: edges.len(),
            updated_at: now,
        })
    }

    /// Read the graph of edges at or above `min_score`.
    ///
    /// Nodes are the distinct endpoints of the returned edges, in first-
    /// encounter order, each tagged ACTOR. Zero matching edges yields empty
    /// vectors, not an error.
    pub async fn get_graph(&self, min_score: f64, limit: u32) -> Result<FarmGraphData> {
        let edges = self.db.edges_above(min_score, limit).await?;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut nodes: Vec<GraphNode> = Vec::new();
        for edge in &edges {
            if seen.insert(edge.actor_a.as_str()) {
                nodes.push(GraphNode::actor(edge.actor_a.as_str()));
            }
            if seen.insert(edge.actor_b.as_str()) {
                nodes.push(GraphNode::actor(edge.actor_b.as_str()));
            }
        }

        Ok(FarmGraphData { nodes, edges })
    }
}
