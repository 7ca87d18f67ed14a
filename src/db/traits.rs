// Database trait — backend-agnostic async interface for all DB operations.
//
// Implementor: SqliteDatabase (wraps rusqlite). All methods are async so a
// native-async backend (e.g. sqlx/Postgres) can sit behind the same
// interface later without touching the engine.
//
// The trait mirrors the queries.rs function signatures, so the engine works
// against `Arc<dyn Database>` while tests can still hit Connection directly.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

use super::models::OverlapEdge;

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Read-only inputs ---

    /// Record an actor/follower relation (idempotent).
    async fn insert_relation(&self, actor_id: &str, follower_id: &str) -> Result<()>;

    /// Set the classifier verdict for a follower (upsert).
    async fn set_flag(&self, follower_id: &str, is_suspect: bool) -> Result<()>;

    /// All distinct actor ids present in the relation table.
    async fn list_actor_ids(&self) -> Result<Vec<String>>;

    // --- Suspect sets ---

    /// The actor's flagged-follower set. Empty for unknown actors.
    async fn suspect_followers(&self, actor_id: &str) -> Result<HashSet<String>>;

    /// Cardinality of the actor's suspect set, via an independent COUNT.
    async fn count_suspects(&self, actor_id: &str) -> Result<u32>;

    // --- Overlap edges ---

    /// Replace the full edge record for a canonical actor pair,
    /// creating it if absent.
    async fn upsert_edge(&self, edge: &OverlapEdge) -> Result<()>;

    /// Fetch one edge by unordered pair.
    async fn get_edge(&self, a: &str, b: &str) -> Result<Option<OverlapEdge>>;

    /// Edges at or above a score threshold, sorted by score descending.
    async fn edges_above(&self, min_score: f64, limit: u32) -> Result<Vec<OverlapEdge>>;

    // --- Status counters ---

    async fn count_relations(&self) -> Result<i64>;
    async fn count_flagged(&self) -> Result<i64>;
    async fn count_edges(&self) -> Result<i64>;

    /// Timestamp of the most recent recompute, if any edge exists.
    async fn last_recompute_at(&self) -> Result<Option<String>>;
}
