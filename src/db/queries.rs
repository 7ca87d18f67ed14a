// Database queries — CRUD operations for all tables.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use std::collections::HashSet;

use anyhow::Result;
use rusqlite::{params, Connection};

use super::models::{canonical_pair, ClusterCount, OverlapEdge};

// --- Input tables (populated by import, read by recompute) ---

/// Record that a follower belongs to an actor. Duplicate relations are
/// ignored rather than erroring so imports can be re-run.
pub fn insert_relation(conn: &Connection, actor_id: &str, follower_id: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO actor_followers (actor_id, follower_id) VALUES (?1, ?2)",
        params![actor_id, follower_id],
    )?;
    Ok(())
}

/// Set the classifier verdict for a follower (upsert).
pub fn set_flag(conn: &Connection, follower_id: &str, is_suspect: bool) -> Result<()> {
    conn.execute(
        "INSERT INTO follower_flags (follower_id, is_suspect, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(follower_id) DO UPDATE SET is_suspect = ?2, updated_at = datetime('now')",
        params![follower_id, is_suspect],
    )?;
    Ok(())
}

/// All distinct actor ids present in the relation table, sorted.
pub fn list_actor_ids(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT actor_id FROM actor_followers ORDER BY actor_id")?;
    let rows = stmt.query_map([], |row| row.get(0))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }
    Ok(ids)
}

// --- Suspect sets ---

/// The set of followers of `actor_id` flagged as suspect.
///
/// A join between actor_followers and follower_flags, filtered to
/// is_suspect. Unknown actors and actors with no flagged followers both
/// yield an empty set — never an error.
pub fn suspect_followers(conn: &Connection, actor_id: &str) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT af.follower_id
         FROM actor_followers af
         JOIN follower_flags ff ON ff.follower_id = af.follower_id
         WHERE af.actor_id = ?1 AND ff.is_suspect = 1",
    )?;
    let rows = stmt.query_map(params![actor_id], |row| row.get(0))?;

    let mut suspects = HashSet::new();
    for row in rows {
        suspects.insert(row?);
    }
    Ok(suspects)
}

/// Cardinality of the actor's suspect set, as an independent COUNT query.
///
/// Deliberately not derived from `suspect_followers` — the two must agree,
/// and the composition tests assert that they do.
pub fn count_suspects(conn: &Connection, actor_id: &str) -> Result<u32> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*)
         FROM actor_followers af
         JOIN follower_flags ff ON ff.follower_id = af.follower_id
         WHERE af.actor_id = ?1 AND ff.is_suspect = 1",
        params![actor_id],
        |row| row.get(0),
    )?;
    Ok(count as u32)
}

// --- Overlap edges ---

/// Save or replace the edge for an unordered actor pair.
///
/// The pair key is canonicalized as (min, max) here, at the last moment
/// before the write, so no caller can create a mirrored duplicate row.
pub fn upsert_edge(conn: &Connection, edge: &OverlapEdge) -> Result<()> {
    let (a, b) = canonical_pair(&edge.actor_a, &edge.actor_b);
    let clusters_json = serde_json::to_string(&edge.top_clusters)?;
    conn.execute(
        "INSERT INTO farm_edges (actor_a, actor_b, shared_suspects, shared_total,
                                 jaccard, overlap_score, top_clusters, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(actor_a, actor_b) DO UPDATE SET
            shared_suspects = ?3,
            shared_total = ?4,
            jaccard = ?5,
            overlap_score = ?6,
            top_clusters = ?7,
            updated_at = ?8",
        params![
            a,
            b,
            edge.shared_suspects,
            edge.shared_total,
            edge.jaccard,
            edge.overlap_score,
            clusters_json,
            edge.updated_at,
        ],
    )?;
    Ok(())
}

/// Fetch the edge for an unordered pair, if one exists.
pub fn get_edge(conn: &Connection, a: &str, b: &str) -> Result<Option<OverlapEdge>> {
    let (a, b) = canonical_pair(a, b);
    let mut stmt = conn.prepare(
        "SELECT actor_a, actor_b, shared_suspects, shared_total, jaccard,
                overlap_score, top_clusters, updated_at
         FROM farm_edges
         WHERE actor_a = ?1 AND actor_b = ?2",
    )?;
    let result = stmt
        .query_row(params![a, b], edge_from_row)
        .optional()?;
    Ok(result)
}

/// All edges with overlap_score >= min_score, sorted by score descending,
/// at most `limit` rows.
pub fn edges_above(conn: &Connection, min_score: f64, limit: u32) -> Result<Vec<OverlapEdge>> {
    let mut stmt = conn.prepare(
        "SELECT actor_a, actor_b, shared_suspects, shared_total, jaccard,
                overlap_score, top_clusters, updated_at
         FROM farm_edges
         WHERE overlap_score >= ?1
         ORDER BY overlap_score DESC
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![min_score, limit], edge_from_row)?;

    let mut edges = Vec::new();
    for row in rows {
        edges.push(row?);
    }
    Ok(edges)
}

fn edge_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OverlapEdge> {
    let clusters_json: String = row.get(6)?;
    let top_clusters: Vec<ClusterCount> = serde_json::from_str(&clusters_json).unwrap_or_default();
    Ok(OverlapEdge {
        actor_a: row.get(0)?,
        actor_b: row.get(1)?,
        shared_suspects: row.get(2)?,
        shared_total: row.get(3)?,
        jaccard: row.get(4)?,
        overlap_score: row.get(5)?,
        top_clusters,
        updated_at: row.get(7)?,
    })
}

// --- Status counters ---

pub fn count_relations(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM actor_followers", [], |r| r.get(0))?)
}

pub fn count_flagged(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM follower_flags WHERE is_suspect = 1",
        [],
        |r| r.get(0),
    )?)
}

pub fn count_edges(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM farm_edges", [], |r| r.get(0))?)
}

/// Timestamp of the most recent recompute touching any edge.
pub fn last_recompute_at(conn: &Connection) -> Result<Option<String>> {
    let result = conn
        .query_row("SELECT MAX(updated_at) FROM farm_edges", [], |r| r.get(0))
        .optional()?;
    Ok(result.flatten())
}

// rusqlite's optional() helper — converts "no rows" into None
use rusqlite::OptionalExtension;
