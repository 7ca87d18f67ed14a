// Database schema — table creation and migrations.
//
// We use a simple version-based migration approach: a `schema_version` table
// tracks which migrations have run, and each migration is a function that
// executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent — safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Which followers belong to which actor. Read-only input:
        -- populated by `driftnet import`, never written by recompute.
        CREATE TABLE IF NOT EXISTS actor_followers (
            actor_id TEXT NOT NULL,
            follower_id TEXT NOT NULL,
            PRIMARY KEY (actor_id, follower_id)
        );

        -- Upstream classifier verdict per follower. Read-only input.
        CREATE TABLE IF NOT EXISTS follower_flags (
            follower_id TEXT PRIMARY KEY,
            is_suspect INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Scored overlap edges, one row per canonical (actor_a, actor_b)
        -- pair with actor_a < actor_b lexicographically
        CREATE TABLE IF NOT EXISTS farm_edges (
            actor_a TEXT NOT NULL,
            actor_b TEXT NOT NULL,
            shared_suspects INTEGER NOT NULL,
            shared_total INTEGER NOT NULL,
            jaccard REAL NOT NULL,
            overlap_score REAL NOT NULL,
            top_clusters TEXT NOT NULL DEFAULT '[]',  -- JSON array of {hash, count}
            updated_at TEXT NOT NULL,
            PRIMARY KEY (actor_a, actor_b)
        );

        -- Index for the per-actor suspect join
        CREATE INDEX IF NOT EXISTS idx_followers_actor
            ON actor_followers(actor_id);

        -- Index for threshold-filtered graph reads sorted by score
        CREATE INDEX IF NOT EXISTS idx_edges_score
            ON farm_edges(overlap_score);
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
/// The migration function receives the connection and should execute its SQL.
#[allow(dead_code)]
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
