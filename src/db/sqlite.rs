// SqliteDatabase — rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Send.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points — Rust enforces this because
// MutexGuard is !Send.
//
// The free functions in queries.rs remain unchanged so unit tests can keep
// working against Connection directly.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::OverlapEdge;
use super::traits::Database;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn insert_relation(&self, actor_id: &str, follower_id: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::insert_relation(&conn, actor_id, follower_id)
    }

    async fn set_flag(&self, follower_id: &str, is_suspect: bool) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::set_flag(&conn, follower_id, is_suspect)
    }

    async fn list_actor_ids(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().await;
        super::queries::list_actor_ids(&conn)
    }

    async fn suspect_followers(&self, actor_id: &str) -> Result<HashSet<String>> {
        let conn = self.conn.lock().await;
        super::queries::suspect_followers(&conn, actor_id)
    }

    async fn count_suspects(&self, actor_id: &str) -> Result<u32> {
        let conn = self.conn.lock().await;
        super::queries::count_suspects(&conn, actor_id)
    }

    async fn upsert_edge(&self, edge: &OverlapEdge) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_edge(&conn, edge)
    }

    async fn get_edge(&self, a: &str, b: &str) -> Result<Option<OverlapEdge>> {
        let conn = self.conn.lock().await;
        super::queries::get_edge(&conn, a, b)
    }

    async fn edges_above(&self, min_score: f64, limit: u32) -> Result<Vec<OverlapEdge>> {
        let conn = self.conn.lock().await;
        super::queries::edges_above(&conn, min_score, limit)
    }

    async fn count_relations(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_relations(&conn)
    }

    async fn count_flagged(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_flagged(&conn)
    }

    async fn count_edges(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_edges(&conn)
    }

    async fn last_recompute_at(&self) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        super::queries::last_recompute_at(&conn)
    }
}
