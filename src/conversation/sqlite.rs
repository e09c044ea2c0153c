/*!
 * SQLite-backed conversation store.
 *
 * A single connection behind a mutex, accessed through spawn_blocking so
 * the async pipeline never blocks on disk. Per-user atomicity comes from
 * running each read-modify-write inside one transaction while holding
 * the connection lock.
 */

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use rusqlite::{Connection, params};

use crate::errors::StoreError;
use crate::language::LanguageCode;

use super::{ConversationStore, Exchange, MAX_EXCHANGES, RETENTION_SECS};

/// Conversation store over a single SQLite database
#[derive(Debug, Clone)]
pub struct SqliteConversationStore {
    /// Path to the database file
    db_path: PathBuf,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl SqliteConversationStore {
    /// Open (or create) a store at the given path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        info!("Opening conversation database at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory conversation database");

        let conn =
            Connection::open_in_memory().context("Failed to create in-memory database")?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Path of the underlying database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn initialize_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS exchanges (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                user_message TEXT NOT NULL,
                final_response TEXT NOT NULL,
                language TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_exchanges_user ON exchanges (user_id, id);
            "#,
        )
        .context("Failed to initialize conversation schema")?;
        Ok(())
    }

    /// Execute a database operation asynchronously via spawn_blocking
    async fn execute_async<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Database(format!("Failed to acquire lock: {}", e)))?;

            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Database(format!("Database task panicked: {}", e)))?
    }

    /// Delete a user's rows older than the retention window
    fn purge_expired_sync(conn: &Connection, user_id: &str, now: i64) -> Result<usize, StoreError> {
        let removed = conn.execute(
            "DELETE FROM exchanges WHERE user_id = ?1 AND created_at < ?2",
            params![user_id, now - RETENTION_SECS],
        )?;
        Ok(removed)
    }

    /// Keep only the newest `MAX_EXCHANGES` rows for a user
    fn truncate_sync(conn: &Connection, user_id: &str) -> Result<(), StoreError> {
        conn.execute(
            r#"
            DELETE FROM exchanges
            WHERE user_id = ?1
              AND id NOT IN (
                  SELECT id FROM exchanges
                  WHERE user_id = ?1
                  ORDER BY id DESC
                  LIMIT ?2
              )
            "#,
            params![user_id, MAX_EXCHANGES as i64],
        )?;
        Ok(())
    }

    fn insert_sync(conn: &Connection, user_id: &str, exchange: &Exchange) -> Result<(), StoreError> {
        conn.execute(
            r#"
            INSERT INTO exchanges (user_id, user_message, final_response, language, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                user_id,
                exchange.user_message,
                exchange.final_response,
                exchange.language.as_str(),
                exchange.timestamp,
            ],
        )?;
        Ok(())
    }

    fn select_sync(conn: &Connection, user_id: &str) -> Result<Vec<Exchange>, StoreError> {
        let mut stmt = conn.prepare(
            r#"
            SELECT user_message, final_response, language, created_at
            FROM exchanges
            WHERE user_id = ?1
            ORDER BY id ASC
            "#,
        )?;

        let rows = stmt.query_map([user_id], |row| {
            Ok(Exchange {
                user_message: row.get(0)?,
                final_response: row.get(1)?,
                language: row
                    .get::<_, String>(2)?
                    .parse()
                    .unwrap_or(LanguageCode::En),
                timestamp: row.get(3)?,
            })
        })?;

        let mut exchanges = Vec::new();
        for row in rows {
            exchanges.push(row?);
        }
        Ok(exchanges)
    }
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn get(&self, user_id: &str) -> Result<Vec<Exchange>, StoreError> {
        let user_id = user_id.to_string();

        self.execute_async(move |conn| {
            let now = Utc::now().timestamp();
            let tx = conn.transaction()?;
            Self::purge_expired_sync(&tx, &user_id, now)?;
            let exchanges = Self::select_sync(&tx, &user_id)?;
            tx.commit()?;
            Ok(exchanges)
        })
        .await
    }

    async fn put(&self, user_id: &str, exchanges: Vec<Exchange>) -> Result<(), StoreError> {
        let user_id = user_id.to_string();

        self.execute_async(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM exchanges WHERE user_id = ?1", [&user_id])?;
            // Insertion order preserves recency, so truncation below keeps
            // the tail of the supplied list
            for exchange in &exchanges {
                Self::insert_sync(&tx, &user_id, exchange)?;
            }
            Self::truncate_sync(&tx, &user_id)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        let user_id = user_id.to_string();

        self.execute_async(move |conn| {
            conn.execute("DELETE FROM exchanges WHERE user_id = ?1", [&user_id])?;
            Ok(())
        })
        .await
    }

    async fn append_exchange(&self, user_id: &str, exchange: Exchange) -> Result<(), StoreError> {
        let user_id = user_id.to_string();

        self.execute_async(move |conn| {
            let now = Utc::now().timestamp();
            let tx = conn.transaction()?;
            Self::purge_expired_sync(&tx, &user_id, now)?;
            Self::insert_sync(&tx, &user_id, &exchange)?;
            Self::truncate_sync(&tx, &user_id)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn purge_expired(&self) -> Result<usize, StoreError> {
        self.execute_async(move |conn| {
            let cutoff = Utc::now().timestamp() - RETENTION_SECS;
            let removed = conn.execute(
                "DELETE FROM exchanges WHERE created_at < ?1",
                params![cutoff],
            )?;
            if removed > 0 {
                debug!("Purged {} expired exchanges", removed);
            }
            Ok(removed)
        })
        .await
    }
}
