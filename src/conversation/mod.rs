/*!
 * Conversation history persistence.
 *
 * Each farmer's recent exchanges provide context for answer generation.
 * History is bounded two ways: at most `MAX_EXCHANGES` exchanges per
 * user, and nothing older than `RETENTION_SECS`. Expired rows are
 * purged lazily on access, so a store that is never read simply keeps
 * its garbage until `purge_expired` runs.
 */

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::StoreError;
use crate::language::LanguageCode;

mod sqlite;

pub use sqlite::SqliteConversationStore;

/// Maximum exchanges retained per user (each exchange is one user
/// message plus one response, so 20 messages total)
pub const MAX_EXCHANGES: usize = 10;

/// History retention window in seconds (48 hours)
pub const RETENTION_SECS: i64 = 172_800;

/// One user message and the response that was actually delivered for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// The farmer's message as received
    pub user_message: String,
    /// The response after validation and fallback substitution
    pub final_response: String,
    /// The language the exchange happened in
    pub language: LanguageCode,
    /// Unix timestamp of the exchange
    pub timestamp: i64,
}

impl Exchange {
    /// Create an exchange timestamped now
    pub fn new(
        user_message: impl Into<String>,
        final_response: impl Into<String>,
        language: LanguageCode,
    ) -> Self {
        Self {
            user_message: user_message.into(),
            final_response: final_response.into(),
            language,
            timestamp: Utc::now().timestamp(),
        }
    }
}

/// Common trait for conversation history stores
#[async_trait]
pub trait ConversationStore: Send + Sync + Debug {
    /// Get a user's retained history, oldest first, expired rows purged
    async fn get(&self, user_id: &str) -> Result<Vec<Exchange>, StoreError>;

    /// Replace a user's history, keeping only the newest `MAX_EXCHANGES`
    async fn put(&self, user_id: &str, exchanges: Vec<Exchange>) -> Result<(), StoreError>;

    /// Delete a user's history entirely
    async fn delete(&self, user_id: &str) -> Result<(), StoreError>;

    /// Append one exchange atomically, purging expired rows and
    /// truncating to `MAX_EXCHANGES` in the same transaction
    async fn append_exchange(&self, user_id: &str, exchange: Exchange) -> Result<(), StoreError>;

    /// Purge expired rows across all users, returning how many were removed
    async fn purge_expired(&self) -> Result<usize, StoreError>;
}
