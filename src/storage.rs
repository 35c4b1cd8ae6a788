use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    pub user_id: String,
    pub hash: String,
    pub created_at: i64,
}

/// Per-user share hash storage. At most one hash exists per user.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_share_hash(&self, user_id: &str) -> Result<Option<String>>;
    async fn find_share_link(&self, hash: &str) -> Result<Option<ShareLink>>;
    /// Plain insert. Returns `false`, leaving the table untouched, when the user
    /// already has a hash or `hash` is taken.
    async fn put_share_hash(&self, user_id: &str, hash: &str, created_at: i64) -> Result<bool>;
    async fn remove_share_hash(&self, user_id: &str) -> Result<u64>;
}
