pub mod categorizer;
pub mod config;
pub mod dao;
pub mod db;
pub mod error;
pub mod mapping;
pub mod storage;
pub mod types;
pub mod validation;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::categorizer::{
        base_domain, categorize_link, extract_domain, is_valid_url, match_file_type, normalize_url,
        platform_rule, Category, ClassificationResult, CONTENT_TYPES,
    };
    pub use crate::config::BrainConfig;
    pub use crate::error::{BrainError, BrainResult, ValidationError};
    pub use crate::types::{
        CategoryCount, ContentFilter, ContentPage, ContentRecord, NewContent, Pagination,
        ShareOutcome, SharedBrain, User,
    };
    pub use crate::SecondBrain;
}

use anyhow::Context;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::categorizer::{categorize_link, is_valid_url, normalize_url};
use crate::config::BrainConfig;
use crate::db::Database;
use crate::error::{BrainError, BrainResult};
use crate::mapping::{content_insert_from, content_record_from_insert, content_record_from_row};
use crate::storage::Storage;
use crate::types::{
    CategoryCount, ContentFilter, ContentPage, ContentRecord, NewContent, Pagination, ShareOutcome,
    SharedBrain, User,
};

const SHARE_HASH_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SHARE_HASH_ATTEMPTS: usize = 5;

/// Async library entry point. Owns the database and the settings that shape
/// listings and share links.
pub struct SecondBrain {
    db: Database,
    page_limit: u32,
    share_hash_len: usize,
}

impl SecondBrain {
    /// Connect with default settings (plus environment overrides) to `database_url`.
    pub async fn connect(database_url: Option<&str>, run_migrations: bool) -> BrainResult<Self> {
        let mut cfg = BrainConfig::default();
        cfg.apply_overrides(|key| std::env::var(key).ok());
        if let Some(url) = database_url {
            cfg.database_url = Some(url.to_string());
        }
        cfg.run_migrations = run_migrations;
        Self::open(&cfg).await
    }

    /// Connect using a fully resolved configuration.
    pub async fn open(cfg: &BrainConfig) -> BrainResult<Self> {
        let db = Database::connect(cfg.database_url.as_deref()).await?;
        if cfg.run_migrations {
            db.run_migrations().await?;
        }
        Ok(Self { db, page_limit: cfg.page_limit, share_hash_len: cfg.share_hash_len })
    }

    pub fn database(&self) -> &Database { &self.db }

    // --- Users ---

    pub async fn register_user(&self, username: &str) -> BrainResult<User> {
        validation::username(username)?;
        let pool = self.db.pool();
        if dao::find_user_by_username(pool, username).await?.is_some() {
            return Err(BrainError::UsernameTaken(username.to_string()));
        }
        let user = dao::UserInsert {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            created_at: current_epoch(),
        };
        dao::insert_user(pool, &user).await.context("inserting user")?;
        info!(username, user_id = %user.id, "registered user");
        Ok(User { id: user.id, username: user.username })
    }

    pub async fn find_user(&self, username: &str) -> BrainResult<Option<User>> {
        let row = dao::find_user_by_username(self.db.pool(), username).await?;
        Ok(row.map(|(id, username)| User { id, username }))
    }

    async fn require_user(&self, user_id: &str) -> BrainResult<User> {
        dao::find_user_by_id(self.db.pool(), user_id)
            .await?
            .map(|(id, username)| User { id, username })
            .ok_or_else(|| BrainError::UserNotFound(user_id.to_string()))
    }

    // --- Content ---

    /// Normalize, validate and classify `new.link`, then save it for `user_id`.
    pub async fn add_content(&self, user_id: &str, new: NewContent) -> BrainResult<ContentRecord> {
        validation::title(&new.title)?;
        validation::description(new.description.as_deref())?;
        validation::thumbnail(new.thumbnail.as_deref())?;
        validation::content_type(new.content_type.as_deref())?;
        self.require_user(user_id).await?;

        let link = normalize_url(&new.link);
        if !is_valid_url(&link) {
            return Err(BrainError::InvalidUrl(new.link));
        }

        let class = categorize_link(&link);
        debug!(
            %link,
            content_type = class.content_type,
            category = %class.category,
            domain = %class.domain,
            "classified link"
        );

        let insert = content_insert_from(
            uuid::Uuid::new_v4().to_string(),
            user_id.to_string(),
            link,
            &new,
            &class,
            current_epoch(),
        );
        dao::insert_content(self.db.pool(), &insert).await.context("inserting content")?;
        info!(
            user_id,
            content_id = %insert.id,
            content_type = %insert.content_type,
            "content added"
        );
        Ok(content_record_from_insert(insert))
    }

    /// A single saved link, only if it belongs to `user_id`.
    pub async fn get_content(
        &self,
        user_id: &str,
        content_id: &str,
    ) -> BrainResult<Option<ContentRecord>> {
        let content_id = validation::content_id(content_id)?;
        let row = dao::get_content(self.db.pool(), user_id, &content_id).await?;
        Ok(row.map(content_record_from_row))
    }

    /// Newest first, filtered by type and/or category.
    pub async fn list_content(
        &self,
        user_id: &str,
        filter: &ContentFilter,
    ) -> BrainResult<ContentPage> {
        validation::content_type(filter.content_type.as_deref())?;
        let category = validation::category(filter.category.as_deref())?;
        let content_type = filter.content_type.as_deref();
        let category = category.map(|c| c.as_str());
        let limit = filter.limit.unwrap_or(self.page_limit);
        let offset = filter.offset.unwrap_or(0);

        let pool = self.db.pool();
        let rows = dao::list_content(
            pool,
            user_id,
            content_type,
            category,
            i64::from(limit),
            i64::from(offset),
        )
        .await?;
        let total = dao::count_content(pool, user_id, content_type, category).await?;
        let total = u64::try_from(total).unwrap_or_default();
        debug!(user_id, total, limit, offset, "listed content");

        Ok(ContentPage {
            content: rows.into_iter().map(content_record_from_row).collect(),
            pagination: Pagination {
                total,
                limit,
                offset,
                has_more: u64::from(offset) + u64::from(limit) < total,
            },
        })
    }

    pub async fn delete_content(&self, user_id: &str, content_id: &str) -> BrainResult<()> {
        let content_id = validation::content_id(content_id)?;
        let removed = dao::delete_content(self.db.pool(), user_id, &content_id).await?;
        if removed == 0 {
            return Err(BrainError::ContentNotFound(content_id));
        }
        info!(user_id, content_id = %content_id, "content deleted");
        Ok(())
    }

    /// Per-category totals, largest first.
    pub async fn category_counts(&self, user_id: &str) -> BrainResult<Vec<CategoryCount>> {
        let rows = dao::category_counts(self.db.pool(), user_id).await?;
        Ok(rows
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.parse().unwrap_or(categorizer::Category::Other),
                count: u64::try_from(count).unwrap_or_default(),
            })
            .collect())
    }

    // --- Sharing ---

    /// Publish (`share = true`) or withdraw the user's read-only snapshot.
    pub async fn set_sharing(&self, user_id: &str, share: bool) -> BrainResult<ShareOutcome> {
        self.require_user(user_id).await?;
        if !share {
            let removed = self.db.remove_share_hash(user_id).await?;
            info!(user_id, removed, "share link removed");
            return Ok(ShareOutcome::Removed);
        }

        if let Some(hash) = self.db.get_share_hash(user_id).await? {
            return Ok(ShareOutcome::Existing(hash));
        }

        for _ in 0..SHARE_HASH_ATTEMPTS {
            let hash = random_hash(self.share_hash_len);
            if self.db.put_share_hash(user_id, &hash, current_epoch()).await? {
                info!(user_id, "share link created");
                return Ok(ShareOutcome::Created(hash));
            }
            // a concurrent request may have published first
            if let Some(stored) = self.db.get_share_hash(user_id).await? {
                return Ok(ShareOutcome::Existing(stored));
            }
            warn!(user_id, "share hash collision, retrying");
        }
        Err(anyhow::anyhow!(
            "could not allocate a unique share hash after {SHARE_HASH_ATTEMPTS} attempts"
        )
        .into())
    }

    /// Resolve a share hash to its owner's collection, newest first.
    pub async fn shared_brain(&self, hash: &str) -> BrainResult<Option<SharedBrain>> {
        let Some(link) = self.db.find_share_link(hash).await? else {
            debug!(hash, "unknown share hash");
            return Ok(None);
        };
        let owner = self.require_user(&link.user_id).await?;
        let pool = self.db.pool();
        let total = dao::count_content(pool, &owner.id, None, None).await?;
        let rows = dao::list_content(pool, &owner.id, None, None, total, 0).await?;
        Ok(Some(SharedBrain {
            username: owner.username,
            content: rows.into_iter().map(content_record_from_row).collect(),
        }))
    }
}

// --- helpers ---

fn random_hash(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| SHARE_HASH_ALPHABET[rng.random_range(0..SHARE_HASH_ALPHABET.len())] as char)
        .collect()
}

fn current_epoch() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_hash_has_requested_shape() {
        let h = random_hash(10);
        assert_eq!(h.len(), 10);
        assert!(h.bytes().all(|b| SHARE_HASH_ALPHABET.contains(&b)));
        assert_ne!(random_hash(16), random_hash(16));
    }
}
