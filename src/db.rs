use anyhow::{Context, Result};
use directories::ProjectDirs;
use sqlx::{any::AnyConnectOptions, AnyPool, ConnectOptions, migrate::Migrator};
use sqlx::any::AnyPoolOptions;
use std::{path::PathBuf, str::FromStr};
use std::sync::Once;

use crate::storage::{ShareLink, Storage};

// Ensure drivers are installed exactly once for sqlx::any
static INSTALL_DRIVERS: Once = Once::new();

// Embed SQL migrations from the migrations/ directory
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    // Create a connection pool. If database_url is None, use a SQLite file in
    // the user's data directory.
    pub async fn connect(database_url: Option<&str>) -> Result<Self> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        let url = match database_url {
            Some(u) if !u.trim().is_empty() => u.to_string(),
            _ => default_sqlite_url()?,
        };

        let opts = AnyConnectOptions::from_str(&url)
            .with_context(|| format!("invalid database URL: {url}"))?;
        // Quiet by default; callers can enable SQLX_LOG if they want
        let opts = opts.disable_statement_logging();

        let pool = AnyPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .with_context(|| format!("failed to connect to database: {url}"))?;

        tracing::debug!(%url, "database pool ready");
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.context("running migrations")
    }

    pub fn pool(&self) -> &AnyPool { &self.pool }
}

#[async_trait::async_trait]
impl Storage for Database {
    async fn get_share_hash(&self, user_id: &str) -> Result<Option<String>> {
        let row = sqlx::query_scalar::<_, String>("SELECT hash FROM share_links WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_share_link(&self, hash: &str) -> Result<Option<ShareLink>> {
        let row = sqlx::query_as::<_, (String, String, i64)>(
            "SELECT user_id, hash, created_at FROM share_links WHERE hash = ?",
        )
        .bind(hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(user_id, hash, created_at)| ShareLink { user_id, hash, created_at }))
    }

    async fn put_share_hash(&self, user_id: &str, hash: &str, created_at: i64) -> Result<bool> {
        let res = sqlx::query("INSERT INTO share_links(user_id, hash, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(hash)
            .bind(created_at)
            .execute(&self.pool)
            .await;
        match res {
            Ok(_) => Ok(true),
            // either the user already has a hash or the hash belongs to someone else
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_share_hash(&self, user_id: &str) -> Result<u64> {
        let res = sqlx::query("DELETE FROM share_links WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}

fn default_sqlite_url() -> Result<String> {
    let proj = ProjectDirs::from("dev", "second-brain", "second-brain")
        .context("unable to determine data directory for default sqlite path")?;
    let mut path: PathBuf = proj.data_dir().to_path_buf();
    std::fs::create_dir_all(&path)
        .with_context(|| format!("creating data dir: {}", path.display()))?;
    path.push("second-brain.db");

    Ok(sqlite_url_for(&path))
}

/// `sqlite://` URL that creates the file on first open.
pub fn sqlite_url_for(path: &std::path::Path) -> String {
    // Encode spaces in the path for a valid sqlite URL
    let path_str = path.to_string_lossy().replace(' ', "%20");
    format!("sqlite://{path_str}?mode=rwc")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_url_encodes_spaces_and_creates() {
        let url = sqlite_url_for(std::path::Path::new("/tmp/my data/brain.db"));
        assert_eq!(url, "sqlite:///tmp/my%20data/brain.db?mode=rwc");
    }
}
