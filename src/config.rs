use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "second-brain.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BrainConfig {
    /// Any sqlx URL; `None` selects a sqlite file in the data directory.
    pub database_url: Option<String>,
    pub run_migrations: bool,
    /// Page size used when a listing does not ask for one.
    pub page_limit: u32,
    pub share_hash_len: usize,
    pub log_filter: String,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            run_migrations: true,
            page_limit: 100,
            share_hash_len: 10,
            log_filter: "info".to_string(),
        }
    }
}

impl BrainConfig {
    /// Load from `path`, or from the default config location when `None`.
    /// A missing file yields defaults; environment overrides apply either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);
        let mut cfg = match path {
            Some(p) if p.exists() => Self::from_file(&p)?,
            _ => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config: {}", path.display()))
    }

    /// Values that fail to parse are ignored and the current value kept.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SECOND_BRAIN_DATABASE_URL").filter(|s| !s.trim().is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(v) = lookup("SECOND_BRAIN_RUN_MIGRATIONS").and_then(|s| s.parse().ok()) {
            self.run_migrations = v;
        }
        if let Some(v) = lookup("SECOND_BRAIN_PAGE_LIMIT").and_then(|s| s.parse().ok()) {
            self.page_limit = v;
        }
        if let Some(v) = lookup("SECOND_BRAIN_SHARE_HASH_LEN").and_then(|s| s.parse().ok()) {
            self.share_hash_len = v;
        }
        if let Some(v) = lookup("SECOND_BRAIN_LOG").filter(|s| !s.trim().is_empty()) {
            self.log_filter = v;
        }
        // zero-length hashes would make every brain reachable by ""
        if self.share_hash_len == 0 {
            self.share_hash_len = Self::default().share_hash_len;
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "second-brain", "second-brain")
        .map(|p| p.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_loads_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(BrainConfig::from_file(&missing).is_err());

        let cfg = BrainConfig::load(Some(&missing)).unwrap();
        assert_eq!(cfg.share_hash_len, BrainConfig::default().share_hash_len);

        let mut cfg = BrainConfig::default();
        cfg.apply_overrides(|_| None);
        assert_eq!(cfg, BrainConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "page_limit = 25\ndatabase_url = \"sqlite::memory:\"\n").unwrap();
        let cfg = BrainConfig::from_file(&path).unwrap();
        assert_eq!(cfg.page_limit, 25);
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(cfg.share_hash_len, 10);
        assert!(cfg.run_migrations);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "page_limit = \"lots\"").unwrap();
        assert!(BrainConfig::from_file(&path).is_err());
    }

    #[test]
    fn env_overrides_apply_and_bad_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SECOND_BRAIN_DATABASE_URL", "sqlite:///tmp/b.db"),
            ("SECOND_BRAIN_PAGE_LIMIT", "not-a-number"),
            ("SECOND_BRAIN_SHARE_HASH_LEN", "0"),
            ("SECOND_BRAIN_RUN_MIGRATIONS", "false"),
            ("SECOND_BRAIN_LOG", "second_brain=debug"),
        ]);
        let mut cfg = BrainConfig::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite:///tmp/b.db"));
        assert_eq!(cfg.page_limit, 100);
        assert_eq!(cfg.share_hash_len, 10);
        assert!(!cfg.run_migrations);
        assert_eq!(cfg.log_filter, "second_brain=debug");
    }
}
