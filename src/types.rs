use serde::{Deserialize, Serialize};

use crate::categorizer::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

/// Caller-supplied fields for a new saved link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewContent {
    pub link: String,
    pub title: String,
    /// Overrides the detected type when present.
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: String,
    pub link: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub category: Category,
    pub domain: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub created_at: i64,
    /// Equal to `created_at` until an edit operation exists.
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentFilter {
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPage {
    pub content: Vec<ContentRecord>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "hash", rename_all = "lowercase")]
pub enum ShareOutcome {
    Created(String),
    Existing(String),
    Removed,
}

impl ShareOutcome {
    pub fn hash(&self) -> Option<&str> {
        match self {
            ShareOutcome::Created(h) | ShareOutcome::Existing(h) => Some(h),
            ShareOutcome::Removed => None,
        }
    }
}

/// Read-only snapshot served for a share hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedBrain {
    pub username: String,
    pub content: Vec<ContentRecord>,
}
