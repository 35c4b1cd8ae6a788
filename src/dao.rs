use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::AnyPool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInsert {
    pub id: String,
    pub username: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentInsert {
    pub id: String,
    pub user_id: String,
    pub link: String,
    pub content_type: String,
    pub category: String,
    pub domain: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// id, link, type, category, domain, title, description, thumbnail, created_at, updated_at.
/// Nullable columns are COALESCEd to '' to avoid decoding NULL with the Any driver.
pub type ContentRow = (String, String, String, String, String, String, String, String, i64, i64);

const CONTENT_COLUMNS: &str = "id, link, type, category, domain, title, \
     COALESCE(description, ''), COALESCE(thumbnail, ''), created_at, updated_at";

pub async fn insert_user(pool: &AnyPool, u: &UserInsert) -> Result<()> {
    sqlx::query("INSERT INTO users(id, username, created_at) VALUES(?, ?, ?)")
        .bind(&u.id)
        .bind(&u.username)
        .bind(u.created_at)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_user_by_username(
    pool: &AnyPool,
    username: &str,
) -> Result<Option<(String, String)>> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT id, username FROM users WHERE username = ? LIMIT 1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_user_by_id(pool: &AnyPool, user_id: &str) -> Result<Option<(String, String)>> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT id, username FROM users WHERE id = ? LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert_content(pool: &AnyPool, c: &ContentInsert) -> Result<()> {
    sqlx::query(
        "INSERT INTO contents(
            id, user_id, link, type, category, domain, title, description, thumbnail,
            created_at, updated_at
         ) VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&c.id)
    .bind(&c.user_id)
    .bind(&c.link)
    .bind(&c.content_type)
    .bind(&c.category)
    .bind(&c.domain)
    .bind(&c.title)
    .bind(&c.description)
    .bind(&c.thumbnail)
    .bind(c.created_at)
    .bind(c.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_content(
    pool: &AnyPool,
    user_id: &str,
    content_id: &str,
) -> Result<Option<ContentRow>> {
    let row = sqlx::query_as::<_, ContentRow>(&format!(
        "SELECT {CONTENT_COLUMNS} FROM contents WHERE id = ? AND user_id = ? LIMIT 1"
    ))
    .bind(content_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

fn filter_clause(content_type: Option<&str>, category: Option<&str>) -> String {
    let mut clause = String::from("user_id = ?");
    if content_type.is_some() {
        clause.push_str(" AND type = ?");
    }
    if category.is_some() {
        clause.push_str(" AND category = ?");
    }
    clause
}

/// Newest first; rowid breaks ties between rows created in the same second.
pub async fn list_content(
    pool: &AnyPool,
    user_id: &str,
    content_type: Option<&str>,
    category: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ContentRow>> {
    let sql = format!(
        "SELECT {CONTENT_COLUMNS} FROM contents WHERE {} \
         ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
        filter_clause(content_type, category)
    );
    let mut q = sqlx::query_as::<_, ContentRow>(&sql).bind(user_id);
    if let Some(t) = content_type {
        q = q.bind(t);
    }
    if let Some(c) = category {
        q = q.bind(c);
    }
    let rows = q.bind(limit).bind(offset).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn count_content(
    pool: &AnyPool,
    user_id: &str,
    content_type: Option<&str>,
    category: Option<&str>,
) -> Result<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM contents WHERE {}",
        filter_clause(content_type, category)
    );
    let mut q = sqlx::query_scalar::<_, i64>(&sql).bind(user_id);
    if let Some(t) = content_type {
        q = q.bind(t);
    }
    if let Some(c) = category {
        q = q.bind(c);
    }
    Ok(q.fetch_one(pool).await?)
}

// Scoped to the owner so one user can never remove another's content
pub async fn delete_content(pool: &AnyPool, user_id: &str, content_id: &str) -> Result<u64> {
    let res = sqlx::query("DELETE FROM contents WHERE id = ? AND user_id = ?")
        .bind(content_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn category_counts(pool: &AnyPool, user_id: &str) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT category, COUNT(*) AS n FROM contents WHERE user_id = ? \
         GROUP BY category ORDER BY n DESC, category ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
