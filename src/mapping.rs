use crate::categorizer::{Category, ClassificationResult};
use crate::dao::{ContentInsert, ContentRow};
use crate::types::{ContentRecord, NewContent};

fn non_empty(s: String) -> Option<String> {
    Some(s).filter(|s| !s.is_empty())
}

/// Build the row to persist. An explicit type wins over the detected one;
/// category and domain always come from classification.
pub fn content_insert_from(
    id: String,
    user_id: String,
    link: String,
    new: &NewContent,
    class: &ClassificationResult,
    created_at: i64,
) -> ContentInsert {
    ContentInsert {
        id,
        user_id,
        link,
        content_type: new.content_type.clone().unwrap_or_else(|| class.content_type.to_string()),
        category: class.category.as_str().to_string(),
        domain: class.domain.clone(),
        title: new.title.clone(),
        description: new.description.clone().and_then(non_empty),
        thumbnail: new.thumbnail.clone().and_then(non_empty),
        created_at,
        updated_at: created_at,
    }
}

pub fn content_record_from_insert(c: ContentInsert) -> ContentRecord {
    ContentRecord {
        id: c.id,
        link: c.link,
        category: c.category.parse().unwrap_or(Category::Other),
        content_type: c.content_type,
        domain: c.domain,
        title: c.title,
        description: c.description,
        thumbnail: c.thumbnail,
        created_at: c.created_at,
        updated_at: c.updated_at,
    }
}

pub fn content_record_from_row(row: ContentRow) -> ContentRecord {
    let (
        id,
        link,
        content_type,
        category,
        domain,
        title,
        description,
        thumbnail,
        created_at,
        updated_at,
    ) = row;
    ContentRecord {
        id,
        link,
        content_type,
        category: category.parse().unwrap_or(Category::Other),
        domain,
        title,
        description: non_empty(description),
        thumbnail: non_empty(thumbnail),
        created_at,
        updated_at,
    }
}
