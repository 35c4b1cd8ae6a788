use crate::categorizer::{is_known_content_type, is_valid_url, Category};
use crate::error::ValidationError;

pub const USERNAME_LEN: (usize, usize) = (3, 50);
pub const TITLE_LEN: (usize, usize) = (1, 200);
pub const DESCRIPTION_MAX: usize = 1000;

fn check_len(
    field: &'static str,
    value: &str,
    (min, max): (usize, usize),
) -> Result<(), ValidationError> {
    let n = value.chars().count();
    if n < min || n > max {
        return Err(ValidationError::Length { field, min, max });
    }
    Ok(())
}

pub fn username(value: &str) -> Result<(), ValidationError> {
    check_len("username", value, USERNAME_LEN)
}

pub fn title(value: &str) -> Result<(), ValidationError> {
    check_len("title", value, TITLE_LEN)
}

pub fn description(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(d) => check_len("description", d, (0, DESCRIPTION_MAX)),
        None => Ok(()),
    }
}

pub fn thumbnail(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(t) if !is_valid_url(t) => Err(ValidationError::Url("thumbnail")),
        _ => Ok(()),
    }
}

pub fn content_type(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(t) if !is_known_content_type(t) => {
            Err(ValidationError::UnknownContentType(t.to_string()))
        }
        _ => Ok(()),
    }
}

pub fn category(value: Option<&str>) -> Result<Option<Category>, ValidationError> {
    value.map(str::parse).transpose()
}

/// Content ids are UUIDs; anything else cannot name a stored record.
pub fn content_id(value: &str) -> Result<String, ValidationError> {
    uuid::Uuid::parse_str(value)
        .map(|id| id.to_string())
        .map_err(|_| ValidationError::ContentId(value.to_string()))
}
