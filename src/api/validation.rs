use super::ApiError;

/// Highest page the catalog provider will serve.
const MAX_PAGE: u32 = 500;

pub fn validate_user_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid user ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_list_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid list ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_movie_id(id: i64) -> Result<i64, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid movie ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_person_id(id: i64) -> Result<i64, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid person ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

/// Defaults to the first page.
pub fn validate_page(page: Option<u32>) -> Result<u32, ApiError> {
    let page = page.unwrap_or(1);
    if !(1..=MAX_PAGE).contains(&page) {
        return Err(ApiError::validation(format!(
            "Invalid page: {page}. Page must be between 1 and {MAX_PAGE}"
        )));
    }
    Ok(page)
}

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }
    Ok(trimmed)
}
