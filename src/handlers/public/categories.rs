use axum::extract::{Path, Query};
use serde::Deserialize;

use crate::database::models::CategoryRow;
use crate::error::ApiError;
use crate::hierarchy::Level;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::storage::CategoryStore;

/// GET /api/cities - list all cities, ordered by name
pub async fn cities_list() -> ApiResult<Vec<CategoryRow>> {
    list_level(Level::City, None).await
}

/// GET /api/cities/:id/schools
pub async fn schools_list(Path(city_id): Path<i32>) -> ApiResult<Vec<CategoryRow>> {
    list_level(Level::School, Some(city_id)).await
}

/// GET /api/schools/:id/semesters
pub async fn semesters_list(Path(school_id): Path<i32>) -> ApiResult<Vec<CategoryRow>> {
    list_level(Level::Semester, Some(school_id)).await
}

/// GET /api/semesters/:id/groups
pub async fn groups_list(Path(semester_id): Path<i32>) -> ApiResult<Vec<CategoryRow>> {
    list_level(Level::Group, Some(semester_id)).await
}

/// GET /api/groups/:id/subjects
pub async fn subjects_list(Path(group_id): Path<i32>) -> ApiResult<Vec<CategoryRow>> {
    list_level(Level::Subject, Some(group_id)).await
}

async fn list_level(level: Level, parent_id: Option<i32>) -> ApiResult<Vec<CategoryRow>> {
    let store = CategoryStore::new().await?;
    let rows = store.list(level, parent_id).await?;
    Ok(ApiResponse::success(rows))
}

#[derive(Debug, Deserialize)]
pub struct NavigateQuery {
    pub parent: Option<i32>,
}

/// GET /api/navigate/:level/:slug?parent= - resolve a readable path segment
/// to its row. Every level except city requires the parent id.
pub async fn navigate(
    Path((level, slug)): Path<(String, String)>,
    Query(query): Query<NavigateQuery>,
) -> ApiResult<CategoryRow> {
    let level: Level = level.parse()?;

    if level != Level::City && query.parent.is_none() {
        return Err(ApiError::bad_request(format!(
            "'parent' query parameter is required to resolve a {} slug",
            level
        )));
    }

    let store = CategoryStore::new().await?;
    let row = store
        .find_by_slug(level, query.parent, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} '{}' not found", level, slug)))?;

    Ok(ApiResponse::success(row))
}
