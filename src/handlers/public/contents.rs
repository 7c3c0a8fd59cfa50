use axum::extract::Path;
use serde::Serialize;

use crate::database::models::{Content, ContentPage};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::storage::ContentStore;

/// GET /api/subjects/:id/contents - newest first
pub async fn contents_by_subject(Path(subject_id): Path<i32>) -> ApiResult<Vec<Content>> {
    let store = ContentStore::new().await?;
    let rows = store.list_by_subject(subject_id).await?;
    Ok(ApiResponse::success(rows))
}

#[derive(Debug, Serialize)]
pub struct ContentWithPages {
    #[serde(flatten)]
    pub content: Content,
    pub pages: Vec<ContentPage>,
}

/// GET /api/contents/:id - content plus its ordered page images
pub async fn content_get(Path(content_id): Path<i32>) -> ApiResult<ContentWithPages> {
    let store = ContentStore::new().await?;

    let content = store
        .get(content_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Content not found"))?;

    let pages = store.pages(content_id).await?;

    Ok(ApiResponse::success(ContentWithPages { content, pages }))
}
