use axum::extract::Path;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::hierarchy::{BrowsePath, NextHop};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::storage::{CategoryStore, ContentStore};

/// GET /api/browse - root listing (cities)
pub async fn browse_root() -> ApiResult<Value> {
    browse(BrowsePath::root()).await
}

/// GET /api/browse/*path - resolve an alternating `{level}/{id}` path into
/// the listing at that location, with a ready-made next-hop href per item.
pub async fn browse_path(Path(path): Path<String>) -> ApiResult<Value> {
    let location = BrowsePath::parse(&path)?;
    browse(location).await
}

async fn browse(location: BrowsePath) -> ApiResult<Value> {
    let items = match location.current() {
        None => {
            let store = CategoryStore::new().await?;
            let rows = store.list(crate::hierarchy::Level::City, None).await?;
            with_hrefs(&location, rows)?
        }
        Some((level, id)) => match level.next_hop() {
            NextHop::Level(child) => {
                let store = CategoryStore::new().await?;
                let rows = store.list(child, Some(id)).await?;
                with_hrefs(&location, rows)?
            }
            NextHop::ContentDetail => {
                let store = ContentStore::new().await?;
                let rows = store.list_by_subject(id).await?;
                with_hrefs(&location, rows)?
            }
        },
    };

    Ok(ApiResponse::success(json!({
        "heading": location.heading(),
        "listing_endpoint": location.listing_endpoint(),
        "items": items,
    })))
}

/// Attach the next-hop href to each listed row. Category rows and content
/// rows both carry an integer `id`.
fn with_hrefs<T: serde::Serialize>(
    location: &BrowsePath,
    rows: Vec<T>,
) -> Result<Vec<Value>, ApiError> {
    rows.into_iter()
        .map(|row| {
            let mut value = serde_json::to_value(row).map_err(|e| {
                tracing::error!("Failed to serialize browse item: {}", e);
                ApiError::internal_server_error("Failed to format response")
            })?;

            let id = value
                .get("id")
                .and_then(Value::as_i64)
                .ok_or_else(|| ApiError::internal_server_error("Listing item missing id"))?;

            value["href"] = Value::String(location.item_href(id as i32));
            Ok(value)
        })
        .collect()
}
