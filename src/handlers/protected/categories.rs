use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::models::CategoryRow;
use crate::error::ApiError;
use crate::hierarchy::Level;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::policy::{authorize, Action};
use crate::storage::categories::{is_valid_slug, CategoryStore};

#[derive(Debug, Deserialize)]
pub struct NewCityRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct NewChildRequest {
    pub name: String,
    pub slug: String,
    pub parent_id: i32,
}

/// POST /api/cities (admin)
pub async fn city_create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewCityRequest>,
) -> ApiResult<CategoryRow> {
    create_level(&user, Level::City, &payload.name, &payload.slug, None).await
}

/// POST /api/schools (admin)
pub async fn school_create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewChildRequest>,
) -> ApiResult<CategoryRow> {
    create_level(
        &user,
        Level::School,
        &payload.name,
        &payload.slug,
        Some(payload.parent_id),
    )
    .await
}

/// POST /api/semesters (admin)
pub async fn semester_create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewChildRequest>,
) -> ApiResult<CategoryRow> {
    create_level(
        &user,
        Level::Semester,
        &payload.name,
        &payload.slug,
        Some(payload.parent_id),
    )
    .await
}

/// POST /api/groups (admin)
pub async fn group_create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewChildRequest>,
) -> ApiResult<CategoryRow> {
    create_level(
        &user,
        Level::Group,
        &payload.name,
        &payload.slug,
        Some(payload.parent_id),
    )
    .await
}

/// POST /api/subjects (admin)
pub async fn subject_create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewChildRequest>,
) -> ApiResult<CategoryRow> {
    create_level(
        &user,
        Level::Subject,
        &payload.name,
        &payload.slug,
        Some(payload.parent_id),
    )
    .await
}

/// DELETE /api/cities/:id (admin)
pub async fn city_delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Value> {
    delete_level(&user, Level::City, id).await
}

/// DELETE /api/schools/:id (admin)
pub async fn school_delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Value> {
    delete_level(&user, Level::School, id).await
}

/// DELETE /api/semesters/:id (admin)
pub async fn semester_delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Value> {
    delete_level(&user, Level::Semester, id).await
}

/// DELETE /api/groups/:id (admin)
pub async fn group_delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Value> {
    delete_level(&user, Level::Group, id).await
}

/// DELETE /api/subjects/:id (admin)
pub async fn subject_delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Value> {
    delete_level(&user, Level::Subject, id).await
}

async fn create_level(
    user: &AuthUser,
    level: Level,
    name: &str,
    slug: &str,
    parent_id: Option<i32>,
) -> ApiResult<CategoryRow> {
    authorize(user, Action::ManageCategories)?;

    let mut field_errors = HashMap::new();
    if name.trim().is_empty() {
        field_errors.insert("name".to_string(), "This field is required".to_string());
    }
    if !is_valid_slug(slug) {
        field_errors.insert(
            "slug".to_string(),
            "Slug must be lowercase letters, digits, and hyphens".to_string(),
        );
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            format!("Invalid {} payload", level),
            Some(field_errors),
        ));
    }

    let store = CategoryStore::new().await?;
    let row = store.create(level, name, slug, parent_id).await?;

    tracing::info!("{} '{}' created by {}", level, row.slug, user.username);
    Ok(ApiResponse::created(row))
}

async fn delete_level(user: &AuthUser, level: Level, id: i32) -> ApiResult<Value> {
    authorize(user, Action::ManageCategories)?;

    let store = CategoryStore::new().await?;
    store.delete(level, id).await?;

    tracing::info!("{} {} deleted by {}", level, id, user.username);
    Ok(ApiResponse::success(json!({
        "message": format!("{} deleted successfully", capitalized(level))
    })))
}

fn capitalized(level: Level) -> String {
    let s = level.as_str();
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
