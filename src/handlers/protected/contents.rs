use axum::{
    extract::{Multipart, Path},
    Extension,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

use crate::config;
use crate::database::models::{Content, ContentType, NewContent, NewContentPage};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::pdf::{PageRenderer, PlaceholderRenderer};
use crate::policy::{authorize, Action};
use crate::storage::ContentStore;

/// Parsed multipart upload form
#[derive(Debug, Default)]
struct UploadForm {
    title: Option<String>,
    description: Option<String>,
    kind: Option<ContentType>,
    subject_id: Option<i32>,
    original_file_name: Option<String>,
    pdf: Option<Vec<u8>>,
}

/// POST /api/contents - multipart upload of one PDF lesson or exercise
/// (teachers and admins).
///
/// The content row, its page rows, and the file on disk are created
/// together: the database transaction only commits after the file write
/// succeeds, so a failure at any point leaves neither a dangling record nor
/// an unreferenced file behind (beyond a commit failure itself, which
/// removes the file again).
pub async fn content_create(
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Content> {
    authorize(&user, Action::UploadContent)?;

    let form = parse_upload(multipart).await?;
    let (title, kind, subject_id) = require_fields(&form)?;
    let pdf = form
        .pdf
        .ok_or_else(|| ApiError::bad_request("PDF file is required"))?;

    let renderer: &dyn PageRenderer = &PlaceholderRenderer;
    let pages: Vec<NewContentPage> = renderer
        .render(&pdf)
        .await?
        .into_iter()
        .map(|page| NewContentPage {
            page_number: page.page_number,
            image_path: page.image_path,
        })
        .collect();

    let stored_name = format!("{}.pdf", Uuid::new_v4());
    let new = NewContent {
        title,
        description: form.description,
        kind,
        file_path: format!("/uploads/{}", stored_name),
        original_file_name: form
            .original_file_name
            .unwrap_or_else(|| "upload.pdf".to_string()),
        subject_id,
        uploaded_by: user.id,
    };

    let store = ContentStore::new().await?;
    let (tx, content) = store.stage_create(&new, &pages).await?;

    // Persist the file inside the transaction window; a failed write rolls
    // the record back.
    let upload_dir = PathBuf::from(&config::config().uploads.dir);
    let disk_path = upload_dir.join(&stored_name);
    if let Err(e) = write_upload(&upload_dir, &disk_path, &pdf).await {
        drop(tx);
        tracing::error!("Failed to store upload {}: {}", disk_path.display(), e);
        return Err(ApiError::internal_server_error("Failed to store uploaded file"));
    }

    if let Err(e) = tx.commit().await {
        let _ = tokio::fs::remove_file(&disk_path).await;
        return Err(crate::database::DatabaseError::from(e).into());
    }

    tracing::info!(
        "content {} ('{}') uploaded by {}",
        content.id,
        content.title,
        user.username
    );
    Ok(ApiResponse::created(content))
}

/// DELETE /api/contents/:id - owner-teacher or admin
pub async fn content_delete(
    Extension(user): Extension<AuthUser>,
    Path(content_id): Path<i32>,
) -> ApiResult<Value> {
    let store = ContentStore::new().await?;

    let content = store
        .get(content_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Content not found"))?;

    authorize(&user, Action::DeleteContent { owner: content.uploaded_by })?;

    let file_path = store.delete(content_id).await?;
    remove_stored_file(&file_path).await;

    tracing::info!("content {} deleted by {}", content_id, user.username);
    Ok(ApiResponse::success(json!({
        "message": "Content deleted successfully"
    })))
}

/// GET /api/my-contents - the caller's own uploads
pub async fn my_contents(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Content>> {
    let store = ContentStore::new().await?;
    let rows = store.list_by_uploader(user.id).await?;
    Ok(ApiResponse::success(rows))
}

async fn parse_upload(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let max_bytes = config::config().uploads.max_file_bytes;
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = Some(text_field(field).await?),
            "description" => {
                let text = text_field(field).await?;
                if !text.is_empty() {
                    form.description = Some(text);
                }
            }
            "type" => {
                form.kind = Some(match text_field(field).await?.as_str() {
                    "lesson" => ContentType::Lesson,
                    "exercise" => ContentType::Exercise,
                    other => {
                        return Err(ApiError::bad_request(format!(
                            "Unknown content type '{}'",
                            other
                        )))
                    }
                })
            }
            "subject_id" => {
                let text = text_field(field).await?;
                form.subject_id = Some(
                    text.parse()
                        .map_err(|_| ApiError::bad_request("subject_id must be an integer"))?,
                );
            }
            "pdf" => {
                if field.content_type() != Some("application/pdf") {
                    return Err(ApiError::bad_request("Only PDF files are allowed"));
                }
                form.original_file_name = field.file_name().map(str::to_string);

                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read uploaded file: {}", e))
                })?;
                if bytes.len() > max_bytes {
                    return Err(ApiError::bad_request(format!(
                        "PDF exceeds the maximum size of {} bytes",
                        max_bytes
                    )));
                }
                form.pdf = Some(bytes.to_vec());
            }
            _ => {} // unknown fields are ignored
        }
    }

    Ok(form)
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart field: {}", e)))
}

fn require_fields(form: &UploadForm) -> Result<(String, ContentType, i32), ApiError> {
    let mut field_errors = HashMap::new();
    if form.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        field_errors.insert("title".to_string(), "This field is required".to_string());
    }
    if form.kind.is_none() {
        field_errors.insert("type".to_string(), "This field is required".to_string());
    }
    if form.subject_id.is_none() {
        field_errors.insert("subject_id".to_string(), "This field is required".to_string());
    }

    match (form.title.clone(), form.kind, form.subject_id) {
        (Some(title), Some(kind), Some(subject_id)) if field_errors.is_empty() => {
            Ok((title, kind, subject_id))
        }
        _ => Err(ApiError::validation_error(
            "Missing required fields",
            Some(field_errors),
        )),
    }
}

async fn write_upload(
    dir: &PathBuf,
    path: &PathBuf,
    bytes: &[u8],
) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, bytes).await
}

/// Best-effort removal of a stored `/uploads/...` file after its record is
/// gone; a leftover file is only worth a warning.
async fn remove_stored_file(file_path: &str) {
    let Some(name) = file_path.strip_prefix("/uploads/") else {
        return;
    };
    let disk_path = PathBuf::from(&config::config().uploads.dir).join(name);
    if let Err(e) = tokio::fs::remove_file(&disk_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove {}: {}", disk_path.display(), e);
        }
    }
}
