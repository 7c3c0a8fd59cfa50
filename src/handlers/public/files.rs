use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::PathBuf;

use crate::config;
use crate::error::ApiError;

/// GET /uploads/:filename - serve a previously uploaded file
pub async fn serve_upload(Path(filename): Path<String>) -> Result<Response, ApiError> {
    // Uploaded names are generated UUIDs; anything that could escape the
    // uploads directory is rejected outright.
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(ApiError::bad_request("Invalid file name"));
    }

    let path = PathBuf::from(&config::config().uploads.dir).join(&filename);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found("File not found"));
        }
        Err(e) => {
            tracing::error!("Failed to read upload {}: {}", path.display(), e);
            return Err(ApiError::internal_server_error("Failed to read file"));
        }
    };

    let content_type = content_type_for(&filename);
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("a1b2.pdf"), "application/pdf");
        assert_eq!(content_type_for("page-1.jpg"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
