use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Lesson,
    Exercise,
}

/// A lesson or exercise document attached to a subject
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Content {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub kind: ContentType,
    pub file_path: String,
    pub original_file_name: String,
    pub subject_id: i32,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page image rendered from a content's source PDF, 1-based numbering
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentPage {
    pub id: i32,
    pub content_id: i32,
    pub page_number: i32,
    pub image_path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContent {
    pub title: String,
    pub description: Option<String>,
    pub kind: ContentType,
    pub file_path: String,
    pub original_file_name: String,
    pub subject_id: i32,
    pub uploaded_by: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewContentPage {
    pub page_number: i32,
    pub image_path: String,
}
