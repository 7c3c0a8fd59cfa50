use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Content, ContentPage, NewContent, NewContentPage};

/// Content and content-page accessor. Creation and deletion touch both
/// tables, so both run inside a single transaction.
pub struct ContentStore {
    pool: PgPool,
}

impl ContentStore {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn list_by_subject(&self, subject_id: i32) -> Result<Vec<Content>, DatabaseError> {
        let rows = sqlx::query_as::<_, Content>(
            "SELECT * FROM contents WHERE subject_id = $1 ORDER BY created_at DESC",
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_by_uploader(&self, user_id: Uuid) -> Result<Vec<Content>, DatabaseError> {
        let rows = sqlx::query_as::<_, Content>(
            "SELECT * FROM contents WHERE uploaded_by = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Content>, DatabaseError> {
        let row = sqlx::query_as::<_, Content>("SELECT * FROM contents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn pages(&self, content_id: i32) -> Result<Vec<ContentPage>, DatabaseError> {
        let rows = sqlx::query_as::<_, ContentPage>(
            "SELECT * FROM content_pages WHERE content_id = $1 ORDER BY page_number ASC",
        )
        .bind(content_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a content row and its pages inside one transaction, returning
    /// the open transaction so the caller can order further work (persisting
    /// the uploaded file) before committing. Dropping the transaction rolls
    /// everything back.
    pub async fn stage_create(
        &self,
        new: &NewContent,
        pages: &[NewContentPage],
    ) -> Result<(Transaction<'static, Postgres>, Content), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let content = sqlx::query_as::<_, Content>(
            "INSERT INTO contents \
             (title, description, kind, file_path, original_file_name, subject_id, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.kind)
        .bind(&new.file_path)
        .bind(&new.original_file_name)
        .bind(new.subject_id)
        .bind(new.uploaded_by)
        .fetch_one(&mut *tx)
        .await?;

        for page in pages {
            sqlx::query(
                "INSERT INTO content_pages (content_id, page_number, image_path) \
                 VALUES ($1, $2, $3)",
            )
            .bind(content.id)
            .bind(page.page_number)
            .bind(&page.image_path)
            .execute(&mut *tx)
            .await?;
        }

        Ok((tx, content))
    }

    /// Delete a content row and its pages in one transaction. Returns the
    /// stored file path so the caller can remove the file afterwards.
    pub async fn delete(&self, id: i32) -> Result<String, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let file_path: Option<(String,)> =
            sqlx::query_as("SELECT file_path FROM contents WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let (file_path,) = file_path
            .ok_or_else(|| DatabaseError::NotFound(format!("content {} not found", id)))?;

        // Pages first, then the content row
        sqlx::query("DELETE FROM content_pages WHERE content_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(file_path)
    }
}
