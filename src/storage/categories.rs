use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::CategoryRow;
use crate::hierarchy::Level;

/// Hierarchy CRUD over the five category tables. Table and parent-column
/// names come from [`Level`], never from request strings.
pub struct CategoryStore {
    pool: PgPool,
}

impl CategoryStore {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// List rows of `level` under `parent_id`, ordered ascending by name.
    /// `parent_id` is ignored for the city level.
    pub async fn list(
        &self,
        level: Level,
        parent_id: Option<i32>,
    ) -> Result<Vec<CategoryRow>, DatabaseError> {
        let rows = match level.parent_column() {
            None => {
                sqlx::query_as::<_, CategoryRow>(
                    "SELECT id, name, slug, NULL::integer AS parent_id, created_at \
                     FROM \"cities\" ORDER BY name ASC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            Some(col) => {
                let parent_id = parent_id.ok_or_else(required_parent)?;
                let sql = format!(
                    "SELECT id, name, slug, {col} AS parent_id, created_at \
                     FROM \"{table}\" WHERE {col} = $1 ORDER BY name ASC",
                    col = col,
                    table = level.table(),
                );
                sqlx::query_as::<_, CategoryRow>(&sql)
                    .bind(parent_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    /// Insert a node at `level`. Non-city levels require a parent id; the
    /// foreign key rejects parents that do not exist.
    pub async fn create(
        &self,
        level: Level,
        name: &str,
        slug: &str,
        parent_id: Option<i32>,
    ) -> Result<CategoryRow, DatabaseError> {
        let row = match level.parent_column() {
            None => {
                sqlx::query_as::<_, CategoryRow>(
                    "INSERT INTO \"cities\" (name, slug) VALUES ($1, $2) \
                     RETURNING id, name, slug, NULL::integer AS parent_id, created_at",
                )
                .bind(name)
                .bind(slug)
                .fetch_one(&self.pool)
                .await?
            }
            Some(col) => {
                let parent_id = parent_id.ok_or_else(required_parent)?;
                let sql = format!(
                    "INSERT INTO \"{table}\" (name, slug, {col}) VALUES ($1, $2, $3) \
                     RETURNING id, name, slug, {col} AS parent_id, created_at",
                    col = col,
                    table = level.table(),
                );
                sqlx::query_as::<_, CategoryRow>(&sql)
                    .bind(name)
                    .bind(slug)
                    .bind(parent_id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(row)
    }

    pub async fn delete(&self, level: Level, id: i32) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", level.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "{} {} not found",
                level, id
            )));
        }

        Ok(())
    }

    /// Resolve a readable path segment to a row: slug is unique within the
    /// parent scope (globally for cities).
    pub async fn find_by_slug(
        &self,
        level: Level,
        parent_id: Option<i32>,
        slug: &str,
    ) -> Result<Option<CategoryRow>, DatabaseError> {
        let row = match level.parent_column() {
            None => {
                sqlx::query_as::<_, CategoryRow>(
                    "SELECT id, name, slug, NULL::integer AS parent_id, created_at \
                     FROM \"cities\" WHERE slug = $1",
                )
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?
            }
            Some(col) => {
                let parent_id = parent_id.ok_or_else(required_parent)?;
                let sql = format!(
                    "SELECT id, name, slug, {col} AS parent_id, created_at \
                     FROM \"{table}\" WHERE {col} = $1 AND slug = $2",
                    col = col,
                    table = level.table(),
                );
                sqlx::query_as::<_, CategoryRow>(&sql)
                    .bind(parent_id)
                    .bind(slug)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        Ok(row)
    }
}

fn required_parent() -> DatabaseError {
    DatabaseError::NotFound("Parent category not found".to_string())
}

/// URL-safe identifier: lowercase alphanumerics and hyphens, no leading or
/// trailing hyphen.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 255
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
