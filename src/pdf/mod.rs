//! Page-rendering collaborator.
//!
//! Turning an uploaded PDF into per-page images is an external concern; the
//! upload flow only depends on this trait. The default implementation emits a
//! single placeholder page so every content row has at least one page to show.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("document is empty")]
    EmptyDocument,

    #[error("renderer failed: {0}")]
    Failed(String),
}

/// One rendered page image, 1-based numbering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub page_number: i32,
    pub image_path: String,
}

#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Render the given PDF bytes into an ordered sequence of page images
    async fn render(&self, pdf: &[u8]) -> Result<Vec<RenderedPage>, RenderError>;
}

/// Stand-in renderer: one fixed placeholder image per document
pub struct PlaceholderRenderer;

#[async_trait]
impl PageRenderer for PlaceholderRenderer {
    async fn render(&self, pdf: &[u8]) -> Result<Vec<RenderedPage>, RenderError> {
        if pdf.is_empty() {
            return Err(RenderError::EmptyDocument);
        }

        Ok(vec![RenderedPage {
            page_number: 1,
            image_path: "/uploads/placeholder-page-1.jpg".to_string(),
        }])
    }
}
