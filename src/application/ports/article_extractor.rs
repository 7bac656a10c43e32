use std::path::Path;

use crate::domain::entities::ArticleContent;

#[derive(Debug)]
pub enum ArticleExtractionError {
    IoError(String),
    ExtractionFailed(String),
}

impl std::fmt::Display for ArticleExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArticleExtractionError::IoError(msg) => write!(f, "IO error: {}", msg),
            ArticleExtractionError::ExtractionFailed(msg) => write!(f, "Extraction failed: {}", msg),
        }
    }
}

impl std::error::Error for ArticleExtractionError {}

/// Turns one article file into structured content.
///
/// Extraction is synchronous so it can run on a CPU worker pool, one file per task.
pub trait ArticleExtractor: Send + Sync {
    fn extract(&self, file_path: &Path) -> Result<ArticleContent, ArticleExtractionError>;

    fn extract_from_markup(&self, markup: &str) -> Result<ArticleContent, ArticleExtractionError>;
}
