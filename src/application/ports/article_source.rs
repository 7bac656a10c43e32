use std::path::PathBuf;

#[derive(Debug)]
pub enum ArticleSourceError {
    NotFound(String),
    IoError(String),
}

impl std::fmt::Display for ArticleSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArticleSourceError::NotFound(path) => write!(f, "Article directory not found: {}", path),
            ArticleSourceError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ArticleSourceError {}

/// Lists the article files relevant for analysis.
pub trait ArticleSource: Send + Sync {
    fn article_files(&self) -> Result<Vec<PathBuf>, ArticleSourceError>;
}
