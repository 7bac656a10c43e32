use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::ports::article_source::ArticleSourceError;
use crate::application::ports::{ArticleExtractor, ArticleSource};
use crate::domain::entities::Article;
use crate::domain::repositories::ArticleRepository;
use crate::domain::repositories::article_repository::ArticleRepositoryError;
use crate::domain::value_objects::DocumentKey;

#[derive(Debug)]
pub enum IngestArticlesError {
    SourceError(String),
    RepositoryError(String),
    WorkerError(String),
}

impl std::fmt::Display for IngestArticlesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestArticlesError::SourceError(msg) => write!(f, "Article source error: {}", msg),
            IngestArticlesError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            IngestArticlesError::WorkerError(msg) => write!(f, "Parsing worker failed: {}", msg),
        }
    }
}

impl std::error::Error for IngestArticlesError {}

impl From<ArticleSourceError> for IngestArticlesError {
    fn from(error: ArticleSourceError) -> Self {
        IngestArticlesError::SourceError(error.to_string())
    }
}

impl From<ArticleRepositoryError> for IngestArticlesError {
    fn from(error: ArticleRepositoryError) -> Self {
        IngestArticlesError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionReport {
    pub files_found: usize,
    pub articles_stored: usize,
    pub files_skipped: usize,
}

pub struct IngestArticlesUseCase {
    article_source: Arc<dyn ArticleSource>,
    article_extractor: Arc<dyn ArticleExtractor>,
    article_repository: Arc<dyn ArticleRepository>,
    root_marker: String,
}

impl IngestArticlesUseCase {
    pub fn new(
        article_source: Arc<dyn ArticleSource>,
        article_extractor: Arc<dyn ArticleExtractor>,
        article_repository: Arc<dyn ArticleRepository>,
        root_marker: impl Into<String>,
    ) -> Self {
        Self {
            article_source,
            article_extractor,
            article_repository,
            root_marker: root_marker.into(),
        }
    }

    /// Parses every article file in parallel and batch-inserts the results.
    pub async fn execute(&self) -> Result<IngestionReport, IngestArticlesError> {
        let files = self.article_source.article_files()?;
        let files_found = files.len();
        info!(files = files_found, "Found article files");

        let extractor = Arc::clone(&self.article_extractor);
        let root_marker = self.root_marker.clone();
        let articles = tokio::task::spawn_blocking(move || {
            parse_articles(extractor.as_ref(), &root_marker, files)
        })
        .await
        .map_err(|e| IngestArticlesError::WorkerError(e.to_string()))?;

        let articles_stored = self.article_repository.save_batch(&articles).await?;
        let report = IngestionReport {
            files_found,
            articles_stored,
            files_skipped: files_found - articles.len(),
        };

        info!(
            files_found = report.files_found,
            articles_stored = report.articles_stored,
            files_skipped = report.files_skipped,
            "Article ingestion finished"
        );
        Ok(report)
    }
}

fn parse_articles(
    extractor: &dyn ArticleExtractor,
    root_marker: &str,
    files: Vec<PathBuf>,
) -> Vec<Article> {
    files
        .par_iter()
        .filter_map(|path| {
            let document = match DocumentKey::derive(path, root_marker) {
                Ok(document) => document,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping article file");
                    return None;
                }
            };

            match extractor.extract(path) {
                Ok(content) => Some(Article::new(document, content)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping article file");
                    None
                }
            }
        })
        .collect()
}
