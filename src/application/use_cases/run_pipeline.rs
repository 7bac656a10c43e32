use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::application::services::sentiment_resolver::SentimentResolutionError;
use crate::application::services::{
    AnalysisDispatcher, AnalysisReport, ResolutionSummary, SentimentResolver,
};
use crate::application::use_cases::import_poll_results::ImportPollResultsUseCase;
use crate::application::use_cases::ingest_articles::{
    IngestArticlesError, IngestArticlesUseCase, IngestionReport,
};
use crate::domain::repositories::ArticleRepository;
use crate::domain::repositories::article_repository::ArticleRepositoryError;

#[derive(Debug)]
pub enum PipelineError {
    IngestionError(String),
    RepositoryError(String),
    ResolutionError(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::IngestionError(msg) => write!(f, "Ingestion failed: {}", msg),
            PipelineError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            PipelineError::ResolutionError(msg) => write!(f, "Resolution failed: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<IngestArticlesError> for PipelineError {
    fn from(error: IngestArticlesError) -> Self {
        PipelineError::IngestionError(error.to_string())
    }
}

impl From<ArticleRepositoryError> for PipelineError {
    fn from(error: ArticleRepositoryError) -> Self {
        PipelineError::RepositoryError(error.to_string())
    }
}

impl From<SentimentResolutionError> for PipelineError {
    fn from(error: SentimentResolutionError) -> Self {
        PipelineError::ResolutionError(error.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub ingestion: IngestionReport,
    pub analysis: AnalysisReport,
    pub resolution: ResolutionSummary,
    /// `None` when no poll file was configured or its import failed.
    pub poll_results: Option<usize>,
}

/// Ingest, analyse, wait for every merge, resolve, then import polls.
pub struct RunPipelineUseCase {
    ingest_articles: Arc<IngestArticlesUseCase>,
    article_repository: Arc<dyn ArticleRepository>,
    analysis_dispatcher: Arc<AnalysisDispatcher>,
    sentiment_resolver: Arc<SentimentResolver>,
    import_poll_results: Arc<ImportPollResultsUseCase>,
    polls_csv: Option<PathBuf>,
}

impl RunPipelineUseCase {
    pub fn new(
        ingest_articles: Arc<IngestArticlesUseCase>,
        article_repository: Arc<dyn ArticleRepository>,
        analysis_dispatcher: Arc<AnalysisDispatcher>,
        sentiment_resolver: Arc<SentimentResolver>,
        import_poll_results: Arc<ImportPollResultsUseCase>,
        polls_csv: Option<PathBuf>,
    ) -> Self {
        Self {
            ingest_articles,
            article_repository,
            analysis_dispatcher,
            sentiment_resolver,
            import_poll_results,
            polls_csv,
        }
    }

    pub async fn execute(&self) -> Result<PipelineReport, PipelineError> {
        let ingestion = self.ingest_articles.execute().await?;

        // Rows written by an earlier run already carry a raw sentiment.
        let pending: Vec<_> = self
            .article_repository
            .find_all()
            .await?
            .into_iter()
            .filter(|article| !article.is_analyzed())
            .collect();

        let analysis = self.analysis_dispatcher.dispatch(pending).wait().await;
        let resolution = self.sentiment_resolver.resolve().await?;

        let poll_results = match &self.polls_csv {
            Some(path) => match self.import_poll_results.execute(path).await {
                Ok(stored) => Some(stored),
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Poll import failed");
                    None
                }
            },
            None => None,
        };

        info!("Pipeline finished");
        Ok(PipelineReport {
            ingestion,
            analysis,
            resolution,
            poll_results,
        })
    }
}
