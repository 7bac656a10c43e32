use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::application::ports::TextAnalysisService;
use crate::application::ports::text_analysis::{AnalysisRequest, TextAnalysisError};
use crate::application::services::chunk_planner::ChunkPlanner;
use crate::application::services::result_merger::{MergeError, MergeSummary, ResultMerger};
use crate::domain::entities::Article;
use crate::domain::value_objects::DocumentKey;

#[derive(Debug)]
pub enum AnalysisTaskError {
    AnalysisFailed(TextAnalysisError),
    MergeFailed(MergeError),
    Aborted(String),
}

impl std::fmt::Display for AnalysisTaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisTaskError::AnalysisFailed(e) => write!(f, "Analysis failed: {}", e),
            AnalysisTaskError::MergeFailed(e) => write!(f, "Merging results failed: {}", e),
            AnalysisTaskError::Aborted(msg) => write!(f, "Analysis task aborted: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisTaskError {}

impl From<TextAnalysisError> for AnalysisTaskError {
    fn from(error: TextAnalysisError) -> Self {
        AnalysisTaskError::AnalysisFailed(error)
    }
}

impl From<MergeError> for AnalysisTaskError {
    fn from(error: MergeError) -> Self {
        AnalysisTaskError::MergeFailed(error)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub analyzed: usize,
    pub failed: usize,
    pub totals: MergeSummary,
}

struct PendingAnalysis {
    article_id: Option<i32>,
    document: DocumentKey,
    handle: JoinHandle<Result<MergeSummary, AnalysisTaskError>>,
}

/// Handle over every analysis started by one [`AnalysisDispatcher::dispatch`] call.
#[must_use = "analyses keep running in the background until the batch is awaited"]
pub struct AnalysisBatch {
    pending: Vec<PendingAnalysis>,
}

impl AnalysisBatch {
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Resolves once every analysis and its merge have finished, successfully or not.
    pub async fn wait(self) -> AnalysisReport {
        let (identities, handles): (Vec<_>, Vec<_>) = self
            .pending
            .into_iter()
            .map(|p| ((p.article_id, p.document), p.handle))
            .unzip();

        let mut report = AnalysisReport::default();
        for ((article_id, document), joined) in identities.into_iter().zip(join_all(handles).await) {
            let result = joined
                .map_err(|e| AnalysisTaskError::Aborted(e.to_string()))
                .and_then(|result| result);

            match result {
                Ok(summary) => {
                    report.analyzed += 1;
                    report.totals.absorb(&summary);
                }
                Err(e) => {
                    report.failed += 1;
                    error!(
                        article_id = ?article_id,
                        document = %document,
                        error = %e,
                        "Article analysis failed"
                    );
                }
            }
        }

        info!(
            analyzed = report.analyzed,
            failed = report.failed,
            rows_updated = report.totals.rows_updated,
            rows_inserted = report.totals.rows_inserted,
            sentences = report.totals.sentences_saved,
            entities = report.totals.entities_saved,
            "Analysis batch finished"
        );
        report
    }
}

/// Issues one analysis request per article without waiting for earlier ones.
pub struct AnalysisDispatcher {
    analysis_service: Arc<dyn TextAnalysisService>,
    result_merger: Arc<ResultMerger>,
    chunk_planner: ChunkPlanner,
    language: String,
    in_flight_limit: Option<Arc<Semaphore>>,
}

impl AnalysisDispatcher {
    pub fn new(
        analysis_service: Arc<dyn TextAnalysisService>,
        result_merger: Arc<ResultMerger>,
        language: impl Into<String>,
    ) -> Self {
        let chunk_planner = ChunkPlanner::new(analysis_service.max_chunk_chars());
        Self {
            analysis_service,
            result_merger,
            chunk_planner,
            language: language.into(),
            in_flight_limit: None,
        }
    }

    /// Caps concurrent analysis calls; `0` leaves them unbounded.
    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        self.in_flight_limit = (limit > 0).then(|| Arc::new(Semaphore::new(limit)));
        self
    }

    pub fn dispatch(&self, articles: Vec<Article>) -> AnalysisBatch {
        let pending = articles
            .into_iter()
            .map(|article| PendingAnalysis {
                article_id: article.id(),
                document: article.document().clone(),
                handle: self.spawn_analysis(article),
            })
            .collect::<Vec<_>>();

        info!(articles = pending.len(), "Dispatched article analyses");
        AnalysisBatch { pending }
    }

    fn spawn_analysis(
        &self,
        article: Article,
    ) -> JoinHandle<Result<MergeSummary, AnalysisTaskError>> {
        let request = AnalysisRequest {
            document: article.document().clone(),
            chunks: self.chunk_planner.plan(article.body()),
            language: self.language.clone(),
        };
        let analysis_service = Arc::clone(&self.analysis_service);
        let result_merger = Arc::clone(&self.result_merger);
        let in_flight_limit = self.in_flight_limit.clone();

        tokio::spawn(async move {
            let _permit = match in_flight_limit {
                Some(semaphore) => Some(
                    semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| AnalysisTaskError::Aborted(e.to_string()))?,
                ),
                None => None,
            };

            let outcome = analysis_service.analyze(request).await?;
            let summary = result_merger.merge(&article, outcome).await?;
            Ok::<_, AnalysisTaskError>(summary)
        })
    }
}
