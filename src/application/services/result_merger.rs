use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::ports::text_analysis::{AnalysisOutcome, ChunkEntities, ChunkSentiment};
use crate::domain::entities::{Article, LinkedEntity, Sentence};
use crate::domain::repositories::article_repository::ArticleRepositoryError;
use crate::domain::repositories::entity_repository::EntityRepositoryError;
use crate::domain::repositories::sentence_repository::SentenceRepositoryError;
use crate::domain::repositories::{ArticleRepository, EntityRepository, SentenceRepository};

#[derive(Debug)]
pub enum MergeError {
    ArticleError(String),
    SentenceError(String),
    EntityError(String),
}

impl std::fmt::Display for MergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeError::ArticleError(msg) => write!(f, "Article merge failed: {}", msg),
            MergeError::SentenceError(msg) => write!(f, "Sentence merge failed: {}", msg),
            MergeError::EntityError(msg) => write!(f, "Entity merge failed: {}", msg),
        }
    }
}

impl std::error::Error for MergeError {}

impl From<ArticleRepositoryError> for MergeError {
    fn from(error: ArticleRepositoryError) -> Self {
        MergeError::ArticleError(error.to_string())
    }
}

impl From<SentenceRepositoryError> for MergeError {
    fn from(error: SentenceRepositoryError) -> Self {
        MergeError::SentenceError(error.to_string())
    }
}

impl From<EntityRepositoryError> for MergeError {
    fn from(error: EntityRepositoryError) -> Self {
        MergeError::EntityError(error.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeSummary {
    pub rows_updated: usize,
    pub rows_inserted: usize,
    pub sentences_saved: usize,
    pub entities_saved: usize,
}

impl MergeSummary {
    pub fn absorb(&mut self, other: &MergeSummary) {
        self.rows_updated += other.rows_updated;
        self.rows_inserted += other.rows_inserted;
        self.sentences_saved += other.sentences_saved;
        self.entities_saved += other.entities_saved;
    }
}

/// Reconciles analysis results with the article they were requested for.
///
/// Chunk 0 updates the ingested row in place; every later chunk becomes a sibling
/// row with the same document key. The decision follows the chunk index carried by
/// each result, so results may arrive in any order.
pub struct ResultMerger {
    article_repository: Arc<dyn ArticleRepository>,
    sentence_repository: Arc<dyn SentenceRepository>,
    entity_repository: Arc<dyn EntityRepository>,
}

impl ResultMerger {
    pub fn new(
        article_repository: Arc<dyn ArticleRepository>,
        sentence_repository: Arc<dyn SentenceRepository>,
        entity_repository: Arc<dyn EntityRepository>,
    ) -> Self {
        Self {
            article_repository,
            sentence_repository,
            entity_repository,
        }
    }

    /// Persists sentiment and entity results independently. Both halves are attempted;
    /// the first persistence error is returned after that.
    pub async fn merge(
        &self,
        article: &Article,
        outcome: AnalysisOutcome,
    ) -> Result<MergeSummary, MergeError> {
        let mut summary = MergeSummary::default();
        let mut first_error = None;

        match outcome.sentiments {
            Ok(chunks) => {
                if let Err(e) = self.merge_sentiments(article, chunks, &mut summary).await {
                    first_error.get_or_insert(e);
                }
            }
            Err(e) => warn!(
                article_id = ?article.id(),
                document = %article.document(),
                error = %e,
                "Sentiment analysis returned no result"
            ),
        }

        match outcome.entities {
            Ok(chunks) => {
                if let Err(e) = self.merge_entities(article, chunks, &mut summary).await {
                    first_error.get_or_insert(e);
                }
            }
            Err(e) => warn!(
                article_id = ?article.id(),
                document = %article.document(),
                error = %e,
                "Entity linking returned no result"
            ),
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(summary),
        }
    }

    async fn merge_sentiments(
        &self,
        article: &Article,
        chunks: Vec<ChunkSentiment>,
        summary: &mut MergeSummary,
    ) -> Result<(), MergeError> {
        for chunk in chunks {
            self.merge_chunk_sentiment(article, chunk, summary).await?;
        }
        Ok(())
    }

    async fn merge_chunk_sentiment(
        &self,
        article: &Article,
        chunk: ChunkSentiment,
        summary: &mut MergeSummary,
    ) -> Result<(), MergeError> {
        if chunk.index.is_first() {
            let mut analyzed = article.clone();
            analyzed.apply_chunk_analysis(chunk.sentiment, chunk.scores);
            self.article_repository.update_analysis(&analyzed).await?;
            summary.rows_updated += 1;
        } else {
            let sibling = article.sibling_for_chunk(chunk.sentiment, chunk.scores);
            let id = self.article_repository.save(&sibling).await?;
            summary.rows_inserted += 1;
            debug!(
                document = %article.document(),
                chunk = %chunk.index,
                id,
                "Stored article row for later chunk"
            );
        }

        let sentences: Vec<Sentence> = chunk
            .sentences
            .iter()
            .map(|sentence| {
                Sentence::new(article.document().clone(), sentence.sentiment, sentence.scores)
            })
            .collect();

        if !sentences.is_empty() {
            summary.sentences_saved += self.sentence_repository.save_batch(&sentences).await?;
        }

        Ok(())
    }

    async fn merge_entities(
        &self,
        article: &Article,
        chunks: Vec<ChunkEntities>,
        summary: &mut MergeSummary,
    ) -> Result<(), MergeError> {
        for chunk in chunks {
            let entities: Vec<LinkedEntity> = chunk
                .matches
                .into_iter()
                .map(|entity| {
                    LinkedEntity::new(
                        article.document().clone(),
                        entity.text,
                        entity.confidence_score,
                    )
                })
                .collect();

            if !entities.is_empty() {
                summary.entities_saved += self.entity_repository.save_batch(&entities).await?;
            }
        }
        Ok(())
    }
}
