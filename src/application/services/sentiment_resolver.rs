use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::repositories::article_repository::ArticleRepositoryError;
use crate::domain::repositories::{ArticleFilter, ArticleRepository, SentimentCount};
use crate::domain::value_objects::{DocumentKey, Sentiment};

#[derive(Debug)]
pub enum SentimentResolutionError {
    RepositoryError(String),
}

impl std::fmt::Display for SentimentResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentResolutionError::RepositoryError(msg) => {
                write!(f, "Sentiment resolution failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for SentimentResolutionError {}

impl From<ArticleRepositoryError> for SentimentResolutionError {
    fn from(error: ArticleRepositoryError) -> Self {
        SentimentResolutionError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionSummary {
    pub mixed_documents: usize,
    pub rows_voted: usize,
    pub rows_copied: usize,
}

/// Ties, including a document without positive or negative sentences, resolve to neutral.
pub fn majority_vote(positive: i64, negative: i64) -> Sentiment {
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// One verdict per mixed document; labels without a count row count as zero.
pub fn majority_verdicts(
    documents: &[DocumentKey],
    counts: &[SentimentCount],
) -> BTreeMap<DocumentKey, Sentiment> {
    let mut tallies: BTreeMap<DocumentKey, (i64, i64)> = documents
        .iter()
        .map(|document| (document.clone(), (0, 0)))
        .collect();

    for count in counts {
        let tally = tallies.entry(count.document.clone()).or_default();
        match count.sentiment {
            Sentiment::Positive => tally.0 += count.count,
            Sentiment::Negative => tally.1 += count.count,
            Sentiment::Neutral | Sentiment::Mixed => {}
        }
    }

    tallies
        .into_iter()
        .map(|(document, (positive, negative))| (document, majority_vote(positive, negative)))
        .collect()
}

/// Writes the authoritative `calculated_sentiment` of every article row.
///
/// Documents with a mixed chunk are decided by the sentence majority and the verdict
/// is written to all of their rows. Afterwards rows with a definite raw label take that
/// label over, so a definite chunk of a mixed document keeps its own label.
pub struct SentimentResolver {
    article_repository: Arc<dyn ArticleRepository>,
}

impl SentimentResolver {
    pub fn new(article_repository: Arc<dyn ArticleRepository>) -> Self {
        Self { article_repository }
    }

    pub async fn resolve(&self) -> Result<ResolutionSummary, SentimentResolutionError> {
        let mut summary = ResolutionSummary::default();

        let mixed_documents = self
            .article_repository
            .find_documents_by_sentiment(Sentiment::Mixed)
            .await?;
        let counts = self
            .article_repository
            .count_sentence_sentiments_of_mixed_documents()
            .await?;
        let verdicts = majority_verdicts(&mixed_documents, &counts);
        summary.mixed_documents = verdicts.len();

        for (document, verdict) in verdicts {
            debug!(document = %document, verdict = %verdict, "Resolved mixed document");
            summary.rows_voted += self
                .article_repository
                .update_calculated_sentiment(ArticleFilter::Document(document), verdict)
                .await?;
        }

        for label in Sentiment::DEFINITE {
            summary.rows_copied += self
                .article_repository
                .update_calculated_sentiment(ArticleFilter::RawSentiment(label), label)
                .await?;
        }

        info!(
            mixed_documents = summary.mixed_documents,
            rows_voted = summary.rows_voted,
            rows_copied = summary.rows_copied,
            "Sentiment resolution finished"
        );
        Ok(summary)
    }
}
