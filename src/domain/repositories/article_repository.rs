use async_trait::async_trait;

use crate::domain::entities::Article;
use crate::domain::value_objects::{DocumentKey, Sentiment};

#[derive(Debug)]
pub enum ArticleRepositoryError {
    MissingId(String),
    CorruptRecord(String),
    DatabaseError(String),
}

impl std::fmt::Display for ArticleRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArticleRepositoryError::MissingId(document) => {
                write!(f, "Article {} has not been saved yet", document)
            }
            ArticleRepositoryError::CorruptRecord(msg) => write!(f, "Corrupt article record: {}", msg),
            ArticleRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for ArticleRepositoryError {}

/// Selects the article rows touched by a conditional update.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticleFilter {
    /// Every chunk row of one document.
    Document(DocumentKey),
    /// Every row whose raw chunk sentiment equals the label.
    RawSentiment(Sentiment),
}

/// Number of sentences with one label inside one document.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentCount {
    pub document: DocumentKey,
    pub sentiment: Sentiment,
    pub count: i64,
}

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Inserts one row and returns its generated id.
    async fn save(&self, article: &Article) -> Result<i32, ArticleRepositoryError>;

    /// Inserts in batches of [`super::BATCH_SIZE`]; a failing batch leaves earlier ones committed.
    async fn save_batch(&self, articles: &[Article]) -> Result<usize, ArticleRepositoryError>;

    /// Overwrites sentiment, raw scores and percentages of the row with the article's id.
    async fn update_analysis(&self, article: &Article) -> Result<(), ArticleRepositoryError>;

    async fn update_calculated_sentiment(
        &self,
        filter: ArticleFilter,
        sentiment: Sentiment,
    ) -> Result<usize, ArticleRepositoryError>;

    async fn find_all(&self) -> Result<Vec<Article>, ArticleRepositoryError>;

    /// Distinct documents owning at least one row with the given raw sentiment.
    async fn find_documents_by_sentiment(
        &self,
        sentiment: Sentiment,
    ) -> Result<Vec<DocumentKey>, ArticleRepositoryError>;

    /// Sentence label counts per document, joined against article rows labelled mixed.
    async fn count_sentence_sentiments_of_mixed_documents(
        &self,
    ) -> Result<Vec<SentimentCount>, ArticleRepositoryError>;
}
