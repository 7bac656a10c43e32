use async_trait::async_trait;

use crate::domain::entities::Sentence;

#[derive(Debug)]
pub enum SentenceRepositoryError {
    DatabaseError(String),
}

impl std::fmt::Display for SentenceRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentenceRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for SentenceRepositoryError {}

#[async_trait]
pub trait SentenceRepository: Send + Sync {
    async fn save_batch(&self, sentences: &[Sentence]) -> Result<usize, SentenceRepositoryError>;
}
