use async_trait::async_trait;

use crate::domain::entities::PollResult;

#[derive(Debug)]
pub enum PollResultRepositoryError {
    DatabaseError(String),
}

impl std::fmt::Display for PollResultRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollResultRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for PollResultRepositoryError {}

#[async_trait]
pub trait PollResultRepository: Send + Sync {
    async fn save_batch(&self, results: &[PollResult]) -> Result<usize, PollResultRepositoryError>;
}
