use async_trait::async_trait;

use crate::domain::entities::LinkedEntity;

#[derive(Debug)]
pub enum EntityRepositoryError {
    DatabaseError(String),
}

impl std::fmt::Display for EntityRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for EntityRepositoryError {}

#[async_trait]
pub trait EntityRepository: Send + Sync {
    async fn save_batch(&self, entities: &[LinkedEntity]) -> Result<usize, EntityRepositoryError>;
}
