use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::domain::entities::Sentence;
use crate::domain::repositories::sentence_repository::SentenceRepositoryError;
use crate::domain::repositories::{SentenceRepository, BATCH_SIZE};
use crate::infrastructure::database::models::NewSentenceModel;
use crate::infrastructure::database::schema::sentences;

pub struct PostgresSentenceRepository {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PostgresSentenceRepository {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<ConnectionManager<PgConnection>>, SentenceRepositoryError> {
        self.pool.get().map_err(|e| {
            SentenceRepositoryError::DatabaseError(format!("Failed to get database connection: {}", e))
        })
    }
}

#[async_trait]
impl SentenceRepository for PostgresSentenceRepository {
    async fn save_batch(&self, sentences: &[Sentence]) -> Result<usize, SentenceRepositoryError> {
        let rows: Vec<NewSentenceModel> = sentences.iter().map(NewSentenceModel::from).collect();
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            let mut inserted = 0;
            for batch in rows.chunks(BATCH_SIZE) {
                inserted += diesel::insert_into(sentences::table)
                    .values(batch)
                    .execute(&mut conn)
                    .map_err(|e| {
                        SentenceRepositoryError::DatabaseError(format!("Failed to insert sentences batch: {}", e))
                    })?;
            }
            Ok(inserted)
        })
        .await
        .map_err(|e| SentenceRepositoryError::DatabaseError(format!("Task join error: {}", e)))?
    }
}
