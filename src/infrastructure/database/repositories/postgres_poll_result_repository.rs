use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::domain::entities::PollResult;
use crate::domain::repositories::poll_result_repository::PollResultRepositoryError;
use crate::domain::repositories::{PollResultRepository, BATCH_SIZE};
use crate::infrastructure::database::models::NewPollResultModel;
use crate::infrastructure::database::schema::poll_results;

pub struct PostgresPollResultRepository {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PostgresPollResultRepository {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<ConnectionManager<PgConnection>>, PollResultRepositoryError> {
        self.pool.get().map_err(|e| {
            PollResultRepositoryError::DatabaseError(format!("Failed to get database connection: {}", e))
        })
    }
}

#[async_trait]
impl PollResultRepository for PostgresPollResultRepository {
    async fn save_batch(&self, results: &[PollResult]) -> Result<usize, PollResultRepositoryError> {
        let rows: Vec<NewPollResultModel> = results.iter().map(NewPollResultModel::from).collect();
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            let mut inserted = 0;
            for batch in rows.chunks(BATCH_SIZE) {
                inserted += diesel::insert_into(poll_results::table)
                    .values(batch)
                    .execute(&mut conn)
                    .map_err(|e| {
                        PollResultRepositoryError::DatabaseError(format!("Failed to insert poll_results batch: {}", e))
                    })?;
            }
            Ok(inserted)
        })
        .await
        .map_err(|e| PollResultRepositoryError::DatabaseError(format!("Task join error: {}", e)))?
    }
}
