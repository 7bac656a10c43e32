use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::domain::entities::LinkedEntity;
use crate::domain::repositories::entity_repository::EntityRepositoryError;
use crate::domain::repositories::{EntityRepository, BATCH_SIZE};
use crate::infrastructure::database::models::NewEntityModel;
use crate::infrastructure::database::schema::entities;

pub struct PostgresEntityRepository {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PostgresEntityRepository {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<ConnectionManager<PgConnection>>, EntityRepositoryError> {
        self.pool.get().map_err(|e| {
            EntityRepositoryError::DatabaseError(format!("Failed to get database connection: {}", e))
        })
    }
}

#[async_trait]
impl EntityRepository for PostgresEntityRepository {
    async fn save_batch(&self, entities: &[LinkedEntity]) -> Result<usize, EntityRepositoryError> {
        let rows: Vec<NewEntityModel> = entities.iter().map(NewEntityModel::from).collect();
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            let mut inserted = 0;
            for batch in rows.chunks(BATCH_SIZE) {
                inserted += diesel::insert_into(entities::table)
                    .values(batch)
                    .execute(&mut conn)
                    .map_err(|e| {
                        EntityRepositoryError::DatabaseError(format!("Failed to insert entities batch: {}", e))
                    })?;
            }
            Ok(inserted)
        })
        .await
        .map_err(|e| EntityRepositoryError::DatabaseError(format!("Task join error: {}", e)))?
    }
}
