use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::domain::entities::Article;
use crate::domain::repositories::article_repository::ArticleRepositoryError;
use crate::domain::repositories::{ArticleFilter, ArticleRepository, BATCH_SIZE, SentimentCount};
use crate::domain::value_objects::{DocumentKey, Sentiment};
use crate::infrastructure::database::models::{
    ArticleAnalysisChangeset, ArticleModel, NewArticleModel,
};
use crate::infrastructure::database::schema::{articles, sentences};

pub struct PostgresArticleRepository {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PostgresArticleRepository {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<ConnectionManager<PgConnection>>, ArticleRepositoryError>
    {
        self.pool.get().map_err(|e| {
            ArticleRepositoryError::DatabaseError(format!("Failed to get database connection: {}", e))
        })
    }
}

fn join_error(e: tokio::task::JoinError) -> ArticleRepositoryError {
    ArticleRepositoryError::DatabaseError(format!("Task join error: {}", e))
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn save(&self, article: &Article) -> Result<i32, ArticleRepositoryError> {
        let new_article = NewArticleModel::from(article);
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(articles::table)
                .values(&new_article)
                .returning(articles::id)
                .get_result::<i32>(&mut conn)
                .map_err(|e| {
                    ArticleRepositoryError::DatabaseError(format!("Failed to save article: {}", e))
                })
        })
        .await
        .map_err(join_error)?
    }

    async fn save_batch(&self, articles: &[Article]) -> Result<usize, ArticleRepositoryError> {
        let new_articles: Vec<NewArticleModel> = articles.iter().map(NewArticleModel::from).collect();
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            let mut inserted = 0;
            for batch in new_articles.chunks(BATCH_SIZE) {
                inserted += diesel::insert_into(articles::table)
                    .values(batch)
                    .execute(&mut conn)
                    .map_err(|e| {
                        ArticleRepositoryError::DatabaseError(format!(
                            "Failed to insert article batch after {} rows: {}",
                            inserted, e
                        ))
                    })?;
            }
            Ok(inserted)
        })
        .await
        .map_err(join_error)?
    }

    async fn update_analysis(&self, article: &Article) -> Result<(), ArticleRepositoryError> {
        let article_id = article
            .id()
            .ok_or_else(|| ArticleRepositoryError::MissingId(article.document().to_string()))?;
        let changeset = ArticleAnalysisChangeset::from(article);
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::update(articles::table.filter(articles::id.eq(article_id)))
                .set(&changeset)
                .execute(&mut conn)
                .map_err(|e| {
                    ArticleRepositoryError::DatabaseError(format!("Failed to update article: {}", e))
                })
        })
        .await
        .map_err(join_error)??;

        Ok(())
    }

    async fn update_calculated_sentiment(
        &self,
        filter: ArticleFilter,
        sentiment: Sentiment,
    ) -> Result<usize, ArticleRepositoryError> {
        let value = sentiment.to_string();
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            let updated = match filter {
                ArticleFilter::Document(document) => {
                    diesel::update(articles::table.filter(articles::document.eq(document.to_string())))
                        .set(articles::calculated_sentiment.eq(Some(value)))
                        .execute(&mut conn)
                }
                ArticleFilter::RawSentiment(raw) => {
                    diesel::update(articles::table.filter(articles::sentiment.eq(raw.to_string())))
                        .set(articles::calculated_sentiment.eq(Some(value)))
                        .execute(&mut conn)
                }
            };
            updated.map_err(|e| {
                ArticleRepositoryError::DatabaseError(format!(
                    "Failed to update calculated sentiment: {}",
                    e
                ))
            })
        })
        .await
        .map_err(join_error)?
    }

    async fn find_all(&self) -> Result<Vec<Article>, ArticleRepositoryError> {
        let mut conn = self.get_connection()?;

        let article_models = tokio::task::spawn_blocking(move || {
            articles::table
                .order(articles::id.asc())
                .load::<ArticleModel>(&mut conn)
                .map_err(|e| {
                    ArticleRepositoryError::DatabaseError(format!("Failed to load articles: {}", e))
                })
        })
        .await
        .map_err(join_error)??;

        article_models.into_iter().map(Article::try_from).collect()
    }

    async fn find_documents_by_sentiment(
        &self,
        sentiment: Sentiment,
    ) -> Result<Vec<DocumentKey>, ArticleRepositoryError> {
        let value = sentiment.to_string();
        let mut conn = self.get_connection()?;

        let documents = tokio::task::spawn_blocking(move || {
            articles::table
                .filter(articles::sentiment.eq(value))
                .select(articles::document)
                .distinct()
                .order(articles::document.asc())
                .load::<String>(&mut conn)
                .map_err(|e| {
                    ArticleRepositoryError::DatabaseError(format!("Failed to load documents: {}", e))
                })
        })
        .await
        .map_err(join_error)??;

        documents
            .iter()
            .map(|document| {
                DocumentKey::parse(document)
                    .map_err(|e| ArticleRepositoryError::CorruptRecord(e.to_string()))
            })
            .collect()
    }

    async fn count_sentence_sentiments_of_mixed_documents(
        &self,
    ) -> Result<Vec<SentimentCount>, ArticleRepositoryError> {
        let mut conn = self.get_connection()?;

        let rows = tokio::task::spawn_blocking(move || {
            articles::table
                .inner_join(sentences::table.on(sentences::document.eq(articles::document)))
                .filter(articles::sentiment.eq(Sentiment::Mixed.to_string()))
                .group_by((sentences::document, sentences::sentiment))
                .select((
                    sentences::document,
                    sentences::sentiment,
                    diesel::dsl::count_star(),
                ))
                .load::<(String, String, i64)>(&mut conn)
                .map_err(|e| {
                    ArticleRepositoryError::DatabaseError(format!(
                        "Failed to count sentence sentiments: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(join_error)??;

        rows.into_iter()
            .map(|(document, sentiment, count)| {
                Ok(SentimentCount {
                    document: DocumentKey::parse(&document)
                        .map_err(|e| ArticleRepositoryError::CorruptRecord(e.to_string()))?,
                    sentiment: sentiment
                        .parse()
                        .map_err(ArticleRepositoryError::CorruptRecord)?,
                    count,
                })
            })
            .collect()
    }
}
