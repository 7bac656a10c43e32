pub mod postgres_article_repository;
pub mod postgres_entity_repository;
pub mod postgres_poll_result_repository;
pub mod postgres_sentence_repository;

pub use postgres_article_repository::PostgresArticleRepository;
pub use postgres_entity_repository::PostgresEntityRepository;
pub use postgres_poll_result_repository::PostgresPollResultRepository;
pub use postgres_sentence_repository::PostgresSentenceRepository;
