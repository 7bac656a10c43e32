pub mod article_repository;
pub mod entity_repository;
pub mod poll_result_repository;
pub mod sentence_repository;

pub use article_repository::{ArticleFilter, ArticleRepository, SentimentCount};
pub use entity_repository::EntityRepository;
pub use poll_result_repository::PollResultRepository;
pub use sentence_repository::SentenceRepository;

/// Upper bound of rows per insert statement.
pub const BATCH_SIZE: usize = 1000;
