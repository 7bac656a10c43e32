pub mod article;
pub mod linked_entity;
pub mod poll_result;
pub mod sentence;

pub use article::{Article, ArticleContent};
pub use linked_entity::LinkedEntity;
pub use poll_result::PollResult;
pub use sentence::Sentence;
