pub mod article_model;
pub mod entity_model;
pub mod poll_result_model;
pub mod sentence_model;

pub use article_model::*;
pub use entity_model::*;
pub use poll_result_model::*;
pub use sentence_model::*;
