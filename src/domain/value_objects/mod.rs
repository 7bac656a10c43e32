pub mod chunk_index;
pub mod document_key;
pub mod sentiment;
pub mod sentiment_scores;

pub use chunk_index::ChunkIndex;
pub use document_key::{DocumentKey, DocumentKeyError};
pub use sentiment::Sentiment;
pub use sentiment_scores::{ScorePercentages, SentimentScores};
