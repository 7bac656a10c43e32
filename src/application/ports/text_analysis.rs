use async_trait::async_trait;

use crate::domain::value_objects::{ChunkIndex, DocumentKey, Sentiment, SentimentScores};

#[derive(Debug, Clone, PartialEq)]
pub enum TextAnalysisError {
    NetworkError(String),
    ApiError(String),
    ParseError(String),
    JobFailed(String),
    TaskFailed(String),
    Timeout(String),
}

impl std::fmt::Display for TextAnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextAnalysisError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            TextAnalysisError::ApiError(msg) => write!(f, "API error: {}", msg),
            TextAnalysisError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            TextAnalysisError::JobFailed(msg) => write!(f, "Analysis job failed: {}", msg),
            TextAnalysisError::TaskFailed(msg) => write!(f, "Analysis task failed: {}", msg),
            TextAnalysisError::Timeout(msg) => write!(f, "Analysis timed out: {}", msg),
        }
    }
}

impl std::error::Error for TextAnalysisError {}

#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub index: ChunkIndex,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub document: DocumentKey,
    pub chunks: Vec<TextChunk>,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentenceSentiment {
    pub sentiment: Sentiment,
    pub scores: SentimentScores,
}

/// Document-level sentiment of one chunk plus its sentence breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSentiment {
    pub index: ChunkIndex,
    pub sentiment: Sentiment,
    pub scores: SentimentScores,
    pub sentences: Vec<SentenceSentiment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityMatch {
    pub text: String,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkEntities {
    pub index: ChunkIndex,
    pub matches: Vec<EntityMatch>,
}

/// Sentiment and entity results succeed or fail independently of each other.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub sentiments: Result<Vec<ChunkSentiment>, TextAnalysisError>,
    pub entities: Result<Vec<ChunkEntities>, TextAnalysisError>,
}

#[async_trait]
pub trait TextAnalysisService: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, TextAnalysisError>;

    /// Per-chunk character limit accepted by the service.
    fn max_chunk_chars(&self) -> usize;
}
