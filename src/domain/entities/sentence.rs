use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DocumentKey, Sentiment, SentimentScores};

/// Sentence-level sentiment, correlated with its article rows by document key only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    document: DocumentKey,
    sentiment: Sentiment,
    scores: SentimentScores,
}

impl Sentence {
    pub fn new(document: DocumentKey, sentiment: Sentiment, scores: SentimentScores) -> Self {
        Self {
            document,
            sentiment,
            scores,
        }
    }

    pub fn document(&self) -> &DocumentKey {
        &self.document
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn scores(&self) -> &SentimentScores {
        &self.scores
    }
}
