use serde::{Deserialize, Serialize};

use crate::domain::value_objects::DocumentKey;

/// One linked-entity match found in an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedEntity {
    document: DocumentKey,
    text: String,
    confidence_score: f64,
}

impl LinkedEntity {
    pub fn new(document: DocumentKey, text: String, confidence_score: f64) -> Self {
        Self {
            document,
            text,
            confidence_score,
        }
    }

    pub fn document(&self) -> &DocumentKey {
        &self.document
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn confidence_score(&self) -> f64 {
        self.confidence_score
    }
}
