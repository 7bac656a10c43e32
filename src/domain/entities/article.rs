use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DocumentKey, ScorePercentages, Sentiment, SentimentScores};

/// Content extracted from one article file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleContent {
    pub title: String,
    pub body: String,
    pub author: String,
    pub published_at: String,
}

/// One stored article row. A document analysed in several chunks owns one row per
/// chunk, all sharing the same [`DocumentKey`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    id: Option<i32>,
    document: DocumentKey,
    content: ArticleContent,
    sentiment: Option<Sentiment>,
    positive_score: Option<f64>,
    neutral_score: Option<f64>,
    negative_score: Option<f64>,
    percentages: Option<ScorePercentages>,
    calculated_sentiment: Option<Sentiment>,
}

impl Article {
    pub fn new(document: DocumentKey, content: ArticleContent) -> Self {
        Self {
            id: None,
            document,
            content,
            sentiment: None,
            positive_score: None,
            neutral_score: None,
            negative_score: None,
            percentages: None,
            calculated_sentiment: None,
        }
    }

    // Restoring persisted state
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_raw_sentiment(
        mut self,
        sentiment: Option<Sentiment>,
        positive_score: Option<f64>,
        neutral_score: Option<f64>,
        negative_score: Option<f64>,
    ) -> Self {
        self.sentiment = sentiment;
        self.positive_score = positive_score;
        self.neutral_score = neutral_score;
        self.negative_score = negative_score;
        self
    }

    pub fn with_percentages(mut self, percentages: Option<ScorePercentages>) -> Self {
        self.percentages = percentages;
        self
    }

    pub fn with_calculated_sentiment(mut self, calculated_sentiment: Option<Sentiment>) -> Self {
        self.calculated_sentiment = calculated_sentiment;
        self
    }

    // Getters
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn document(&self) -> &DocumentKey {
        &self.document
    }

    pub fn content(&self) -> &ArticleContent {
        &self.content
    }

    pub fn title(&self) -> &str {
        &self.content.title
    }

    pub fn body(&self) -> &str {
        &self.content.body
    }

    pub fn author(&self) -> &str {
        &self.content.author
    }

    pub fn published_at(&self) -> &str {
        &self.content.published_at
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment
    }

    pub fn positive_score(&self) -> Option<f64> {
        self.positive_score
    }

    pub fn neutral_score(&self) -> Option<f64> {
        self.neutral_score
    }

    pub fn negative_score(&self) -> Option<f64> {
        self.negative_score
    }

    pub fn percentages(&self) -> Option<ScorePercentages> {
        self.percentages
    }

    pub fn calculated_sentiment(&self) -> Option<Sentiment> {
        self.calculated_sentiment
    }

    // Business logic methods
    pub fn is_analyzed(&self) -> bool {
        self.sentiment.is_some()
    }

    /// Records the result of one analysed chunk and recomputes the percentages.
    pub fn apply_chunk_analysis(&mut self, sentiment: Sentiment, scores: SentimentScores) {
        self.sentiment = Some(sentiment);
        self.positive_score = Some(scores.positive);
        self.neutral_score = Some(scores.neutral);
        self.negative_score = Some(scores.negative);
        self.percentages = Some(ScorePercentages::from_raw(
            self.positive_score,
            self.neutral_score,
            self.negative_score,
        ));
    }

    /// A new, unsaved row for a later chunk of the same document.
    pub fn sibling_for_chunk(&self, sentiment: Sentiment, scores: SentimentScores) -> Self {
        let mut sibling = Article::new(self.document.clone(), self.content.clone());
        sibling.apply_chunk_analysis(sentiment, scores);
        sibling
    }
}
