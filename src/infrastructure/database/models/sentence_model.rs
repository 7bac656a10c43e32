use diesel::prelude::*;

use crate::domain::entities::Sentence;
use crate::infrastructure::database::schema::sentences;

#[derive(Debug, Insertable)]
#[diesel(table_name = sentences)]
pub struct NewSentenceModel {
    pub document: String,
    pub document_without_article: String,
    pub document_without_article_and_day: String,
    pub sentiment: String,
    pub positive_score: f64,
    pub neutral_score: f64,
    pub negative_score: f64,
}

impl From<&Sentence> for NewSentenceModel {
    fn from(sentence: &Sentence) -> Self {
        let document = sentence.document();
        Self {
            document: document.to_string(),
            document_without_article: document.without_article().to_string(),
            document_without_article_and_day: document.without_article_and_day().to_string(),
            sentiment: sentence.sentiment().to_string(),
            positive_score: sentence.scores().positive,
            neutral_score: sentence.scores().neutral,
            negative_score: sentence.scores().negative,
        }
    }
}
