use diesel::prelude::*;

use crate::domain::entities::{Article, ArticleContent};
use crate::domain::repositories::article_repository::ArticleRepositoryError;
use crate::domain::value_objects::{DocumentKey, ScorePercentages, Sentiment};
use crate::infrastructure::database::schema::articles;

#[derive(Debug, Queryable, Identifiable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(primary_key(id))]
pub struct ArticleModel {
    pub id: i32,
    pub document: String,
    pub document_without_article: String,
    pub document_without_article_and_day: String,
    pub title: String,
    pub body: String,
    pub published_at: String,
    pub author: String,
    pub sentiment: Option<String>,
    pub positive_score: Option<f64>,
    pub neutral_score: Option<f64>,
    pub negative_score: Option<f64>,
    pub positive_percentage: Option<f64>,
    pub neutral_percentage: Option<f64>,
    pub negative_percentage: Option<f64>,
    pub calculated_sentiment: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = articles)]
pub struct NewArticleModel {
    pub document: String,
    pub document_without_article: String,
    pub document_without_article_and_day: String,
    pub title: String,
    pub body: String,
    pub published_at: String,
    pub author: String,
    pub sentiment: Option<String>,
    pub positive_score: Option<f64>,
    pub neutral_score: Option<f64>,
    pub negative_score: Option<f64>,
    pub positive_percentage: Option<f64>,
    pub neutral_percentage: Option<f64>,
    pub negative_percentage: Option<f64>,
}

/// Analysis columns of one row; `None` writes NULL.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = articles)]
#[diesel(treat_none_as_null = true)]
pub struct ArticleAnalysisChangeset {
    pub sentiment: Option<String>,
    pub positive_score: Option<f64>,
    pub neutral_score: Option<f64>,
    pub negative_score: Option<f64>,
    pub positive_percentage: Option<f64>,
    pub neutral_percentage: Option<f64>,
    pub negative_percentage: Option<f64>,
}

impl From<&Article> for NewArticleModel {
    fn from(article: &Article) -> Self {
        let percentages = article.percentages();
        Self {
            document: article.document().to_string(),
            document_without_article: article.document().without_article().to_string(),
            document_without_article_and_day: article
                .document()
                .without_article_and_day()
                .to_string(),
            title: article.title().to_string(),
            body: article.body().to_string(),
            published_at: article.published_at().to_string(),
            author: article.author().to_string(),
            sentiment: article.sentiment().map(|s| s.to_string()),
            positive_score: article.positive_score(),
            neutral_score: article.neutral_score(),
            negative_score: article.negative_score(),
            positive_percentage: percentages.map(|p| p.positive),
            neutral_percentage: percentages.map(|p| p.neutral),
            negative_percentage: percentages.map(|p| p.negative),
        }
    }
}

impl From<&Article> for ArticleAnalysisChangeset {
    fn from(article: &Article) -> Self {
        let percentages = article.percentages();
        Self {
            sentiment: article.sentiment().map(|s| s.to_string()),
            positive_score: article.positive_score(),
            neutral_score: article.neutral_score(),
            negative_score: article.negative_score(),
            positive_percentage: percentages.map(|p| p.positive),
            neutral_percentage: percentages.map(|p| p.neutral),
            negative_percentage: percentages.map(|p| p.negative),
        }
    }
}

fn parse_sentiment(value: Option<String>) -> Result<Option<Sentiment>, ArticleRepositoryError> {
    value
        .map(|v| v.parse::<Sentiment>())
        .transpose()
        .map_err(ArticleRepositoryError::CorruptRecord)
}

impl TryFrom<ArticleModel> for Article {
    type Error = ArticleRepositoryError;

    fn try_from(model: ArticleModel) -> Result<Self, Self::Error> {
        let document = DocumentKey::parse(&model.document)
            .map_err(|e| ArticleRepositoryError::CorruptRecord(e.to_string()))?;

        let percentages = match (
            model.positive_percentage,
            model.neutral_percentage,
            model.negative_percentage,
        ) {
            (Some(positive), Some(neutral), Some(negative)) => Some(ScorePercentages {
                positive,
                neutral,
                negative,
            }),
            _ => None,
        };

        let content = ArticleContent {
            title: model.title,
            body: model.body,
            author: model.author,
            published_at: model.published_at,
        };

        Ok(Article::new(document, content)
            .with_id(model.id)
            .with_raw_sentiment(
                parse_sentiment(model.sentiment)?,
                model.positive_score,
                model.neutral_score,
                model.negative_score,
            )
            .with_percentages(percentages)
            .with_calculated_sentiment(parse_sentiment(model.calculated_sentiment)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::SentimentScores;

    fn model(sentiment: Option<&str>) -> ArticleModel {
        ArticleModel {
            id: 3,
            document: "politik/2022/03/01/slug".to_string(),
            document_without_article: "politik/2022/03/01".to_string(),
            document_without_article_and_day: "politik/2022/03".to_string(),
            title: "Titel".to_string(),
            body: "Inhalt".to_string(),
            published_at: "01.03.2022 - 10:00 Uhr".to_string(),
            author: "No Author".to_string(),
            sentiment: sentiment.map(str::to_string),
            positive_score: Some(0.2),
            neutral_score: Some(0.3),
            negative_score: Some(0.5),
            positive_percentage: Some(20.0),
            neutral_percentage: Some(30.0),
            negative_percentage: Some(50.0),
            calculated_sentiment: None,
        }
    }

    #[test]
    fn test_new_model_stores_key_projections() {
        let mut article = Article::new(
            DocumentKey::parse("politik/2022/03/01/slug").unwrap(),
            ArticleContent {
                title: "Titel".to_string(),
                body: "Inhalt".to_string(),
                author: "No Author".to_string(),
                published_at: "01.03.2022".to_string(),
            },
        );
        article.apply_chunk_analysis(Sentiment::Mixed, SentimentScores::new(0.2, 0.3, 0.5));

        let new_model = NewArticleModel::from(&article);

        assert_eq!(new_model.document_without_article, "politik/2022/03/01");
        assert_eq!(new_model.document_without_article_and_day, "politik/2022/03");
        assert_eq!(new_model.sentiment.as_deref(), Some("mixed"));
        assert_eq!(new_model.negative_percentage, Some(50.0));
    }

    #[test]
    fn test_model_converts_to_article() {
        let article = Article::try_from(model(Some("negative"))).unwrap();

        assert_eq!(article.id(), Some(3));
        assert_eq!(article.sentiment(), Some(Sentiment::Negative));
        assert_eq!(article.percentages().unwrap().positive, 20.0);
        assert_eq!(article.calculated_sentiment(), None);
    }

    #[test]
    fn test_unknown_sentiment_is_corrupt() {
        let result = Article::try_from(model(Some("ambivalent")));

        assert!(matches!(result, Err(ArticleRepositoryError::CorruptRecord(_))));
    }
}
