use diesel::prelude::*;

use crate::domain::entities::LinkedEntity;
use crate::infrastructure::database::schema::entities;

#[derive(Debug, Insertable)]
#[diesel(table_name = entities)]
pub struct NewEntityModel {
    pub document: String,
    pub document_without_article: String,
    pub document_without_article_and_day: String,
    pub entity: String,
    pub confidence_score: f64,
}

impl From<&LinkedEntity> for NewEntityModel {
    fn from(entity: &LinkedEntity) -> Self {
        let document = entity.document();
        Self {
            document: document.to_string(),
            document_without_article: document.without_article().to_string(),
            document_without_article_and_day: document.without_article_and_day().to_string(),
            entity: entity.text().to_string(),
            confidence_score: entity.confidence_score(),
        }
    }
}
