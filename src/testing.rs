//! In-memory doubles for repositories and the analysis service.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::application::ports::text_analysis::{
    AnalysisOutcome, AnalysisRequest, ChunkEntities, ChunkSentiment, EntityMatch,
    SentenceSentiment, TextAnalysisError, TextAnalysisService,
};
use crate::domain::entities::{Article, ArticleContent, LinkedEntity, PollResult, Sentence};
use crate::domain::repositories::article_repository::ArticleRepositoryError;
use crate::domain::repositories::entity_repository::EntityRepositoryError;
use crate::domain::repositories::poll_result_repository::PollResultRepositoryError;
use crate::domain::repositories::sentence_repository::SentenceRepositoryError;
use crate::domain::repositories::{
    ArticleFilter, ArticleRepository, EntityRepository, PollResultRepository, SentenceRepository,
    SentimentCount,
};
use crate::domain::value_objects::{ChunkIndex, DocumentKey, Sentiment, SentimentScores};

pub fn document(key: &str) -> DocumentKey {
    DocumentKey::parse(key).unwrap()
}

pub fn content(body: &str) -> ArticleContent {
    ArticleContent {
        title: "Titel".to_string(),
        body: body.to_string(),
        author: "Redaktion".to_string(),
        published_at: "01.03.2022 - 10:00 Uhr".to_string(),
    }
}

pub fn scores(positive: f64, neutral: f64, negative: f64) -> SentimentScores {
    SentimentScores::new(positive, neutral, negative)
}

pub fn sentences(labels: &[Sentiment]) -> Vec<SentenceSentiment> {
    labels
        .iter()
        .map(|label| SentenceSentiment {
            sentiment: *label,
            scores: scores(0.4, 0.3, 0.3),
        })
        .collect()
}

pub fn chunk_sentiment(index: u32, sentiment: Sentiment, labels: &[Sentiment]) -> ChunkSentiment {
    ChunkSentiment {
        index: ChunkIndex::new(index),
        sentiment,
        scores: scores(0.2, 0.3, 0.5),
        sentences: sentences(labels),
    }
}

pub fn chunk_entities(index: u32, texts: &[&str]) -> ChunkEntities {
    ChunkEntities {
        index: ChunkIndex::new(index),
        matches: texts
            .iter()
            .map(|text| EntityMatch {
                text: text.to_string(),
                confidence_score: 0.8,
            })
            .collect(),
    }
}

#[derive(Default)]
pub struct InMemoryArticleRepository {
    rows: Mutex<Vec<Article>>,
    sentences: Option<std::sync::Arc<InMemorySentenceRepository>>,
    fail_saves: bool,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares sentence storage so the mixed-document join can be evaluated.
    pub fn joined_with(sentences: std::sync::Arc<InMemorySentenceRepository>) -> Self {
        Self {
            sentences: Some(sentences),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<Article> {
        self.rows.lock().unwrap().clone()
    }

    pub fn rows_for(&self, key: &str) -> Vec<Article> {
        self.rows()
            .into_iter()
            .filter(|article| article.document().as_str() == key)
            .collect()
    }

    fn insert(rows: &mut Vec<Article>, article: &Article) -> i32 {
        let id = rows.len() as i32 + 1;
        rows.push(article.clone().with_id(id));
        id
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn save(&self, article: &Article) -> Result<i32, ArticleRepositoryError> {
        if self.fail_saves {
            return Err(ArticleRepositoryError::DatabaseError("insert refused".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        Ok(Self::insert(&mut rows, article))
    }

    async fn save_batch(&self, articles: &[Article]) -> Result<usize, ArticleRepositoryError> {
        if self.fail_saves {
            return Err(ArticleRepositoryError::DatabaseError("insert refused".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        for article in articles {
            Self::insert(&mut rows, article);
        }
        Ok(articles.len())
    }

    async fn update_analysis(&self, article: &Article) -> Result<(), ArticleRepositoryError> {
        let id = article
            .id()
            .ok_or_else(|| ArticleRepositoryError::MissingId(article.document().to_string()))?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id() == Some(id))
            .ok_or_else(|| ArticleRepositoryError::DatabaseError(format!("no row {}", id)))?;

        let updated = row
            .clone()
            .with_raw_sentiment(
                article.sentiment(),
                article.positive_score(),
                article.neutral_score(),
                article.negative_score(),
            )
            .with_percentages(article.percentages());
        *row = updated;
        Ok(())
    }

    async fn update_calculated_sentiment(
        &self,
        filter: ArticleFilter,
        sentiment: Sentiment,
    ) -> Result<usize, ArticleRepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let mut updated = 0;
        for row in rows.iter_mut() {
            let matches = match &filter {
                ArticleFilter::Document(document) => row.document() == document,
                ArticleFilter::RawSentiment(raw) => row.sentiment() == Some(*raw),
            };
            if matches {
                *row = row.clone().with_calculated_sentiment(Some(sentiment));
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn find_all(&self) -> Result<Vec<Article>, ArticleRepositoryError> {
        Ok(self.rows())
    }

    async fn find_documents_by_sentiment(
        &self,
        sentiment: Sentiment,
    ) -> Result<Vec<DocumentKey>, ArticleRepositoryError> {
        let mut documents: Vec<DocumentKey> = self
            .rows()
            .into_iter()
            .filter(|row| row.sentiment() == Some(sentiment))
            .map(|row| row.document().clone())
            .collect();
        documents.sort();
        documents.dedup();
        Ok(documents)
    }

    async fn count_sentence_sentiments_of_mixed_documents(
        &self,
    ) -> Result<Vec<SentimentCount>, ArticleRepositoryError> {
        let Some(sentences) = &self.sentences else {
            return Ok(Vec::new());
        };
        let rows = self.rows();

        // Inner join semantics: each sentence counts once per mixed row of its document.
        let mut counts: BTreeMap<(DocumentKey, Sentiment), i64> = BTreeMap::new();
        for sentence in sentences.stored() {
            let mixed_rows = rows
                .iter()
                .filter(|row| row.document() == sentence.document())
                .filter(|row| row.sentiment() == Some(Sentiment::Mixed))
                .count() as i64;
            if mixed_rows > 0 {
                *counts
                    .entry((sentence.document().clone(), sentence.sentiment()))
                    .or_default() += mixed_rows;
            }
        }

        Ok(counts
            .into_iter()
            .map(|((document, sentiment), count)| SentimentCount {
                document,
                sentiment,
                count,
            })
            .collect())
    }
}

#[derive(Default)]
pub struct InMemorySentenceRepository {
    rows: Mutex<Vec<Sentence>>,
}

impl InMemorySentenceRepository {
    pub fn stored(&self) -> Vec<Sentence> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SentenceRepository for InMemorySentenceRepository {
    async fn save_batch(&self, sentences: &[Sentence]) -> Result<usize, SentenceRepositoryError> {
        self.rows.lock().unwrap().extend_from_slice(sentences);
        Ok(sentences.len())
    }
}

#[derive(Default)]
pub struct InMemoryEntityRepository {
    rows: Mutex<Vec<LinkedEntity>>,
    fail_saves: bool,
}

impl InMemoryEntityRepository {
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Vec<LinkedEntity> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntityRepository for InMemoryEntityRepository {
    async fn save_batch(&self, entities: &[LinkedEntity]) -> Result<usize, EntityRepositoryError> {
        if self.fail_saves {
            return Err(EntityRepositoryError::DatabaseError("insert refused".to_string()));
        }
        self.rows.lock().unwrap().extend_from_slice(entities);
        Ok(entities.len())
    }
}

#[derive(Default)]
pub struct InMemoryPollResultRepository {
    rows: Mutex<Vec<PollResult>>,
}

impl InMemoryPollResultRepository {
    pub fn stored(&self) -> Vec<PollResult> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl PollResultRepository for InMemoryPollResultRepository {
    async fn save_batch(&self, results: &[PollResult]) -> Result<usize, PollResultRepositoryError> {
        self.rows.lock().unwrap().extend_from_slice(results);
        Ok(results.len())
    }
}

type Script = Box<dyn Fn(&AnalysisRequest) -> Result<AnalysisOutcome, TextAnalysisError> + Send + Sync>;

/// Answers every request with the outcome produced by a test-provided closure.
pub struct ScriptedAnalysisService {
    script: Script,
    requests: Mutex<Vec<AnalysisRequest>>,
    max_chunk_chars: usize,
}

impl ScriptedAnalysisService {
    pub fn new(
        script: impl Fn(&AnalysisRequest) -> Result<AnalysisOutcome, TextAnalysisError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            requests: Mutex::new(Vec::new()),
            max_chunk_chars: 5_120,
        }
    }

    pub fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextAnalysisService for ScriptedAnalysisService {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, TextAnalysisError> {
        self.requests.lock().unwrap().push(request.clone());
        // Yield so concurrently dispatched analyses interleave.
        tokio::task::yield_now().await;
        (self.script)(&request)
    }

    fn max_chunk_chars(&self) -> usize {
        self.max_chunk_chars
    }
}
