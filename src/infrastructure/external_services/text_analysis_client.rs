use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::application::ports::text_analysis::{
    AnalysisOutcome, AnalysisRequest, ChunkEntities, ChunkSentiment, EntityMatch,
    SentenceSentiment, TextAnalysisError, TextAnalysisService,
};
use crate::application::services::chunk_planner::MAX_CHUNK_CHARS;
use crate::domain::value_objects::{ChunkIndex, Sentiment, SentimentScores};

const JOBS_PATH: &str = "language/analyze-text/jobs";
const API_VERSION: &str = "2023-04-01";
const SENTIMENT_TASK: &str = "sentiment";
const ENTITY_TASK: &str = "entities";

// Wire format of the analyze-text jobs API.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSubmission {
    pub display_name: String,
    pub analysis_input: AnalysisInput,
    pub tasks: Vec<TaskDefinition>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisInput {
    pub documents: Vec<InputDocument>,
}

#[derive(Debug, Serialize)]
pub struct InputDocument {
    pub id: String,
    pub language: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind")]
pub enum TaskDefinition {
    SentimentAnalysis {
        #[serde(rename = "taskName")]
        task_name: String,
        parameters: SentimentParameters,
    },
    EntityLinking {
        #[serde(rename = "taskName")]
        task_name: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentParameters {
    pub opinion_mining: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobStatus {
    NotStarted,
    Running,
    Cancelling,
    Succeeded,
    PartiallyCompleted,
    PartiallySucceeded,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded
                | JobStatus::PartiallyCompleted
                | JobStatus::PartiallySucceeded
                | JobStatus::Failed
                | JobStatus::Cancelled
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct JobState {
    pub status: JobStatus,
    #[serde(default)]
    pub errors: Vec<ApiError>,
    #[serde(default)]
    pub tasks: TaskList,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub items: Vec<TaskResult>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub enum TaskResult {
    #[serde(rename = "SentimentAnalysisLROResults")]
    Sentiment {
        status: JobStatus,
        results: Option<SentimentResults>,
    },
    #[serde(rename = "EntityLinkingLROResults")]
    EntityLinking {
        status: JobStatus,
        results: Option<EntityResults>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentError {
    pub id: String,
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct SentimentResults {
    pub documents: Vec<SentimentDocument>,
    #[serde(default)]
    pub errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentDocument {
    pub id: String,
    pub sentiment: Sentiment,
    pub confidence_scores: ConfidenceScores,
    #[serde(default)]
    pub sentences: Vec<SentenceResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceResult {
    pub sentiment: Sentiment,
    pub confidence_scores: ConfidenceScores,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ConfidenceScores {
    pub positive: f64,
    #[serde(default)]
    pub neutral: f64,
    pub negative: f64,
}

impl From<ConfidenceScores> for SentimentScores {
    fn from(scores: ConfidenceScores) -> Self {
        SentimentScores::new(scores.positive, scores.neutral, scores.negative)
    }
}

#[derive(Debug, Deserialize)]
pub struct EntityResults {
    pub documents: Vec<EntityDocument>,
    #[serde(default)]
    pub errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
pub struct EntityDocument {
    pub id: String,
    #[serde(default)]
    pub entities: Vec<LinkedEntityResult>,
}

#[derive(Debug, Deserialize)]
pub struct LinkedEntityResult {
    #[serde(default)]
    pub matches: Vec<EntityMatchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMatchResult {
    pub text: String,
    pub confidence_score: f64,
}

#[derive(Debug, Clone)]
pub struct TextAnalysisClientConfig {
    pub endpoint: String,
    pub api_key: String,
    pub poll_interval_ms: u64,
    pub max_polls: u32,
    pub timeout_secs: u64,
}

impl Default for TextAnalysisClientConfig {
    fn default() -> Self {
        let endpoint = env::var("TEXT_ANALYSIS_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        let api_key = env::var("TEXT_ANALYSIS_KEY").unwrap_or_default();

        Self {
            endpoint,
            api_key,
            poll_interval_ms: env_or("TEXT_ANALYSIS_POLL_INTERVAL_MS", 1_000),
            max_polls: env_or("TEXT_ANALYSIS_MAX_POLLS", 120),
            timeout_secs: env_or("TEXT_ANALYSIS_TIMEOUT_SECS", 30),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug)]
pub enum TextAnalysisClientError {
    RequestError(String),
    ApiError(String),
    ParseError(String),
    JobFailed(String),
    Timeout(String),
}

#[derive(Debug, Clone)]
pub struct TextAnalysisClient {
    client: Client,
    config: TextAnalysisClientConfig,
}

impl TextAnalysisClient {
    pub fn new(config: TextAnalysisClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(TextAnalysisClientConfig::default())
    }

    /// Submits one job and polls it until it reaches a terminal state.
    pub async fn run_job(&self, submission: &JobSubmission) -> Result<JobState, TextAnalysisClientError> {
        let operation_location = self.submit_job(submission).await?;
        debug!(operation = %operation_location, "Analysis job submitted");

        for _ in 0..self.config.max_polls {
            let state = self.fetch_job(&operation_location).await?;

            if state.status.is_terminal() {
                return match state.status {
                    JobStatus::Failed | JobStatus::Cancelled if state.tasks.items.is_empty() => {
                        Err(TextAnalysisClientError::JobFailed(describe_errors(&state.errors)))
                    }
                    _ => Ok(state),
                };
            }

            tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms)).await;
        }

        Err(TextAnalysisClientError::Timeout(format!(
            "job {} not finished after {} polls",
            operation_location, self.config.max_polls
        )))
    }

    async fn submit_job(&self, submission: &JobSubmission) -> Result<String, TextAnalysisClientError> {
        let url = jobs_url(&self.config.endpoint)?;

        let response = self
            .client
            .post(url)
            .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(submission)
            .send()
            .await
            .map_err(|e| TextAnalysisClientError::RequestError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TextAnalysisClientError::ApiError(format!("{}: {}", status, body)));
        }

        response
            .headers()
            .get("operation-location")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                TextAnalysisClientError::ParseError("missing operation-location header".to_string())
            })
    }

    async fn fetch_job(&self, operation_location: &str) -> Result<JobState, TextAnalysisClientError> {
        let response = self
            .client
            .get(operation_location)
            .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| TextAnalysisClientError::RequestError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TextAnalysisClientError::ApiError(format!("{}: {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TextAnalysisClientError::RequestError(e.without_url().to_string()))?;

        serde_json::from_str::<JobState>(&body)
            .map_err(|e| TextAnalysisClientError::ParseError(format!("job state: {}", e)))
    }
}

fn jobs_url(endpoint: &str) -> Result<Url, TextAnalysisClientError> {
    let base = format!("{}/", endpoint.trim_end_matches('/'));
    let mut url = Url::parse(&base)
        .and_then(|base| base.join(JOBS_PATH))
        .map_err(|e| TextAnalysisClientError::RequestError(format!("Invalid endpoint: {}", e)))?;
    url.query_pairs_mut().append_pair("api-version", API_VERSION);
    Ok(url)
}

fn describe_errors(errors: &[ApiError]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{}: {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn build_submission(request: &AnalysisRequest) -> JobSubmission {
    JobSubmission {
        display_name: request.document.to_string(),
        analysis_input: AnalysisInput {
            documents: request
                .chunks
                .iter()
                .map(|chunk| InputDocument {
                    id: chunk.index.to_string(),
                    language: request.language.clone(),
                    text: chunk.text.clone(),
                })
                .collect(),
        },
        tasks: vec![
            TaskDefinition::SentimentAnalysis {
                task_name: SENTIMENT_TASK.to_string(),
                parameters: SentimentParameters {
                    opinion_mining: true,
                },
            },
            TaskDefinition::EntityLinking {
                task_name: ENTITY_TASK.to_string(),
            },
        ],
    }
}

fn chunk_index(id: &str) -> Option<ChunkIndex> {
    match id.parse::<ChunkIndex>() {
        Ok(index) => Some(index),
        Err(e) => {
            warn!(id, error = %e, "Ignoring result with unknown document id");
            None
        }
    }
}

fn log_document_errors(task: &str, errors: &[DocumentError]) {
    for error in errors {
        warn!(
            task,
            chunk = %error.id,
            code = %error.error.code,
            message = %error.error.message,
            "Chunk rejected by text analysis"
        );
    }
}

fn map_sentiments(
    status: JobStatus,
    results: Option<SentimentResults>,
) -> Result<Vec<ChunkSentiment>, TextAnalysisError> {
    let results = match (status, results) {
        (JobStatus::Succeeded, Some(results)) => results,
        (status, _) => {
            return Err(TextAnalysisError::TaskFailed(format!(
                "sentiment analysis ended with status {:?}",
                status
            )));
        }
    };
    log_document_errors(SENTIMENT_TASK, &results.errors);

    Ok(results
        .documents
        .into_iter()
        .filter_map(|document| {
            Some(ChunkSentiment {
                index: chunk_index(&document.id)?,
                sentiment: document.sentiment,
                scores: document.confidence_scores.into(),
                sentences: document
                    .sentences
                    .into_iter()
                    .map(|sentence| SentenceSentiment {
                        sentiment: sentence.sentiment,
                        scores: sentence.confidence_scores.into(),
                    })
                    .collect(),
            })
        })
        .collect())
}

fn map_entities(
    status: JobStatus,
    results: Option<EntityResults>,
) -> Result<Vec<ChunkEntities>, TextAnalysisError> {
    let results = match (status, results) {
        (JobStatus::Succeeded, Some(results)) => results,
        (status, _) => {
            return Err(TextAnalysisError::TaskFailed(format!(
                "entity linking ended with status {:?}",
                status
            )));
        }
    };
    log_document_errors(ENTITY_TASK, &results.errors);

    Ok(results
        .documents
        .into_iter()
        .filter_map(|document| {
            Some(ChunkEntities {
                index: chunk_index(&document.id)?,
                matches: document
                    .entities
                    .into_iter()
                    .flat_map(|entity| entity.matches)
                    .map(|m| EntityMatch {
                        text: m.text,
                        confidence_score: m.confidence_score,
                    })
                    .collect(),
            })
        })
        .collect())
}

/// Splits a finished job into independent sentiment and entity results.
pub fn map_job_state(state: JobState) -> AnalysisOutcome {
    let mut sentiments = Err(TextAnalysisError::TaskFailed(
        "sentiment analysis result missing".to_string(),
    ));
    let mut entities = Err(TextAnalysisError::TaskFailed(
        "entity linking result missing".to_string(),
    ));

    for task in state.tasks.items {
        match task {
            TaskResult::Sentiment { status, results } => {
                sentiments = map_sentiments(status, results);
            }
            TaskResult::EntityLinking { status, results } => {
                entities = map_entities(status, results);
            }
            TaskResult::Other => {}
        }
    }

    AnalysisOutcome {
        sentiments,
        entities,
    }
}

// Adapter to implement the TextAnalysisService trait
pub struct AzureTextAnalysisService {
    client: TextAnalysisClient,
}

impl AzureTextAnalysisService {
    pub fn new(client: TextAnalysisClient) -> Self {
        Self { client }
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        let client = TextAnalysisClient::from_env()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TextAnalysisService for AzureTextAnalysisService {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, TextAnalysisError> {
        let submission = build_submission(&request);

        let state = self.client.run_job(&submission).await.map_err(|e| match e {
            TextAnalysisClientError::RequestError(msg) => TextAnalysisError::NetworkError(msg),
            TextAnalysisClientError::ApiError(msg) => TextAnalysisError::ApiError(msg),
            TextAnalysisClientError::ParseError(msg) => TextAnalysisError::ParseError(msg),
            TextAnalysisClientError::JobFailed(msg) => TextAnalysisError::JobFailed(msg),
            TextAnalysisClientError::Timeout(msg) => TextAnalysisError::Timeout(msg),
        })?;

        Ok(map_job_state(state))
    }

    fn max_chunk_chars(&self) -> usize {
        MAX_CHUNK_CHARS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::text_analysis::TextChunk;
    use crate::domain::value_objects::DocumentKey;

    const FINISHED_JOB: &str = r#"{
        "jobId": "5d1e2c7a",
        "status": "succeeded",
        "errors": [],
        "tasks": {
            "completed": 2, "failed": 0, "inProgress": 0, "total": 2,
            "items": [
                {
                    "kind": "EntityLinkingLROResults",
                    "taskName": "entities",
                    "lastUpdateDateTime": "2022-03-01T10:00:00Z",
                    "status": "succeeded",
                    "results": {
                        "documents": [
                            {
                                "id": "1",
                                "entities": [
                                    {
                                        "name": "Berlin",
                                        "matches": [
                                            {"text": "Berlin", "offset": 0, "length": 6, "confidenceScore": 0.91},
                                            {"text": "Hauptstadt", "offset": 20, "length": 10, "confidenceScore": 0.42}
                                        ],
                                        "language": "de",
                                        "url": "https://de.wikipedia.org/wiki/Berlin",
                                        "dataSource": "Wikipedia"
                                    }
                                ],
                                "warnings": []
                            }
                        ],
                        "errors": [],
                        "modelVersion": "2021-06-01"
                    }
                },
                {
                    "kind": "SentimentAnalysisLROResults",
                    "taskName": "sentiment",
                    "lastUpdateDateTime": "2022-03-01T10:00:00Z",
                    "status": "succeeded",
                    "results": {
                        "documents": [
                            {
                                "id": "1",
                                "sentiment": "positive",
                                "confidenceScores": {"positive": 0.9, "neutral": 0.08, "negative": 0.02},
                                "sentences": [
                                    {
                                        "sentiment": "positive",
                                        "confidenceScores": {"positive": 0.9, "neutral": 0.08, "negative": 0.02},
                                        "offset": 0, "length": 12, "text": "Gute Zeiten."
                                    }
                                ],
                                "warnings": []
                            },
                            {
                                "id": "0",
                                "sentiment": "mixed",
                                "confidenceScores": {"positive": 0.4, "neutral": 0.2, "negative": 0.4},
                                "sentences": [],
                                "warnings": []
                            }
                        ],
                        "errors": [
                            {"id": "2", "error": {"code": "InvalidArgument", "message": "Document text is empty."}}
                        ],
                        "modelVersion": "2022-11-01"
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn test_submission_uses_chunk_indices_as_ids() {
        let request = AnalysisRequest {
            document: DocumentKey::parse("politik/2022/03/01/slug").unwrap(),
            chunks: vec![
                TextChunk {
                    index: ChunkIndex::new(0),
                    text: "Erster Teil".to_string(),
                },
                TextChunk {
                    index: ChunkIndex::new(1),
                    text: "Zweiter Teil".to_string(),
                },
            ],
            language: "de".to_string(),
        };

        let json = serde_json::to_value(build_submission(&request)).unwrap();

        assert_eq!(json["analysisInput"]["documents"][1]["id"], "1");
        assert_eq!(json["analysisInput"]["documents"][0]["language"], "de");
        assert_eq!(json["tasks"][0]["kind"], "SentimentAnalysis");
        assert_eq!(json["tasks"][0]["parameters"]["opinionMining"], true);
        assert_eq!(json["tasks"][1]["kind"], "EntityLinking");
    }

    #[test]
    fn test_finished_job_maps_by_chunk_index() {
        let state: JobState = serde_json::from_str(FINISHED_JOB).unwrap();
        let outcome = map_job_state(state);

        let sentiments = outcome.sentiments.unwrap();
        assert_eq!(sentiments.len(), 2);
        assert_eq!(sentiments[0].index, ChunkIndex::new(1));
        assert_eq!(sentiments[0].sentiment, Sentiment::Positive);
        assert_eq!(sentiments[0].sentences.len(), 1);
        assert!(sentiments[1].index.is_first());
        assert_eq!(sentiments[1].sentiment, Sentiment::Mixed);
        assert_eq!(sentiments[1].scores.negative, 0.4);

        let entities = outcome.entities.unwrap();
        assert_eq!(entities.len(), 1);
        let texts: Vec<&str> = entities[0].matches.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Berlin", "Hauptstadt"]);
        assert_eq!(entities[0].matches[0].confidence_score, 0.91);
    }

    #[test]
    fn test_failed_task_only_affects_its_half() {
        let state: JobState = serde_json::from_str(
            r#"{
                "status": "partiallyCompleted",
                "tasks": {"items": [
                    {"kind": "SentimentAnalysisLROResults", "status": "failed"},
                    {
                        "kind": "EntityLinkingLROResults",
                        "status": "succeeded",
                        "results": {"documents": [{"id": "0", "entities": []}], "errors": []}
                    }
                ]}
            }"#,
        )
        .unwrap();

        let outcome = map_job_state(state);

        assert!(matches!(outcome.sentiments, Err(TextAnalysisError::TaskFailed(_))));
        assert_eq!(outcome.entities.unwrap()[0].matches.len(), 0);
    }

    #[test]
    fn test_jobs_url_keeps_endpoint_path() {
        let url = jobs_url("https://news.cognitiveservices.azure.com/").unwrap();

        assert_eq!(
            url.as_str(),
            "https://news.cognitiveservices.azure.com/language/analyze-text/jobs?api-version=2023-04-01"
        );
        assert!(jobs_url("not a url").is_err());
    }

    #[test]
    fn test_job_status_terminal_states() {
        let running: JobState = serde_json::from_str(r#"{"status": "running"}"#).unwrap();
        let unknown: JobState = serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
        let done: JobState = serde_json::from_str(r#"{"status": "succeeded"}"#).unwrap();

        assert!(!running.status.is_terminal());
        assert!(!unknown.status.is_terminal());
        assert!(done.status.is_terminal());
    }
}
