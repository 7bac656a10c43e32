use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::application::ports::PollSource;
use crate::application::ports::poll_source::PollSourceError;
use crate::domain::repositories::PollResultRepository;
use crate::domain::repositories::poll_result_repository::PollResultRepositoryError;

#[derive(Debug)]
pub enum ImportPollResultsError {
    SourceError(String),
    RepositoryError(String),
    WorkerError(String),
}

impl std::fmt::Display for ImportPollResultsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportPollResultsError::SourceError(msg) => write!(f, "Poll source error: {}", msg),
            ImportPollResultsError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            ImportPollResultsError::WorkerError(msg) => write!(f, "Poll import worker failed: {}", msg),
        }
    }
}

impl std::error::Error for ImportPollResultsError {}

impl From<PollSourceError> for ImportPollResultsError {
    fn from(error: PollSourceError) -> Self {
        ImportPollResultsError::SourceError(error.to_string())
    }
}

impl From<PollResultRepositoryError> for ImportPollResultsError {
    fn from(error: PollResultRepositoryError) -> Self {
        ImportPollResultsError::RepositoryError(error.to_string())
    }
}

pub struct ImportPollResultsUseCase {
    poll_source: Arc<dyn PollSource>,
    poll_result_repository: Arc<dyn PollResultRepository>,
}

impl ImportPollResultsUseCase {
    pub fn new(
        poll_source: Arc<dyn PollSource>,
        poll_result_repository: Arc<dyn PollResultRepository>,
    ) -> Self {
        Self {
            poll_source,
            poll_result_repository,
        }
    }

    /// Returns the number of stored poll results.
    pub async fn execute(&self, csv_path: &Path) -> Result<usize, ImportPollResultsError> {
        let poll_source = Arc::clone(&self.poll_source);
        let path: PathBuf = csv_path.to_path_buf();
        let results = tokio::task::spawn_blocking(move || poll_source.read_poll_results(&path))
            .await
            .map_err(|e| ImportPollResultsError::WorkerError(e.to_string()))??;

        let stored = self.poll_result_repository.save_batch(&results).await?;
        info!(path = %csv_path.display(), poll_results = stored, "Poll results imported");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PollResult;
    use crate::testing::InMemoryPollResultRepository;

    struct FixedPolls(Result<Vec<PollResult>, String>);

    impl PollSource for FixedPolls {
        fn read_poll_results(&self, _path: &Path) -> Result<Vec<PollResult>, PollSourceError> {
            self.0.clone().map_err(PollSourceError::MalformedFile)
        }
    }

    #[tokio::test]
    async fn test_stores_every_poll_result() {
        let repository = Arc::new(InMemoryPollResultRepository::default());
        let polls = vec![
            PollResult::new("2022/03/01".to_string(), "CDU".to_string(), 27.5),
            PollResult::new("2022/03/01".to_string(), "SPD".to_string(), 25.0),
        ];
        let use_case = ImportPollResultsUseCase::new(Arc::new(FixedPolls(Ok(polls))), repository.clone());

        let stored = use_case.execute(Path::new("polls.csv")).await.unwrap();

        assert_eq!(stored, 2);
        assert_eq!(repository.stored()[1].party(), "SPD");
    }

    #[tokio::test]
    async fn test_source_failure_is_reported() {
        let repository = Arc::new(InMemoryPollResultRepository::default());
        let use_case = ImportPollResultsUseCase::new(
            Arc::new(FixedPolls(Err("missing header".to_string()))),
            repository.clone(),
        );

        let result = use_case.execute(Path::new("polls.csv")).await;

        assert!(matches!(result, Err(ImportPollResultsError::SourceError(_))));
        assert!(repository.stored().is_empty());
    }
}
