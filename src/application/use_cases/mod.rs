pub mod import_poll_results;
pub mod ingest_articles;
pub mod run_pipeline;

pub use import_poll_results::ImportPollResultsUseCase;
pub use ingest_articles::{IngestArticlesUseCase, IngestionReport};
pub use run_pipeline::{PipelineReport, RunPipelineUseCase};
