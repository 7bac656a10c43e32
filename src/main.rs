mod application;
mod config;
mod domain;
mod infrastructure;
#[cfg(test)]
mod testing;

use tracing::info;

use crate::config::PipelineConfig;
use crate::infrastructure::AppContainer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_env()?;
    info!(
        articles_dir = %config.articles_dir.display(),
        language = %config.language,
        max_in_flight = config.max_in_flight_analyses,
        "Starting sentiment pipeline"
    );

    let container = AppContainer::new(&config)?;
    let report = container.run_pipeline_use_case.execute().await?;

    info!(
        files_found = report.ingestion.files_found,
        articles_stored = report.ingestion.articles_stored,
        files_skipped = report.ingestion.files_skipped,
        analyzed = report.analysis.analyzed,
        failed = report.analysis.failed,
        rows_updated = report.analysis.totals.rows_updated,
        rows_inserted = report.analysis.totals.rows_inserted,
        sentences = report.analysis.totals.sentences_saved,
        entities = report.analysis.totals.entities_saved,
        mixed_documents = report.resolution.mixed_documents,
        poll_results = ?report.poll_results,
        "Run summary"
    );

    Ok(())
}
