use std::sync::Arc;

use crate::{
    application::{
        ports::{ArticleExtractor, ArticleSource, PollSource, TextAnalysisService},
        services::{AnalysisDispatcher, ResultMerger, SentimentResolver},
        use_cases::{ImportPollResultsUseCase, IngestArticlesUseCase, RunPipelineUseCase},
    },
    config::PipelineConfig,
    domain::repositories::{
        ArticleRepository, EntityRepository, PollResultRepository, SentenceRepository,
    },
    infrastructure::{
        database::{
            create_connection_pool,
            repositories::{
                PostgresArticleRepository, PostgresEntityRepository, PostgresPollResultRepository,
                PostgresSentenceRepository,
            },
            run_migrations,
        },
        external_services::{AzureTextAnalysisService, HtmlArticleExtractor, PollCsvExtractor},
        file_system::LocalArticleDirectory,
    },
};

pub struct AppContainer {
    // Repositories
    pub article_repository: Arc<dyn ArticleRepository>,
    pub sentence_repository: Arc<dyn SentenceRepository>,
    pub entity_repository: Arc<dyn EntityRepository>,
    pub poll_result_repository: Arc<dyn PollResultRepository>,

    // External Services
    pub text_analysis_service: Arc<dyn TextAnalysisService>,
    pub article_source: Arc<dyn ArticleSource>,
    pub article_extractor: Arc<dyn ArticleExtractor>,
    pub poll_source: Arc<dyn PollSource>,

    // Application Services
    pub result_merger: Arc<ResultMerger>,
    pub analysis_dispatcher: Arc<AnalysisDispatcher>,
    pub sentiment_resolver: Arc<SentimentResolver>,

    // Use Cases
    pub ingest_articles_use_case: Arc<IngestArticlesUseCase>,
    pub import_poll_results_use_case: Arc<ImportPollResultsUseCase>,
    pub run_pipeline_use_case: Arc<RunPipelineUseCase>,
}

impl AppContainer {
    pub fn new(config: &PipelineConfig) -> Result<Self, Box<dyn std::error::Error>> {
        // Create database connection pool
        let db_pool = create_connection_pool(&config.database_url, config.database_pool_size)?;
        run_migrations(&db_pool)
            .map_err(|e| format!("Failed to run database migrations: {}", e))?;

        // Create repositories
        let article_repository: Arc<dyn ArticleRepository> =
            Arc::new(PostgresArticleRepository::new(db_pool.clone()));
        let sentence_repository: Arc<dyn SentenceRepository> =
            Arc::new(PostgresSentenceRepository::new(db_pool.clone()));
        let entity_repository: Arc<dyn EntityRepository> =
            Arc::new(PostgresEntityRepository::new(db_pool.clone()));
        let poll_result_repository: Arc<dyn PollResultRepository> =
            Arc::new(PostgresPollResultRepository::new(db_pool));

        // Create external services
        let text_analysis_service: Arc<dyn TextAnalysisService> =
            Arc::new(AzureTextAnalysisService::from_env()?);
        let article_source: Arc<dyn ArticleSource> =
            Arc::new(LocalArticleDirectory::new(config.articles_dir.clone()));
        let article_extractor: Arc<dyn ArticleExtractor> = Arc::new(HtmlArticleExtractor::new());
        let poll_source: Arc<dyn PollSource> = Arc::new(PollCsvExtractor::new());

        // Create application services
        let result_merger = Arc::new(ResultMerger::new(
            article_repository.clone(),
            sentence_repository.clone(),
            entity_repository.clone(),
        ));
        let analysis_dispatcher = Arc::new(
            AnalysisDispatcher::new(
                text_analysis_service.clone(),
                result_merger.clone(),
                config.language.clone(),
            )
            .with_max_in_flight(config.max_in_flight_analyses),
        );
        let sentiment_resolver = Arc::new(SentimentResolver::new(article_repository.clone()));

        // Create use cases
        let ingest_articles_use_case = Arc::new(IngestArticlesUseCase::new(
            article_source.clone(),
            article_extractor.clone(),
            article_repository.clone(),
            config.document_root_marker.clone(),
        ));
        let import_poll_results_use_case = Arc::new(ImportPollResultsUseCase::new(
            poll_source.clone(),
            poll_result_repository.clone(),
        ));
        let run_pipeline_use_case = Arc::new(RunPipelineUseCase::new(
            ingest_articles_use_case.clone(),
            article_repository.clone(),
            analysis_dispatcher.clone(),
            sentiment_resolver.clone(),
            import_poll_results_use_case.clone(),
            config.polls_csv.clone(),
        ));

        Ok(Self {
            article_repository,
            sentence_repository,
            entity_repository,
            poll_result_repository,
            text_analysis_service,
            article_source,
            article_extractor,
            poll_source,
            result_merger,
            analysis_dispatcher,
            sentiment_resolver,
            ingest_articles_use_case,
            import_poll_results_use_case,
            run_pipeline_use_case,
        })
    }
}
