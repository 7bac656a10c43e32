pub mod article_extractor;
pub mod article_source;
pub mod poll_source;
pub mod text_analysis;

pub use article_extractor::ArticleExtractor;
pub use article_source::ArticleSource;
pub use poll_source::PollSource;
pub use text_analysis::TextAnalysisService;
