pub mod document_extractors;
pub mod text_analysis_client;

pub use document_extractors::{HtmlArticleExtractor, PollCsvExtractor};
pub use text_analysis_client::AzureTextAnalysisService;
