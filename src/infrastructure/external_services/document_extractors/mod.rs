pub mod html_article_extractor;
pub mod poll_csv_extractor;

pub use html_article_extractor::HtmlArticleExtractor;
pub use poll_csv_extractor::PollCsvExtractor;
