pub mod local_article_directory;

pub use local_article_directory::LocalArticleDirectory;
