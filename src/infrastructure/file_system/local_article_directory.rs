use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::application::ports::ArticleSource;
use crate::application::ports::article_source::ArticleSourceError;

/// Article files below one directory, found recursively.
pub struct LocalArticleDirectory {
    base_path: PathBuf,
}

impl LocalArticleDirectory {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }
}

impl ArticleSource for LocalArticleDirectory {
    fn article_files(&self) -> Result<Vec<PathBuf>, ArticleSourceError> {
        if !self.base_path.is_dir() {
            return Err(ArticleSourceError::NotFound(
                self.base_path.display().to_string(),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.base_path).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            if entry.file_type().is_file() && is_article_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }
}

fn is_article_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'));
    let html = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.contains("html"));

    !hidden && html
}
