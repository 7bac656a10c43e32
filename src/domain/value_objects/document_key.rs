use serde::{Deserialize, Serialize};
use std::path::{Component, Path};
use std::str::FromStr;

/// Directory that sits between the date segments and the article files.
const ARTICLES_DIRECTORY: &str = "articles";

/// Section, day and slug at the very least, so both projections stay strict truncations.
const MIN_SEGMENTS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentKeyError {
    InvalidPath(String),
    InvalidKey(String),
}

impl std::fmt::Display for DocumentKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKeyError::InvalidPath(path) => write!(f, "Invalid article path: {}", path),
            DocumentKeyError::InvalidKey(key) => write!(f, "Invalid document key: {}", key),
        }
    }
}

impl std::error::Error for DocumentKeyError {}

/// Hierarchical article identity, e.g. `politik/2022/01/05/headline-slug`.
///
/// The key is shared by every article row, sentence and entity that belongs to the
/// same published article, so it doubles as the grouping column for aggregations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Builds the key from everything between the `root_marker` directory and the
    /// file name (without extension). A trailing `articles` directory is skipped.
    pub fn derive(file_path: &Path, root_marker: &str) -> Result<Self, DocumentKeyError> {
        let invalid_path = || DocumentKeyError::InvalidPath(file_path.display().to_string());

        let slug = file_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(invalid_path)?;

        let directories: Vec<&str> = file_path
            .parent()
            .ok_or_else(invalid_path)?
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => name.to_str(),
                _ => None,
            })
            .collect();

        let root = directories
            .iter()
            .position(|directory| *directory == root_marker)
            .ok_or_else(invalid_path)?;

        let mut sections = &directories[root + 1..];
        if let Some((last, rest)) = sections.split_last() {
            if *last == ARTICLES_DIRECTORY {
                sections = rest;
            }
        }

        let mut segments = sections.to_vec();
        segments.push(slug);

        Self::parse(&segments.join("/")).map_err(|_| invalid_path())
    }

    pub fn parse(value: &str) -> Result<Self, DocumentKeyError> {
        let segments: Vec<&str> = value.split('/').collect();

        if segments.len() < MIN_SEGMENTS || segments.iter().any(|segment| segment.is_empty()) {
            return Err(DocumentKeyError::InvalidKey(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Section and publishing day, used to group all articles of one day.
    pub fn without_article(&self) -> &str {
        truncate_last_segment(&self.0)
    }

    /// Section and month, used to group by section and month.
    pub fn without_article_and_day(&self) -> &str {
        truncate_last_segment(self.without_article())
    }
}

fn truncate_last_segment(value: &str) -> &str {
    value
        .rsplit_once('/')
        .map(|(head, _)| head)
        .unwrap_or(value)
}

impl FromStr for DocumentKey {
    type Err = DocumentKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DocumentKey> for String {
    fn from(key: DocumentKey) -> Self {
        key.0
    }
}
