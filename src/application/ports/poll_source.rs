use std::path::Path;

use crate::domain::entities::PollResult;

#[derive(Debug)]
pub enum PollSourceError {
    IoError(String),
    MalformedFile(String),
}

impl std::fmt::Display for PollSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollSourceError::IoError(msg) => write!(f, "IO error: {}", msg),
            PollSourceError::MalformedFile(msg) => write!(f, "Malformed poll file: {}", msg),
        }
    }
}

impl std::error::Error for PollSourceError {}

pub trait PollSource: Send + Sync {
    fn read_poll_results(&self, path: &Path) -> Result<Vec<PollResult>, PollSourceError>;
}
