use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Zero-based position of a text chunk within its article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkIndex(u32);

impl ChunkIndex {
    pub const FIRST: ChunkIndex = ChunkIndex(0);

    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// The first chunk owns the article row created during ingestion.
    pub fn is_first(&self) -> bool {
        self.0 == 0
    }
}

impl FromStr for ChunkIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(ChunkIndex)
            .map_err(|e| format!("Invalid chunk index '{}': {}", s, e))
    }
}

impl std::fmt::Display for ChunkIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
