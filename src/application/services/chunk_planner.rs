use crate::application::ports::text_analysis::TextChunk;
use crate::domain::value_objects::ChunkIndex;

/// Per-request character limit of the text analysis service.
pub const MAX_CHUNK_CHARS: usize = 5_120;

/// Fixed-size partition of article text into analysis chunks.
///
/// Splitting counts characters, not bytes, and ignores sentence boundaries. The
/// chunks concatenate back to the original text and there is always at least one.
#[derive(Debug, Clone)]
pub struct ChunkPlanner {
    max_chunk_chars: usize,
}

impl Default for ChunkPlanner {
    fn default() -> Self {
        Self::new(MAX_CHUNK_CHARS)
    }
}

impl ChunkPlanner {
    pub fn new(max_chunk_chars: usize) -> Self {
        Self {
            max_chunk_chars: max_chunk_chars.max(1),
        }
    }

    pub fn max_chunk_chars(&self) -> usize {
        self.max_chunk_chars
    }

    pub fn plan(&self, text: &str) -> Vec<TextChunk> {
        self.split(text)
            .into_iter()
            .enumerate()
            .map(|(index, chunk)| TextChunk {
                index: ChunkIndex::new(index as u32),
                text: chunk.to_string(),
            })
            .collect()
    }

    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chars_in_chunk = 0;

        for (offset, _) in text.char_indices() {
            if chars_in_chunk == self.max_chunk_chars {
                chunks.push(&text[start..offset]);
                start = offset;
                chars_in_chunk = 0;
            }
            chars_in_chunk += 1;
        }

        chunks.push(&text[start..]);
        chunks
    }
}
