//! A text source backed by an owned list of string fragments.
//!
//! This is the flat equivalent of a run of adjacent text nodes: one logical
//! string arbitrarily fragmented, possibly with zero-length fragments in
//! between. It is the adapter the test suite anchors against, and the model
//! for writing adapters over richer sources.

use std::fmt;

use crate::chunk::{Chunk, ChunkRange, utf16_len, utf16_to_byte_index};
use crate::chunker::{ChunkSource, Chunker, SourceError};

/// A view of one fragment of a [`StringSource`], possibly trimmed to a
/// scope's boundaries.
///
/// Equality compares the fragment index only: two differently trimmed views
/// of the same fragment are the same chunk, the way two ranges over one
/// text node name the same node. The view carries its own UTF-16 offset
/// within the fragment so chunk-local match indices can be mapped back to
/// absolute fragment coordinates.
#[derive(Clone)]
pub struct StringChunk {
    fragment: usize,
    offset: usize,
    text: String,
}

impl StringChunk {
    /// Index of the underlying fragment within the source.
    pub fn fragment(&self) -> usize {
        self.fragment
    }

    /// UTF-16 offset of this view within the underlying fragment.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl PartialEq for StringChunk {
    fn eq(&self, other: &Self) -> bool {
        self.fragment == other.fragment
    }
}

impl fmt::Debug for StringChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringChunk")
            .field("fragment", &self.fragment)
            .field("offset", &self.offset)
            .field("text", &self.text)
            .finish()
    }
}

impl Chunk for StringChunk {
    fn data(&self) -> &str {
        &self.text
    }
}

/// An in-memory text source: one logical string stored as fragments.
#[derive(Debug, Clone)]
pub struct StringSource {
    fragments: Vec<String>,
}

impl StringSource {
    /// Build a source from fragments. A source always holds at least one
    /// fragment; an empty list becomes a single empty fragment.
    pub fn new<I, T>(fragments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut fragments: Vec<String> = fragments.into_iter().map(Into::into).collect();
        if fragments.is_empty() {
            fragments.push(String::new());
        }
        Self { fragments }
    }

    /// Build a source holding `text` as a single fragment.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new([text.into()])
    }

    /// The scope spanning the entire source, from the first character of
    /// the first fragment to the end of the last.
    pub fn whole_scope(&self) -> ChunkRange<StringChunk> {
        let last = self.fragments.len() - 1;
        ChunkRange::new(
            self.untrimmed_chunk(0),
            0,
            self.untrimmed_chunk(last),
            utf16_len(&self.fragments[last]),
        )
    }

    /// Map a match back to native coordinates: absolute
    /// `(fragment index, UTF-16 offset)` pairs for its two boundaries.
    pub fn resolve_range(
        &self,
        range: &ChunkRange<StringChunk>,
    ) -> ((usize, usize), (usize, usize)) {
        debug_assert!(range.start_chunk.fragment < self.fragments.len());
        debug_assert!(range.end_chunk.fragment < self.fragments.len());
        (
            (
                range.start_chunk.fragment,
                range.start_chunk.offset + range.start_index,
            ),
            (
                range.end_chunk.fragment,
                range.end_chunk.offset + range.end_index,
            ),
        )
    }

    /// The text contained in `range`.
    pub fn text_between(&self, range: &ChunkRange<StringChunk>) -> Result<String, SourceError> {
        let mut chunker = self.chunker(range)?;
        let mut text = String::from(chunker.current_chunk().data());
        while let Some(chunk) = chunker.next_chunk() {
            text.push_str(chunk.data());
        }
        Ok(text)
    }

    fn untrimmed_chunk(&self, fragment: usize) -> StringChunk {
        StringChunk {
            fragment,
            offset: 0,
            text: self.fragments[fragment].clone(),
        }
    }

    /// Slice `fragment` between two absolute UTF-16 offsets.
    fn trimmed_chunk(
        &self,
        fragment: usize,
        from: usize,
        to: usize,
    ) -> Result<StringChunk, SourceError> {
        let full = &self.fragments[fragment];
        let from_byte = utf16_to_byte_index(full, from).ok_or_else(|| {
            SourceError::invalid_scope(format!(
                "offset {from} is not a character boundary of fragment {fragment}"
            ))
        })?;
        let to_byte = utf16_to_byte_index(full, to).ok_or_else(|| {
            SourceError::invalid_scope(format!(
                "offset {to} is not a character boundary of fragment {fragment}"
            ))
        })?;
        Ok(StringChunk {
            fragment,
            offset: from,
            text: full[from_byte..to_byte].to_string(),
        })
    }
}

impl ChunkSource for StringSource {
    type Chunk = StringChunk;
    type Chunker = StringChunker;

    fn chunker(&self, scope: &ChunkRange<StringChunk>) -> Result<StringChunker, SourceError> {
        let first = scope.start_chunk.fragment;
        let last = scope.end_chunk.fragment;
        if first >= self.fragments.len() || last >= self.fragments.len() {
            return Err(SourceError::invalid_scope(
                "scope names a fragment this source does not have",
            ));
        }

        // Boundary chunks may themselves be trimmed views; their own offset
        // plus the scope's local index gives the absolute position.
        let scope_start = scope.start_chunk.offset + scope.start_index;
        let scope_end = scope.end_chunk.offset + scope.end_index;
        if first > last || (first == last && scope_start > scope_end) {
            return Err(SourceError::invalid_scope("scope boundaries are inverted"));
        }

        let mut chunks = Vec::with_capacity(last - first + 1);
        for fragment in first..=last {
            let from = if fragment == first { scope_start } else { 0 };
            let to = if fragment == last {
                scope_end
            } else {
                utf16_len(&self.fragments[fragment])
            };
            if from > utf16_len(&self.fragments[fragment]) || to > utf16_len(&self.fragments[fragment]) {
                return Err(SourceError::invalid_scope(format!(
                    "scope offset exceeds the length of fragment {fragment}"
                )));
            }
            chunks.push(self.trimmed_chunk(fragment, from, to)?);
        }
        Ok(StringChunker {
            chunks,
            position: 0,
        })
    }
}

/// Cursor over the chunks of one [`StringSource`] scope.
#[derive(Debug)]
pub struct StringChunker {
    chunks: Vec<StringChunk>,
    position: usize,
}

impl Chunker for StringChunker {
    type Chunk = StringChunk;

    fn current_chunk(&self) -> &StringChunk {
        &self.chunks[self.position]
    }

    fn next_chunk(&mut self) -> Option<StringChunk> {
        if self.position + 1 < self.chunks.len() {
            self.position += 1;
            Some(self.chunks[self.position].clone())
        } else {
            None
        }
    }

    fn previous_chunk(&mut self) -> Option<StringChunk> {
        if self.position > 0 {
            self.position -= 1;
            Some(self.chunks[self.position].clone())
        } else {
            None
        }
    }

    fn precedes_current_chunk(&self, chunk: &StringChunk) -> bool {
        self.chunks[..self.position].iter().any(|seen| seen == chunk)
    }
}
