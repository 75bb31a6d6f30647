//! The chunk model: fragments of a text source and spans bounded by them.
//!
//! A text source rarely hands out one contiguous string. Live documents are
//! fragmented into adjacent runs of characters (think sibling text nodes, or
//! rope segments), and edits leave zero-length fragments behind. The matching
//! engine never sees the source directly; it sees [`Chunk`]s produced by an
//! adapter, and it describes every result as a [`ChunkRange`] bounded by two
//! chunk/offset pairs.

use std::fmt::Debug;

/// One fragment of a larger text source.
///
/// Chunks are produced and owned by the text-source adapter; the engine only
/// clones and compares them. Equality identifies the *underlying* fragment:
/// two chunks trimmed differently out of the same fragment must compare
/// equal, so that a match produced against a narrowed scope still names the
/// fragment the consumer knows about.
///
/// Cloning a chunk must be cheap: chunks are created fresh per traversal and
/// discarded once the caller has consumed the match they appear in.
pub trait Chunk: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// The text this chunk contributes to the logical character stream.
    fn data(&self) -> &str;

    /// Length of [`data`](Chunk::data) in UTF-16 code units.
    fn len_utf16(&self) -> usize {
        utf16_len(self.data())
    }
}

/// A span over a chunked text source, bounded by a start and an end
/// chunk/offset pair.
///
/// Local indices are measured in UTF-16 code units relative to the boundary
/// chunk's [`data`](Chunk::data). The span is half-open: the character at
/// `(end_chunk, end_index)` is not part of it. Invariant: `start_chunk` is
/// the same as, or textually precedes, `end_chunk`; when they are equal,
/// `start_index <= end_index`.
///
/// Two ranges are equal iff their boundary chunks are equal (per chunk
/// equality) and their local offsets match.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRange<C: Chunk> {
    pub start_chunk: C,
    pub start_index: usize,
    pub end_chunk: C,
    pub end_index: usize,
}

impl<C: Chunk> ChunkRange<C> {
    pub fn new(start_chunk: C, start_index: usize, end_chunk: C, end_index: usize) -> Self {
        Self {
            start_chunk,
            start_index,
            end_chunk,
            end_index,
        }
    }

    /// Whether both boundaries name the same point in the source.
    pub fn is_collapsed(&self) -> bool {
        self.start_chunk == self.end_chunk && self.start_index == self.end_index
    }
}

/// Length of `text` in UTF-16 code units.
///
/// All offsets in this crate, selector positions and chunk-local indices
/// alike, count UTF-16 code units. The Web Annotation selector model inherits DOM
/// string indexing, so an astral character like `😃` counts as two units:
///
/// ```
/// use textanchor::chunk::utf16_len;
///
/// assert_eq!(utf16_len("l😃rem ipsum "), 13);
/// assert_eq!("l😃rem ipsum ".chars().count(), 12);
/// ```
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 code unit offset into a byte index into `text`.
///
/// Returns `None` when the offset is out of bounds or falls between the two
/// code units of a surrogate pair (no corresponding byte position exists).
pub fn utf16_to_byte_index(text: &str, offset: usize) -> Option<usize> {
    let mut units = 0;
    for (byte_index, ch) in text.char_indices() {
        if units == offset {
            return Some(byte_index);
        }
        if units > offset {
            return None;
        }
        units += ch.len_utf16();
    }
    (units == offset).then_some(text.len())
}
