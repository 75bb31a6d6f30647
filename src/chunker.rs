//! The chunker contract: relative navigation over a chunked text source.
//!
//! Matchers never index into the source. They walk it one chunk at a time
//! through a [`Chunker`] cursor, so that fragmentation invisible to the
//! selector author (adjacent fragments forming one logical string,
//! zero-length fragments left behind by edits) stays transparent. The
//! cursor exposes only relative navigation and a precedence test, never
//! absolute positions.

use miette::Diagnostic;
use thiserror::Error;

use crate::chunk::{Chunk, ChunkRange};

/// A cursor over the ordered (possibly lazily discovered) chunk sequence of
/// one text source, bounded to a scope.
///
/// A chunker always points at a chunk; there is no "before the first" or
/// "after the last" state. Running off either end is a normal outcome, not
/// an error: the move returns `None` and the cursor stays where it was.
pub trait Chunker {
    type Chunk: Chunk;

    /// The chunk presently pointed at.
    fn current_chunk(&self) -> &Self::Chunk;

    /// Advance to the chunk immediately following the current one in
    /// document order and return it. Returns `None` at the end of the
    /// scope, leaving the cursor unchanged.
    fn next_chunk(&mut self) -> Option<Self::Chunk>;

    /// Move to the chunk immediately preceding the current one and return
    /// it. Returns `None` at the start of the scope, leaving the cursor
    /// unchanged.
    fn previous_chunk(&mut self) -> Option<Self::Chunk>;

    /// Whether `chunk` occurs strictly before the current chunk in document
    /// order. Lets callers bound a search without materializing the order
    /// of the whole sequence.
    fn precedes_current_chunk(&self, chunk: &Self::Chunk) -> bool;
}

/// The text-source adapter contract.
///
/// An adapter owns the native representation of a text source (a fragment
/// list, a tree of nodes, …) and produces [`Chunker`] cursors over bounded
/// spans of it. The engine does not know or care what the underlying source
/// looks like beyond this trait.
///
/// The chunker returned for a scope walks exactly the chunks of that scope,
/// with the boundary chunks *trimmed* to the scope's local offsets. Trimmed
/// chunks must still compare equal to other trimmings of the same underlying
/// fragment, and must carry whatever the adapter needs to map a chunk-local
/// offset back to its native coordinates.
pub trait ChunkSource: Send + Sync + 'static {
    type Chunk: Chunk;
    type Chunker: Chunker<Chunk = Self::Chunk> + Send;

    /// Build a cursor over `scope`, positioned at its first chunk.
    fn chunker(&self, scope: &ChunkRange<Self::Chunk>) -> Result<Self::Chunker, SourceError>;
}

/// Failure reported by a text-source adapter.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The scope handed to [`ChunkSource::chunker`] does not describe a
    /// valid span of this source.
    #[error("scope is not valid for this source: {reason}")]
    #[diagnostic(code(textanchor::source::invalid_scope))]
    InvalidScope { reason: String },

    /// The source failed while being walked.
    #[error("text source failed during traversal: {reason}")]
    #[diagnostic(code(textanchor::source::traversal))]
    Traversal { reason: String },
}

impl SourceError {
    pub fn invalid_scope(reason: impl Into<String>) -> Self {
        SourceError::InvalidScope {
            reason: reason.into(),
        }
    }

    pub fn traversal(reason: impl Into<String>) -> Self {
        SourceError::Traversal {
            reason: reason.into(),
        }
    }
}

/// Resolve a non-decreasing list of logical UTF-16 offsets (measured from
/// the start of the chunker's scope) to `(chunk, local offset)` boundaries,
/// in one forward walk.
///
/// Boundary convention: a target resolves to the earliest chunk that
/// actually *contains* the character at that offset. Zero-length chunks and
/// chunks whose content was already consumed are skipped forward, so a
/// target sitting on a chunk boundary shared by any number of empty chunks
/// resolves deterministically to the start of the next non-empty chunk.
/// Only when the scope ends exactly at a target does the boundary land at
/// the end of the final chunk. Returns `None` when the scope is exhausted
/// before some target is reached.
pub(crate) fn seek_boundaries<K: Chunker>(
    chunker: &mut K,
    targets: &[usize],
) -> Option<Vec<(K::Chunk, usize)>> {
    debug_assert!(targets.windows(2).all(|pair| pair[0] <= pair[1]));

    let mut boundaries = Vec::with_capacity(targets.len());
    let mut consumed = 0usize;
    let mut next_target = 0usize;

    loop {
        let chunk = chunker.current_chunk().clone();
        let length = chunk.len_utf16();

        while next_target < targets.len() && targets[next_target] < consumed + length {
            boundaries.push((chunk.clone(), targets[next_target] - consumed));
            next_target += 1;
        }
        if next_target == targets.len() {
            return Some(boundaries);
        }

        consumed += length;
        if chunker.next_chunk().is_none() {
            // End of scope: targets sitting exactly on the final boundary
            // resolve to the end of the last chunk.
            while next_target < targets.len() && targets[next_target] == consumed {
                boundaries.push((chunk.clone(), length));
                next_target += 1;
            }
            return (next_target == targets.len()).then_some(boundaries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::StringSource;

    fn cursor(fragments: &[&str]) -> (StringSource, <StringSource as ChunkSource>::Chunker) {
        let source = StringSource::new(fragments.iter().copied());
        let scope = source.whole_scope();
        let chunker = source.chunker(&scope).unwrap();
        (source, chunker)
    }

    #[test]
    fn seek_lands_inside_a_single_chunk() {
        let (_, mut chunker) = cursor(&["hello world"]);
        let bounds = seek_boundaries(&mut chunker, &[0, 5]).unwrap();
        assert_eq!(bounds[0].1, 0);
        assert_eq!(bounds[1].1, 5);
        assert_eq!(bounds[0].0.data(), "hello world");
    }

    #[test]
    fn seek_skips_empty_chunks_at_a_shared_boundary() {
        let (_, mut chunker) = cursor(&["ab", "", "", "cd"]);
        let bounds = seek_boundaries(&mut chunker, &[2]).unwrap();
        assert_eq!(bounds[0].0.data(), "cd");
        assert_eq!(bounds[0].1, 0);
    }

    #[test]
    fn seek_at_scope_end_lands_on_the_final_chunk() {
        let (_, mut chunker) = cursor(&["ab", "cd"]);
        let bounds = seek_boundaries(&mut chunker, &[4]).unwrap();
        assert_eq!(bounds[0].0.data(), "cd");
        assert_eq!(bounds[0].1, 2);
    }

    #[test]
    fn seek_past_scope_end_yields_nothing() {
        let (_, mut chunker) = cursor(&["ab", "cd"]);
        assert_eq!(seek_boundaries(&mut chunker, &[5]), None);
    }

    #[test]
    fn seek_over_all_empty_chunks_resolves_to_the_last() {
        let (_, mut chunker) = cursor(&["", "", ""]);
        let bounds = seek_boundaries(&mut chunker, &[0]).unwrap();
        assert_eq!(bounds[0].1, 0);
    }
}
