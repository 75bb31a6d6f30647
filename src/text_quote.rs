//! Anchoring a [`TextQuoteSelector`] to a chunked scope.
//!
//! The search runs over the scope's logical character stream, not over the
//! individual chunks, so a quote spanning any number of chunk boundaries is
//! still found. Occurrences are discovered in document order as chunks are
//! consumed; overlapping and adjacent occurrences each count (searching for
//! `"aa"` in `"aaa"` yields two matches).
//!
//! `prefix` and `suffix`, when present, only disambiguate among multiple raw
//! occurrences of `exact`: occurrences whose surrounding context matches are
//! preferred and yielded as soon as they are confirmed. If the whole scope
//! is scanned without a single contextual match, the raw occurrences are
//! yielded instead, still in document order: context narrows a result, it
//! never empties one that `exact` alone would produce.

use std::collections::VecDeque;
use std::sync::Arc;

use async_stream::stream;
use futures_util::StreamExt;
use tracing::trace;

use crate::chunk::{Chunk, ChunkRange, utf16_len};
use crate::chunker::{ChunkSource, Chunker, SourceError, seek_boundaries};
use crate::matcher::{MatchError, Matcher, SelectorError};
use crate::selector::TextQuoteSelector;

/// Build the matcher for a text quote selector.
///
/// An empty `exact` is a construction-time error: it would "occur" at every
/// character boundary and anchor nothing meaningful.
pub fn matcher<S: ChunkSource>(
    source: &Arc<S>,
    selector: &TextQuoteSelector,
) -> Result<Matcher<S>, SelectorError> {
    if selector.exact.is_empty() {
        return Err(SelectorError::EmptyExact);
    }

    let exact = selector.exact.clone();
    let prefix = selector.prefix.clone().unwrap_or_default();
    let suffix = selector.suffix.clone().unwrap_or_default();
    let source = Arc::clone(source);

    Ok(Arc::new(move |scope| {
        let exact = exact.clone();
        let prefix = prefix.clone();
        let suffix = suffix.clone();
        let source = Arc::clone(&source);
        stream! {
            let mut chunker = match source.chunker(&scope) {
                Ok(chunker) => chunker,
                Err(err) => {
                    yield Err(err.into());
                    return;
                }
            };

            let exact_units = utf16_len(&exact);
            let has_context = !prefix.is_empty() || !suffix.is_empty();

            // Text of the scope read so far. The byte positions of found
            // occurrences index into this buffer.
            let mut haystack = String::new();
            // Byte position where the next discovery scan starts. Trails the
            // end of the buffer by up to `exact.len() - 1` bytes so that an
            // occurrence split across a chunk boundary is still found.
            let mut scan_from = 0usize;
            // Occurrences discovered but not yet confirmed: their suffix
            // window may extend into text not read yet.
            let mut pending: VecDeque<usize> = VecDeque::new();
            // Raw occurrences held back in case no contextual match appears.
            let mut fallback: Vec<usize> = Vec::new();
            let mut yielded_contextual = false;
            let mut exhausted = false;

            while !exhausted || !pending.is_empty() {
                if !exhausted {
                    haystack.push_str(chunker.current_chunk().data());
                    if chunker.next_chunk().is_none() {
                        exhausted = true;
                    }
                }

                // Discover new occurrence starts, overlap included.
                while let Some(found) = haystack[scan_from..].find(&exact) {
                    let at = scan_from + found;
                    pending.push_back(at);
                    scan_from = at + char_width(&haystack, at);
                }
                let tail_guard = haystack.len().saturating_sub(exact.len() - 1);
                if tail_guard > scan_from {
                    scan_from = floor_char_boundary(&haystack, tail_guard);
                }

                // Confirm occurrences whose context window is covered (or
                // can never be, because the scope has ended).
                while let Some(&at) = pending.front() {
                    let after = at + exact.len();
                    if !exhausted && haystack.len() < after + suffix.len() {
                        break;
                    }
                    pending.pop_front();

                    if !has_context {
                        match resolve(&*source, &scope, &haystack, at, exact_units) {
                            Ok(range) => yield Ok(range),
                            Err(err) => {
                                yield Err(err);
                                return;
                            }
                        }
                        continue;
                    }

                    let prefix_matches = prefix.is_empty()
                        || (at >= prefix.len() && haystack[..at].ends_with(&prefix));
                    let suffix_matches = suffix.is_empty()
                        || (haystack.len() >= after + suffix.len()
                            && haystack[after..].starts_with(&suffix));

                    if prefix_matches && suffix_matches {
                        yielded_contextual = true;
                        match resolve(&*source, &scope, &haystack, at, exact_units) {
                            Ok(range) => yield Ok(range),
                            Err(err) => {
                                yield Err(err);
                                return;
                            }
                        }
                    } else {
                        trace!(at, "occurrence context mismatch, holding as fallback");
                        fallback.push(at);
                    }
                }
            }

            if has_context && !yielded_contextual {
                for at in fallback {
                    match resolve(&*source, &scope, &haystack, at, exact_units) {
                        Ok(range) => yield Ok(range),
                        Err(err) => {
                            yield Err(err);
                            return;
                        }
                    }
                }
            }
        }
        .boxed()
    }))
}

/// Map an occurrence at byte position `at` of the scope text back to chunk
/// boundaries, re-walking the scope with the same traversal the position
/// matcher uses.
fn resolve<S: ChunkSource>(
    source: &S,
    scope: &ChunkRange<S::Chunk>,
    haystack: &str,
    at: usize,
    exact_units: usize,
) -> Result<ChunkRange<S::Chunk>, MatchError> {
    let start = utf16_len(&haystack[..at]);
    let mut chunker = source.chunker(scope)?;
    match seek_boundaries(&mut chunker, &[start, start + exact_units]).as_deref() {
        Some([(start_chunk, start_index), (end_chunk, end_index)]) => Ok(ChunkRange::new(
            start_chunk.clone(),
            *start_index,
            end_chunk.clone(),
            *end_index,
        )),
        // The occurrence came out of this scope's text; failing to reach it
        // again means the source changed between walks.
        _ => Err(SourceError::traversal("scope text changed during matching").into()),
    }
}

/// Width in bytes of the character starting at `at`.
fn char_width(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(1, char::len_utf8)
}

/// Largest char boundary less than or equal to `index`.
fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
