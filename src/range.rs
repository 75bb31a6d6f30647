//! Anchoring a [`RangeSelector`] to a chunked scope.
//!
//! A range selector is selector-type-agnostic by construction: its start and
//! end selectors are resolved through the ordinary dispatch, so each may be
//! a quote, a position, or itself a nested range or refinement chain. The
//! two boundary streams are paired lazily via the cartesian combinator and
//! every pair becomes a candidate span running from the start match's begin
//! boundary to the end match's begin boundary.

use std::pin::pin;
use std::sync::Arc;

use async_stream::stream;
use futures_util::StreamExt;
use tracing::trace;

use crate::cartesian::cartesian;
use crate::chunk::{Chunk, ChunkRange};
use crate::chunker::{ChunkSource, Chunker, SourceError};
use crate::matcher::{MatchError, Matcher, SelectorError, create_matcher};
use crate::selector::RangeSelector;

/// Build the matcher for a range selector.
///
/// Degenerate pairs, meaning spans that contain no text or whose end
/// boundary does not follow their start boundary, are silently discarded:
/// yielded and never reported as errors.
pub fn matcher<S: ChunkSource>(
    source: &Arc<S>,
    selector: &RangeSelector,
) -> Result<Matcher<S>, SelectorError> {
    let start_matcher = create_matcher(source, &selector.start_selector)?;
    let end_matcher = create_matcher(source, &selector.end_selector)?;
    let source = Arc::clone(source);

    Ok(Arc::new(move |scope| {
        let starts = start_matcher(scope.clone());
        let ends = end_matcher(scope.clone());
        let source = Arc::clone(&source);
        stream! {
            let mut pairs = pin!(cartesian(starts, ends));
            while let Some(pair) = pairs.next().await {
                let (start, end) = match pair {
                    Ok(pair) => pair,
                    Err(err) => {
                        yield Err(err);
                        return;
                    }
                };
                let candidate = ChunkRange::new(
                    start.start_chunk,
                    start.start_index,
                    end.start_chunk,
                    end.start_index,
                );
                match spans_text(&*source, &scope, &candidate) {
                    Ok(true) => yield Ok(candidate),
                    Ok(false) => trace!("discarding degenerate range pair"),
                    Err(err) => {
                        yield Err(err);
                        return;
                    }
                }
            }
        }
        .boxed()
    }))
}

/// Whether `candidate` is a well-ordered span containing at least one
/// character of text.
fn spans_text<S: ChunkSource>(
    source: &S,
    scope: &ChunkRange<S::Chunk>,
    candidate: &ChunkRange<S::Chunk>,
) -> Result<bool, MatchError> {
    if candidate.start_chunk == candidate.end_chunk {
        return Ok(candidate.start_index < candidate.end_index);
    }

    // Position a scope cursor at the end chunk, then let the cursor's
    // precedence test decide the ordering of the two boundary chunks.
    let mut cursor = source.chunker(scope)?;
    while *cursor.current_chunk() != candidate.end_chunk {
        if cursor.next_chunk().is_none() {
            return Err(SourceError::traversal("range boundary not found in scope").into());
        }
    }
    if !cursor.precedes_current_chunk(&candidate.start_chunk) {
        return Ok(false); // inverted
    }

    // Ordered, but the span may still cover zero characters (boundaries
    // separated only by empty chunks).
    let mut walk = source.chunker(candidate)?;
    loop {
        if walk.current_chunk().len_utf16() > 0 {
            return Ok(true);
        }
        if walk.next_chunk().is_none() {
            return Ok(false);
        }
    }
}
