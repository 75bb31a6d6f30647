//! Anchoring a [`TextPositionSelector`] to a chunked scope.

use std::sync::Arc;

use async_stream::stream;
use futures_util::StreamExt;

use crate::chunk::ChunkRange;
use crate::chunker::{ChunkSource, seek_boundaries};
use crate::matcher::{Matcher, SelectorError};
use crate::selector::TextPositionSelector;

/// Build the matcher for a text position selector.
///
/// The selector's `start` and `end` are character offsets (UTF-16 code
/// units) into the logical concatenation of the scope's chunk contents. The
/// matcher walks the scope once, accumulating consumed characters until it
/// can record both boundaries, then yields exactly one match: a position
/// has a unique resolution in a given scope. A scope exhausted before `end`
/// is reached yields nothing.
///
/// Inverted offsets are a construction-time error; they would otherwise
/// anchor silently to the wrong span.
pub fn matcher<S: ChunkSource>(
    source: &Arc<S>,
    selector: &TextPositionSelector,
) -> Result<Matcher<S>, SelectorError> {
    if selector.start > selector.end {
        return Err(SelectorError::InvertedPosition {
            start: selector.start,
            end: selector.end,
        });
    }

    let (start, end) = (selector.start, selector.end);
    let source = Arc::clone(source);

    Ok(Arc::new(move |scope| {
        let source = Arc::clone(&source);
        stream! {
            let mut chunker = match source.chunker(&scope) {
                Ok(chunker) => chunker,
                Err(err) => {
                    yield Err(err.into());
                    return;
                }
            };
            if let Some([(start_chunk, start_index), (end_chunk, end_index)]) =
                seek_boundaries(&mut chunker, &[start, end]).as_deref()
            {
                yield Ok(ChunkRange::new(
                    start_chunk.clone(),
                    *start_index,
                    end_chunk.clone(),
                    *end_index,
                ));
            }
        }
        .boxed()
    }))
}
