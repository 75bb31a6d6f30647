//! Refinement: narrowing a matcher's results with a nested selector.
//!
//! Every intermediate match of the base matcher becomes the scope of the
//! refinement matcher, and the nested results are flattened depth-first
//! into one output stream, outer order preserved. The dispatch in
//! [`create_matcher`](crate::create_matcher) applies this wrapper
//! automatically wherever a selector carries `refinedBy`; it is a pure
//! composition of the two matchers, with no shared state and no caching.
//! The refinement runs once per intermediate match, even when several
//! intermediate matches happen to be equal.

use std::sync::Arc;

use async_stream::stream;
use futures_util::StreamExt;

use crate::chunker::ChunkSource;
use crate::matcher::Matcher;

/// Compose a base matcher with the matcher of its refining selector.
pub fn refine<S: ChunkSource>(base: Matcher<S>, refinement: Matcher<S>) -> Matcher<S> {
    Arc::new(move |scope| {
        let mut intermediates = base(scope);
        let refinement = Arc::clone(&refinement);
        stream! {
            while let Some(intermediate) = intermediates.next().await {
                let narrowed_scope = match intermediate {
                    Ok(matched) => matched,
                    Err(err) => {
                        yield Err(err);
                        return;
                    }
                };
                let mut nested = refinement(narrowed_scope);
                while let Some(item) = nested.next().await {
                    let failed = item.is_err();
                    yield item;
                    if failed {
                        return;
                    }
                }
            }
        }
        .boxed()
    })
}
