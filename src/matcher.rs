//! The matcher contract and selector dispatch.
//!
//! A matcher is a function of a scope producing a lazy, pull-based stream of
//! matches: producing the next match may require more traversal work, and
//! the stream suspends there until the consumer asks again. A consumer that
//! stops polling implicitly cancels the remaining work; dropping the stream
//! releases everything it held.
//!
//! [`create_matcher`] is the dispatch entry point: it resolves a selector to
//! the matcher for its type tag, validating the selector's content up front,
//! and wraps the result with the refinement composition whenever the
//! selector carries `refinedBy`. Construction-time failures (unsupported
//! type, malformed content) surface synchronously here, never lazily from
//! inside a stream.

use std::sync::Arc;

use futures_util::stream::BoxStream;
use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::chunk::ChunkRange;
use crate::chunker::{ChunkSource, SourceError};
use crate::refinement::refine;
use crate::selector::Selector;
use crate::{range, text_position, text_quote};

/// The chunk type a source produces.
pub type SourceChunk<S> = <S as ChunkSource>::Chunk;

/// A lazy, finite sequence of matches. Each element is a suspension point;
/// an `Err` item reports a source failure at that point in the traversal
/// and terminates the sequence.
pub type MatchStream<C> = BoxStream<'static, Result<ChunkRange<C>, MatchError>>;

/// A matcher: given a scope, lazily yield every match of one selector
/// inside it, in document order. Matchers never mutate the scope or the
/// underlying source, and a match is itself usable as a new scope.
pub type Matcher<S> =
    Arc<dyn Fn(ChunkRange<SourceChunk<S>>) -> MatchStream<SourceChunk<S>> + Send + Sync>;

/// A selector that cannot be turned into a matcher.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// No matcher exists for this selector's type tag.
    #[error("unsupported selector type: {kind}")]
    #[diagnostic(
        code(textanchor::selector::unsupported),
        help("only TextQuoteSelector, TextPositionSelector, and RangeSelector anchor to text; CssSelector needs a native query engine")
    )]
    Unsupported { kind: String },

    /// A text quote selector with an empty `exact` string.
    #[error("text quote selector has an empty `exact` string")]
    #[diagnostic(
        code(textanchor::selector::empty_exact),
        help("an empty quote would match at every position; provide at least one character")
    )]
    EmptyExact,

    /// A text position selector whose offsets are inverted.
    #[error("text position selector is inverted: start {start} > end {end}")]
    #[diagnostic(code(textanchor::selector::inverted_position))]
    InvertedPosition { start: usize, end: usize },
}

/// A failure produced while a match stream was being driven.
///
/// `Clone` matters here: the cartesian combinator buffers one side of a
/// pairing and must replay a buffered failure identically to every outer
/// iteration that reaches it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Resolve `selector` to a matcher over `source`, applying the refinement
/// composition for any `refinedBy` chain.
///
/// The dispatch is exhaustive over the selector sum type. `CssSelector` is
/// rejected as unsupported: anchoring it delegates entirely to a native
/// query mechanism, which a chunked text source does not have.
///
/// ```
/// use std::sync::Arc;
/// use futures_util::TryStreamExt;
/// use textanchor::create_matcher;
/// use textanchor::selector::TextQuoteSelector;
/// use textanchor::sources::StringSource;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let source = Arc::new(StringSource::new(["To annotate, ", "or not to ", "annotate"]));
/// let matcher = create_matcher(&source, &TextQuoteSelector::new("annotate").into())?;
/// let matches: Vec<_> = matcher(source.whole_scope()).try_collect().await?;
/// assert_eq!(matches.len(), 2);
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// # }).unwrap();
/// ```
pub fn create_matcher<S: ChunkSource>(
    source: &Arc<S>,
    selector: &Selector,
) -> Result<Matcher<S>, SelectorError> {
    let base = match selector {
        Selector::CssSelector(_) => {
            return Err(SelectorError::Unsupported {
                kind: selector.kind().to_string(),
            });
        }
        Selector::TextQuoteSelector(quote) => text_quote::matcher(source, quote)?,
        Selector::TextPositionSelector(position) => text_position::matcher(source, position)?,
        Selector::RangeSelector(range) => range::matcher(source, range)?,
    };

    match selector.refined_by() {
        Some(nested) => {
            debug!(
                kind = selector.kind(),
                refined_by = nested.kind(),
                "constructed refined matcher"
            );
            let refinement = create_matcher(source, nested)?;
            Ok(refine::<S>(base, refinement))
        }
        None => {
            debug!(kind = selector.kind(), "constructed matcher");
            Ok(base)
        }
    }
}
