//! # textanchor: anchor abstract selectors to fragmented text
//!
//! `textanchor` locates an abstract, document-independent selector (a
//! quoted snippet, a character-offset pair, a structural range, or a
//! refinement chain of these) inside a traversable, chunked text source,
//! producing zero or more matching spans as a lazy, ordered stream.
//!
//! ## Core Concepts
//!
//! - **Chunks**: the fragments a source is made of, walked one at a time
//!   through a cursor so fragmentation stays invisible to selectors
//! - **Selectors**: immutable Web Annotation-style descriptions of a span,
//!   serializable to and from the annotation JSON model
//! - **Matchers**: functions from a scope to a pull-based stream of
//!   matches, composable through ranges and refinement
//! - **Sources**: adapters translating a native text representation into
//!   the chunk contract and matches back into native coordinates
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use futures_util::TryStreamExt;
//! use textanchor::create_matcher;
//! use textanchor::selector::{Selector, TextQuoteSelector};
//! use textanchor::sources::StringSource;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! // One logical string, fragmented the way a live document might be.
//! let source = Arc::new(StringSource::new(["To annotate, or ", "not to ", "annotate,"]));
//!
//! let selector: Selector = TextQuoteSelector::new("annotate")
//!     .with_prefix("to ")
//!     .into();
//!
//! let matcher = create_matcher(&source, &selector)?;
//! let matches: Vec<_> = matcher(source.whole_scope()).try_collect().await?;
//!
//! assert_eq!(matches.len(), 1);
//! assert_eq!(source.text_between(&matches[0])?, "annotate");
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```
//!
//! ## Ordering and Laziness
//!
//! Matchers yield in document order: a position selector resolves to at
//! most one span, a quote selector yields occurrences left to right, a
//! range selector yields start/end pairs in outer-then-inner order, and a
//! refinement flattens nested results depth-first. Production is pull
//! based throughout: a consumer that stops polling cancels the remaining
//! traversal work, and combinatorial selectors never require materializing
//! all matches eagerly.
//!
//! ## Offsets
//!
//! Every offset in the crate, selector positions and chunk-local indices
//! alike, counts UTF-16 code units, the string indexing the Web Annotation model
//! inherits from the DOM. See [`chunk::utf16_len`].

pub mod cartesian;
pub mod chunk;
pub mod chunker;
pub mod matcher;
pub mod range;
pub mod refinement;
pub mod selector;
pub mod sources;
pub mod text_position;
pub mod text_quote;

pub use chunk::{Chunk, ChunkRange};
pub use chunker::{ChunkSource, Chunker, SourceError};
pub use matcher::{MatchError, MatchStream, Matcher, SelectorError, create_matcher};
pub use selector::Selector;
