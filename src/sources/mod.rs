//! Text-source adapters.
//!
//! The engine only ever talks to a source through the
//! [`ChunkSource`](crate::chunker::ChunkSource) contract; adapters translate
//! between that contract and a native representation. This module ships the
//! flat in-memory adapter; tree-shaped sources live in their own crates and
//! plug into the same traits.

mod string;

pub use string::{StringChunk, StringChunker, StringSource};
