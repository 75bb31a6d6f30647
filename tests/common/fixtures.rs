use std::sync::Arc;

use futures_util::TryStreamExt;
use textanchor::chunk::{ChunkRange, utf16_len};
use textanchor::matcher::Matcher;
use textanchor::sources::{StringChunk, StringSource};
use tracing_subscriber::EnvFilter;

/// Install an env-filtered subscriber so `RUST_LOG` surfaces the engine's
/// tracing during a test run. Idempotent; later calls are no-ops.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The logical text of the shared anchoring scenario. `😃` is an astral
/// character, so UTF-16 offsets and char counts disagree on purpose.
#[allow(dead_code)]
pub const LOREM: &str = "l😃rem ipsum dolor amet yada yada";

/// The scenario's fragmentation: boundaries deliberately misaligned with
/// the words a selector would target.
#[allow(dead_code)]
pub fn lorem_fragments() -> Vec<&'static str> {
    vec!["l😃rem ipsum ", "dolor", " am", "et yada yada"]
}

/// The same fragmentation with empty fragments interposed around every
/// boundary, the way edits leave zero-length nodes behind.
#[allow(dead_code)]
pub fn lorem_with_empties() -> Vec<&'static str> {
    vec![
        "", "l😃rem ipsum ", "", "dolor", "", " am", "", "et yada yada", "",
    ]
}

#[allow(dead_code)]
pub fn source_of(fragments: &[&str]) -> Arc<StringSource> {
    Arc::new(StringSource::new(fragments.iter().copied()))
}

/// Drive a matcher over a scope and collect every match, failing the test
/// on a stream error.
#[allow(dead_code)]
pub async fn collect_matches(
    matcher: &Matcher<StringSource>,
    scope: ChunkRange<StringChunk>,
) -> Vec<ChunkRange<StringChunk>> {
    init_tracing();
    matcher(scope)
        .try_collect()
        .await
        .expect("match stream failed")
}

/// A match reduced to absolute `(fragment, UTF-16 offset)` boundary pairs.
#[allow(dead_code)]
pub fn endpoints(
    source: &StringSource,
    range: &ChunkRange<StringChunk>,
) -> ((usize, usize), (usize, usize)) {
    source.resolve_range(range)
}

/// Map an absolute `(fragment, offset)` boundary to its logical offset in
/// the concatenation of `fragments`.
#[allow(dead_code)]
pub fn logical_offset(fragments: &[&str], boundary: (usize, usize)) -> usize {
    fragments[..boundary.0]
        .iter()
        .map(|fragment| utf16_len(fragment))
        .sum::<usize>()
        + boundary.1
}
