mod common;

use common::*;
use textanchor::SelectorError;
use textanchor::create_matcher;
use textanchor::selector::TextQuoteSelector;

#[tokio::test]
async fn yields_every_occurrence_in_document_order() {
    let source = source_of(&["To annotate, or ", "not to ", "annotate, that is"]);
    let selector = TextQuoteSelector::new("annotate").into();
    let matcher = create_matcher(&source, &selector).unwrap();
    let matches = collect_matches(&matcher, source.whole_scope()).await;

    assert_eq!(matches.len(), 2);
    assert_eq!(endpoints(&source, &matches[0]), ((0, 3), (0, 11)));
    assert_eq!(endpoints(&source, &matches[1]), ((2, 0), (2, 8)));
    for matched in &matches {
        assert_eq!(source.text_between(matched).unwrap(), "annotate");
    }
}

#[tokio::test]
async fn overlapping_occurrences_each_count() {
    let source = source_of(&["aaa"]);
    let matcher = create_matcher(&source, &TextQuoteSelector::new("aa").into()).unwrap();
    let matches = collect_matches(&matcher, source.whole_scope()).await;

    assert_eq!(matches.len(), 2);
    assert_eq!(endpoints(&source, &matches[0]), ((0, 0), (0, 2)));
    assert_eq!(endpoints(&source, &matches[1]), ((0, 1), (0, 3)));
}

#[tokio::test]
async fn finds_a_quote_spanning_fragment_boundaries() {
    let source = source_of(&["To anno", "ta", "te, or not"]);
    let matcher = create_matcher(&source, &TextQuoteSelector::new("annotate").into()).unwrap();
    let matches = collect_matches(&matcher, source.whole_scope()).await;

    assert_eq!(matches.len(), 1);
    assert_eq!(endpoints(&source, &matches[0]), ((0, 3), (2, 2)));
    assert_eq!(source.text_between(&matches[0]).unwrap(), "annotate");
}

#[tokio::test]
async fn finds_a_quote_straddling_empty_fragments() {
    let source = source_of(&["do", "", "", "lor"]);
    let matcher = create_matcher(&source, &TextQuoteSelector::new("dolor").into()).unwrap();
    let matches = collect_matches(&matcher, source.whole_scope()).await;

    assert_eq!(matches.len(), 1);
    assert_eq!(endpoints(&source, &matches[0]), ((0, 0), (3, 3)));
}

#[tokio::test]
async fn prefix_picks_the_intended_occurrence() {
    let source = source_of(&["To annotate, or not to annotate, that is the question."]);
    let selector = TextQuoteSelector::new("annotate")
        .with_prefix("to ")
        .into();
    let matcher = create_matcher(&source, &selector).unwrap();
    let matches = collect_matches(&matcher, source.whole_scope()).await;

    // "To " differs in case, so only the second occurrence has the context.
    assert_eq!(matches.len(), 1);
    assert_eq!(endpoints(&source, &matches[0]), ((0, 23), (0, 31)));
}

#[tokio::test]
async fn suffix_picks_the_intended_occurrence() {
    let source = source_of(&["To annotate, or not to annotate, that is"]);
    let selector = TextQuoteSelector::new("annotate")
        .with_suffix(", that")
        .into();
    let matcher = create_matcher(&source, &selector).unwrap();
    let matches = collect_matches(&matcher, source.whole_scope()).await;

    assert_eq!(matches.len(), 1);
    assert_eq!(endpoints(&source, &matches[0]), ((0, 23), (0, 31)));
}

#[tokio::test]
async fn context_spanning_fragments_still_disambiguates() {
    let source = source_of(&["ab x", "y ab ", "xz ab"]);
    let selector = TextQuoteSelector::new("ab")
        .with_prefix("xy ")
        .with_suffix(" xz")
        .into();
    let matcher = create_matcher(&source, &selector).unwrap();
    let matches = collect_matches(&matcher, source.whole_scope()).await;

    // Logical text "ab xy ab xz ab": only the middle occurrence fits both.
    assert_eq!(matches.len(), 1);
    assert_eq!(endpoints(&source, &matches[0]), ((1, 2), (1, 4)));
}

#[tokio::test]
async fn unmatched_context_falls_back_to_raw_occurrences() {
    let source = source_of(&["one two one"]);
    let selector = TextQuoteSelector::new("one")
        .with_prefix("NEVER ")
        .into();
    let matcher = create_matcher(&source, &selector).unwrap();
    let matches = collect_matches(&matcher, source.whole_scope()).await;

    // No occurrence carries the prefix, so the quote alone decides: both
    // occurrences come back, still in document order.
    assert_eq!(matches.len(), 2);
    assert_eq!(endpoints(&source, &matches[0]), ((0, 0), (0, 3)));
    assert_eq!(endpoints(&source, &matches[1]), ((0, 8), (0, 11)));
}

#[tokio::test]
async fn context_running_past_the_scope_is_a_mismatch() {
    let source = source_of(&["one two one"]);
    // The suffix cannot fit after the trailing occurrence, so only the
    // leading one matches contextually.
    let selector = TextQuoteSelector::new("one").with_suffix(" two").into();
    let matcher = create_matcher(&source, &selector).unwrap();
    let matches = collect_matches(&matcher, source.whole_scope()).await;

    assert_eq!(matches.len(), 1);
    assert_eq!(endpoints(&source, &matches[0]), ((0, 0), (0, 3)));
}

#[tokio::test]
async fn absent_quote_yields_an_empty_stream() {
    let source = source_of(&lorem_fragments());
    let matcher = create_matcher(&source, &TextQuoteSelector::new("missing").into()).unwrap();
    let matches = collect_matches(&matcher, source.whole_scope()).await;
    assert!(matches.is_empty());
}

#[tokio::test]
async fn quote_search_respects_the_scope_bounds() {
    let source = source_of(&["ab ab ab"]);
    let whole = source.whole_scope();
    // Scope over the middle "b ab a": the outer occurrences are cut off.
    let scope = textanchor::ChunkRange::new(
        whole.start_chunk.clone(),
        1,
        whole.end_chunk.clone(),
        7,
    );
    let matcher = create_matcher(&source, &TextQuoteSelector::new("ab").into()).unwrap();
    let matches = collect_matches(&matcher, scope).await;

    assert_eq!(matches.len(), 1);
    assert_eq!(endpoints(&source, &matches[0]), ((0, 3), (0, 5)));
}

#[tokio::test]
async fn astral_characters_keep_utf16_offsets() {
    let source = source_of(&lorem_fragments());
    let matcher = create_matcher(&source, &TextQuoteSelector::new("ipsum dolor").into()).unwrap();
    let matches = collect_matches(&matcher, source.whole_scope()).await;

    assert_eq!(matches.len(), 1);
    // "ipsum" starts at UTF-16 offset 7: the emoji counts as two units.
    assert_eq!(endpoints(&source, &matches[0]), ((0, 7), (1, 5)));
    assert_eq!(source.text_between(&matches[0]).unwrap(), "ipsum dolor");
}

#[test]
fn empty_exact_fails_at_construction() {
    let source = source_of(&["anything"]);
    let Err(err) = create_matcher(&source, &TextQuoteSelector::new("").into()) else {
        panic!("expected an error");
    };
    assert_eq!(err, SelectorError::EmptyExact);
}
