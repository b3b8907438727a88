//! Property-based tests for the bucket index
//!
//! Titles are drawn from a small mixed alphabet so runs, repeats and every
//! bucket group show up often.

use lark_core::types::{RawTrack, TrackId};
use lark_library::{build, classify_title, BucketGroup, BucketIndex, ScrollIndexMapper};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

fn title_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            'a', 'b', 'Z', 'é', '가', '나', '힣', 'ㄱ', '1', '#', ' ', '🎵',
        ]),
        0..4,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn raw_tracks(titles: &[String]) -> Vec<RawTrack> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            RawTrack::new(
                TrackId::new(i.to_string()),
                title.clone(),
                format!("artist {i}"),
                format!("/music/{i}.mp3"),
            )
        })
        .collect()
}

proptest! {
    /// Property: every bucket jumps to its first occurrence in the list
    #[test]
    fn jump_target_is_first_occurrence(titles in prop::collection::vec(title_strategy(), 0..40)) {
        let index = BucketIndex::from_titles(titles.iter().map(String::as_str));

        for bucket in index.buckets() {
            let first = titles.iter().position(|t| classify_title(t) == Some(*bucket));
            prop_assert_eq!(index.row_for(*bucket), first);
        }
    }

    /// Property: the rail lists exactly the distinct buckets of non-empty titles
    #[test]
    fn rail_lists_each_bucket_once(titles in prop::collection::vec(title_strategy(), 0..40)) {
        let index = BucketIndex::from_titles(titles.iter().map(String::as_str));

        let expected: HashSet<_> = titles.iter().filter_map(|t| classify_title(t)).collect();
        let listed: HashSet<_> = index.buckets().iter().copied().collect();
        prop_assert_eq!(listed.len(), index.len());
        prop_assert_eq!(listed, expected);
    }

    /// Property: groups are ordered and ties keep first-seen order
    #[test]
    fn rail_is_grouped_in_first_seen_order(titles in prop::collection::vec(title_strategy(), 0..40)) {
        let index = BucketIndex::from_titles(titles.iter().map(String::as_str));
        let buckets = index.buckets();

        for pair in buckets.windows(2) {
            prop_assert!(pair[0].group() <= pair[1].group());
            if pair[0].group() == pair[1].group() {
                prop_assert!(index.row_for(pair[0]) < index.row_for(pair[1]));
            }
        }
    }

    /// Property: the index is always computed over the filtered rows
    #[test]
    fn index_matches_visible_rows(
        titles in prop::collection::vec(title_strategy(), 0..30),
        query in prop::sample::select(vec!["", "  ", "a", "가", "1", "artist 1", "Z"]),
    ) {
        let view = build(&raw_tracks(&titles), &HashSet::new(), query);
        let expected = BucketIndex::from_rows(&view.rows);
        prop_assert_eq!(view.index.as_ref(), &expected);

        for (bucket, row) in view.index.entries() {
            prop_assert!(row < view.rows.len());
            prop_assert_eq!(classify_title(&view.rows[row].title), Some(bucket));
        }
    }

    /// Property: the rail pointer always lands on a listed bucket
    #[test]
    fn pointer_always_resolves_on_nonempty_rail(
        titles in prop::collection::vec(title_strategy(), 1..30),
        pointer_y in -500.0f32..5000.0,
        item_height in 1.0f32..64.0,
    ) {
        let index = Arc::new(BucketIndex::from_titles(titles.iter().map(String::as_str)));
        let mapper = ScrollIndexMapper::new(Arc::clone(&index));

        match mapper.bucket_at(pointer_y, item_height) {
            Some(bucket) => {
                prop_assert!(index.buckets().contains(&bucket));
                prop_assert!(mapper.row_for(bucket).is_some());
            }
            None => prop_assert!(index.is_empty()),
        }
    }
}

#[test]
fn scan_order_example_reorders_rail() {
    let index = BucketIndex::from_titles(["Bravo", "기차", "#1", "Alpha"]);
    let symbols: String = index.buckets().iter().map(|b| b.symbol()).collect();
    assert_eq!(symbols, "ㄱAB#");
    assert_eq!(index.buckets()[0].group(), BucketGroup::Hangul);
}

#[test]
fn later_run_does_not_move_target() {
    // A, B, A again: the second A run must not re-register
    let index = BucketIndex::from_titles(["Alpha", "Bravo", "Apex", "Azure"]);
    assert_eq!(index.row_for(lark_library::Bucket::Letter('A')), Some(0));
}

#[test]
fn filter_then_index_love_example() {
    let titles: Vec<String> = ["Endless Love", "Apple", "lovely day", "Zoo"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let view = build(&raw_tracks(&titles), &HashSet::new(), "LOVE");
    let visible: Vec<_> = view.rows.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(visible, vec!["Endless Love", "lovely day"]);
    let symbols: String = view.index.buckets().iter().map(|b| b.symbol()).collect();
    assert_eq!(symbols, "EL");
}
