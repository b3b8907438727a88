//! Property tests for favorite toggling

mod test_helpers;

use lark_core::TrackId;
use proptest::prelude::*;
use std::collections::HashSet;
use test_helpers::*;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A track is a favorite iff it started as one XOR it was toggled an odd number of times
    #[test]
    fn toggles_compose_as_parity(
        initial in proptest::collection::hash_set(1usize..=6, 0..6),
        toggles in proptest::collection::vec(1usize..=6, 0..24),
    ) {
        runtime().block_on(async {
            let initial_ids: Vec<String> = initial.iter().map(ToString::to_string).collect();
            let initial_refs: Vec<&str> = initial_ids.iter().map(String::as_str).collect();
            let harness = Harness::new(
                FakeScanner::new(library()),
                MemoryFavorites::with(&initial_refs),
                MemoryLyrics::default(),
            );
            harness.session.load_music().await;

            for id in &toggles {
                harness
                    .session
                    .toggle_favorite(&TrackId::new(id.to_string()))
                    .await
                    .unwrap();
            }

            let expected: HashSet<String> = (1..=6usize)
                .filter(|id| {
                    let flips = toggles.iter().filter(|t| *t == id).count();
                    initial.contains(id) ^ (flips % 2 == 1)
                })
                .map(|id| id.to_string())
                .collect();

            let shown: HashSet<String> = harness
                .session
                .favorite_tracks()
                .into_iter()
                .map(|track| track.id.to_string())
                .collect();
            let stored: HashSet<String> = (1..=6usize)
                .map(|id| id.to_string())
                .filter(|id| harness.favorites.contains(id))
                .collect();

            assert_eq!(shown, expected);
            assert_eq!(stored, expected);

            harness.shutdown().await;
        });
    }
}
