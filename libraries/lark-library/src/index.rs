//! Library index construction
//!
//! Turns a raw scan plus the favorite-id set and the search query into the
//! visible row list and the fast-scroll [`BucketIndex`] computed over exactly
//! those rows.

use crate::bucket::{classify_title, Bucket};
use lark_core::types::{RawTrack, Track, TrackId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Fast-scroll index for one row snapshot
///
/// `buckets` is the rail display order (Hangul initials, then letters, then
/// `#`, each group in first-seen order). `first_rows` maps every listed bucket
/// to the row of its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketIndex {
    buckets: Vec<Bucket>,
    first_rows: HashMap<Bucket, usize>,
}

impl BucketIndex {
    /// Build the index over `rows` in order
    ///
    /// A bucket registers a jump target only when it differs from the previous
    /// row's bucket and has not been registered before, so a later run of the
    /// same bucket never moves its target. Rows with an empty title are skipped
    /// without resetting the previous bucket.
    pub fn from_rows(rows: &[Track]) -> Self {
        Self::from_titles(rows.iter().map(|track| track.title.as_str()))
    }

    /// Build the index over a sequence of titles
    pub fn from_titles<'a>(titles: impl IntoIterator<Item = &'a str>) -> Self {
        let mut buckets = Vec::new();
        let mut first_rows = HashMap::new();
        let mut previous: Option<Bucket> = None;

        for (row, title) in titles.into_iter().enumerate() {
            let Some(bucket) = classify_title(title) else {
                continue;
            };

            if previous != Some(bucket) {
                if let std::collections::hash_map::Entry::Vacant(entry) = first_rows.entry(bucket)
                {
                    entry.insert(row);
                    buckets.push(bucket);
                }
                previous = Some(bucket);
            }
        }

        // Stable: ties keep first-seen order
        buckets.sort_by_key(|bucket| bucket.group());

        Self {
            buckets,
            first_rows,
        }
    }

    /// Buckets in rail display order
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Row of the bucket's first occurrence
    pub fn row_for(&self, bucket: Bucket) -> Option<usize> {
        self.first_rows.get(&bucket).copied()
    }

    /// Number of buckets on the rail
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the rail is empty
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Rail entries with their jump targets, in display order
    pub fn entries(&self) -> impl Iterator<Item = (Bucket, usize)> + '_ {
        self.buckets
            .iter()
            .filter_map(|bucket| self.row_for(*bucket).map(|row| (*bucket, row)))
    }
}

/// Visible rows plus the index computed over them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryView {
    /// Rows in listing order after filtering
    pub rows: Vec<Track>,

    /// Fast-scroll index over `rows`
    pub index: Arc<BucketIndex>,
}

impl LibraryView {
    /// Find a visible row by track id
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.rows.iter().position(|track| &track.id == id)
    }

    /// Whether nothing is visible
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Overlay the favorite flag onto a raw scan
///
/// `is_favorite` is recomputed from `favorite_ids` for every track; nothing is
/// carried over from earlier snapshots.
pub fn overlay_favorites(raw_tracks: &[RawTrack], favorite_ids: &HashSet<TrackId>) -> Vec<Track> {
    raw_tracks
        .iter()
        .map(|raw| {
            let is_favorite = favorite_ids.contains(&raw.id);
            Track::from_raw(raw.clone(), is_favorite)
        })
        .collect()
}

/// Whether a track matches the search query
///
/// Case-insensitive substring match against title or artist. A blank query
/// matches everything.
pub fn matches_query(track: &Track, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    track.title.to_lowercase().contains(&needle) || track.artist.to_lowercase().contains(&needle)
}

/// Keep the tracks matching `query`, in order
pub fn filter_tracks(tracks: &[Track], query: &str) -> Vec<Track> {
    if query.trim().is_empty() {
        return tracks.to_vec();
    }

    tracks
        .iter()
        .filter(|track| matches_query(track, query))
        .cloned()
        .collect()
}

/// Build the visible rows and their bucket index
///
/// Pure function of its inputs. The query is applied before the index is
/// computed, so the rail always reflects the visible rows.
pub fn build(
    raw_tracks: &[RawTrack],
    favorite_ids: &HashSet<TrackId>,
    search_query: &str,
) -> LibraryView {
    let all = overlay_favorites(raw_tracks, favorite_ids);
    let rows = filter_tracks(&all, search_query);
    let index = Arc::new(BucketIndex::from_rows(&rows));
    LibraryView { rows, index }
}

/// Index builder memoized on the filtered row titles
///
/// Changing only the query or the favorite set reuses the previous index when
/// the visible titles are unchanged.
#[derive(Debug, Default)]
pub struct LibraryIndexBuilder {
    memo: Option<(Vec<String>, Arc<BucketIndex>)>,
}

impl LibraryIndexBuilder {
    /// Create a builder with an empty memo
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay, filter and index
    pub fn build(
        &mut self,
        raw_tracks: &[RawTrack],
        favorite_ids: &HashSet<TrackId>,
        search_query: &str,
    ) -> LibraryView {
        let all = overlay_favorites(raw_tracks, favorite_ids);
        let rows = filter_tracks(&all, search_query);
        let index = self.index_for(&rows);
        LibraryView { rows, index }
    }

    /// Index for already filtered rows, reusing the memo when titles match
    pub fn index_for(&mut self, rows: &[Track]) -> Arc<BucketIndex> {
        if let Some((titles, index)) = &self.memo {
            if titles.len() == rows.len()
                && titles.iter().zip(rows).all(|(title, track)| *title == track.title)
            {
                return Arc::clone(index);
            }
        }

        let index = Arc::new(BucketIndex::from_rows(rows));
        let titles = rows.iter().map(|track| track.title.clone()).collect();
        self.memo = Some((titles, Arc::clone(&index)));
        index
    }

    /// Drop the memo (e.g. after a rescan)
    pub fn invalidate(&mut self) {
        self.memo = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, title: &str, artist: &str) -> RawTrack {
        RawTrack::new(TrackId::new(id), title, artist, format!("/music/{id}.mp3"))
    }

    fn symbols(index: &BucketIndex) -> Vec<char> {
        index.buckets().iter().map(|b| b.symbol()).collect()
    }

    #[test]
    fn rail_order_is_hangul_letters_other() {
        let index = BucketIndex::from_titles(["Bravo", "가을", "1984", "Alpha"]);
        assert_eq!(symbols(&index), vec!['ㄱ', 'A', 'B', '#']);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let index = BucketIndex::from_titles(["Zulu", "Alpha", "하늘", "가을", "2", "!"]);
        // Not alphabetical: Z was seen before A, ㅎ before ㄱ
        assert_eq!(symbols(&index), vec!['ㅎ', 'ㄱ', 'Z', 'A', '#']);
    }

    #[test]
    fn jump_target_is_first_occurrence() {
        let index = BucketIndex::from_titles(["Apple", "Avocado", "Banana", "Apricot"]);
        assert_eq!(index.row_for(Bucket::Letter('A')), Some(0));
        assert_eq!(index.row_for(Bucket::Letter('B')), Some(2));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn empty_titles_are_skipped_but_rows_kept() {
        let view = build(
            &[raw("1", "", "x"), raw("2", "Song", "y"), raw("3", "", "z")],
            &HashSet::new(),
            "",
        );
        assert_eq!(view.rows.len(), 3);
        assert_eq!(symbols(&view.index), vec!['S']);
        assert_eq!(view.index.row_for(Bucket::Letter('S')), Some(1));
    }

    #[test]
    fn unknown_bucket_has_no_target() {
        let index = BucketIndex::from_titles(["Alpha"]);
        assert_eq!(index.row_for(Bucket::Letter('Q')), None);
    }

    #[test]
    fn overlay_is_recomputed_from_the_set() {
        let tracks = [raw("1", "One", "a"), raw("2", "Two", "b")];
        let favorites: HashSet<_> = [TrackId::new("2")].into_iter().collect();
        let view = build(&tracks, &favorites, "");
        assert!(!view.rows[0].is_favorite);
        assert!(view.rows[1].is_favorite);
    }

    #[test]
    fn query_matches_title_or_artist_ignoring_case() {
        let tracks = [
            raw("1", "Crazy in Love", "Beyoncé"),
            raw("2", "Yellow", "Coldplay"),
            raw("3", "Halo", "LOVEJOY"),
        ];
        let view = build(&tracks, &HashSet::new(), "love");
        let ids: Vec<_> = view.rows.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn blank_query_keeps_everything() {
        let tracks = [raw("1", "A", "a"), raw("2", "B", "b")];
        assert_eq!(build(&tracks, &HashSet::new(), "   ").rows.len(), 2);
        assert_eq!(build(&tracks, &HashSet::new(), "").rows.len(), 2);
    }

    #[test]
    fn index_covers_only_filtered_rows() {
        let tracks = [
            raw("1", "Apple", "x"),
            raw("2", "Love Song", "x"),
            raw("3", "사랑 love", "x"),
            raw("4", "Zebra", "x"),
        ];
        let view = build(&tracks, &HashSet::new(), "love");
        assert_eq!(symbols(&view.index), vec!['ㅅ', 'L']);
        assert_eq!(view.index.row_for(Bucket::Letter('L')), Some(0));
        assert_eq!(view.index.row_for(Bucket::Hangul('ㅅ')), Some(1));
        assert_eq!(view.index.row_for(Bucket::Letter('A')), None);
    }

    #[test]
    fn builder_reuses_index_for_same_titles() {
        let tracks = [raw("1", "Apple", "x"), raw("2", "Banana", "y")];
        let mut builder = LibraryIndexBuilder::new();

        let first = builder.build(&tracks, &HashSet::new(), "");
        let favorites: HashSet<_> = [TrackId::new("1")].into_iter().collect();
        let second = builder.build(&tracks, &favorites, "");
        assert!(Arc::ptr_eq(&first.index, &second.index));
        assert!(second.rows[0].is_favorite);

        let third = builder.build(&tracks, &favorites, "ban");
        assert!(!Arc::ptr_eq(&second.index, &third.index));
        assert_eq!(third.index.buckets(), &[Bucket::Letter('B')]);
    }

    #[test]
    fn position_of_finds_visible_rows() {
        let view = build(&[raw("1", "A", "a"), raw("2", "B", "b")], &HashSet::new(), "");
        assert_eq!(view.position_of(&TrackId::new("2")), Some(1));
        assert_eq!(view.position_of(&TrackId::new("9")), None);
    }
}
