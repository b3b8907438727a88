//! Fast-scroll rail navigation
//!
//! [`ScrollIndexMapper`] resolves a pointer offset on the rail to a bucket and
//! a bucket to its first row. [`FastScrollRail`] layers drag state on top and
//! only asks for a scroll when the resolved bucket changes mid-drag.

use crate::bucket::Bucket;
use crate::index::BucketIndex;
use std::sync::Arc;

/// Default rail label pitch
pub const DEFAULT_ITEM_HEIGHT: f32 = 16.0;

/// Pointer-to-bucket and bucket-to-row mapping over one index snapshot
#[derive(Debug, Clone, Default)]
pub struct ScrollIndexMapper {
    index: Arc<BucketIndex>,
}

impl ScrollIndexMapper {
    pub fn new(index: Arc<BucketIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &Arc<BucketIndex> {
        &self.index
    }

    /// Bucket under `pointer_y`
    ///
    /// `floor(pointer_y / item_height)` clamped to the rail, so positions above
    /// or below it resolve to the first or last bucket. `None` when the rail is
    /// empty or `item_height` is not a positive number.
    pub fn bucket_at(&self, pointer_y: f32, item_height: f32) -> Option<Bucket> {
        let buckets = self.index.buckets();
        if buckets.is_empty() || item_height.is_nan() || item_height <= 0.0 {
            return None;
        }

        let last = buckets.len() - 1;
        let slot = (pointer_y / item_height).floor();
        let position = if slot.is_nan() || slot <= 0.0 {
            0
        } else {
            (slot as usize).min(last)
        };

        buckets.get(position).copied()
    }

    /// First row of `bucket`, if it is on the rail
    pub fn row_for(&self, bucket: Bucket) -> Option<usize> {
        self.index.row_for(bucket)
    }
}

/// Scroll request produced by the rail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTarget {
    pub bucket: Bucket,
    pub row: usize,
}

/// Drag and tap state for the rail
#[derive(Debug, Clone)]
pub struct FastScrollRail {
    mapper: ScrollIndexMapper,
    item_height: f32,
    highlighted: Option<Bucket>,
}

impl FastScrollRail {
    pub fn new(index: Arc<BucketIndex>, item_height: f32) -> Self {
        Self {
            mapper: ScrollIndexMapper::new(index),
            item_height,
            highlighted: None,
        }
    }

    /// Swap in a new index (the visible rows changed)
    ///
    /// Clears the highlight; scroll position belongs to the list, not the rail.
    pub fn set_index(&mut self, index: Arc<BucketIndex>) {
        self.mapper = ScrollIndexMapper::new(index);
        self.highlighted = None;
    }

    pub fn mapper(&self) -> &ScrollIndexMapper {
        &self.mapper
    }

    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    /// Bucket currently highlighted by a drag
    pub fn highlighted(&self) -> Option<Bucket> {
        self.highlighted
    }

    /// Pointer went down on the rail; always scrolls to the bucket under it
    pub fn drag_start(&mut self, pointer_y: f32) -> Option<ScrollTarget> {
        let bucket = self.mapper.bucket_at(pointer_y, self.item_height)?;
        self.highlighted = Some(bucket);
        self.target(bucket)
    }

    /// Pointer moved; scrolls only when the bucket under it changed
    pub fn drag_move(&mut self, pointer_y: f32) -> Option<ScrollTarget> {
        let bucket = self.mapper.bucket_at(pointer_y, self.item_height)?;
        if self.highlighted == Some(bucket) {
            return None;
        }
        self.highlighted = Some(bucket);
        self.target(bucket)
    }

    /// Direct tap on a label; scrolls without touching the highlight
    pub fn tap(&self, bucket: Bucket) -> Option<ScrollTarget> {
        self.target(bucket)
    }

    /// Drag ended or was cancelled
    pub fn release(&mut self) {
        self.highlighted = None;
    }

    fn target(&self, bucket: Bucket) -> Option<ScrollTarget> {
        self.mapper
            .row_for(bucket)
            .map(|row| ScrollTarget { bucket, row })
    }
}

impl Default for FastScrollRail {
    fn default() -> Self {
        Self::new(Arc::default(), DEFAULT_ITEM_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(titles: &[&str]) -> ScrollIndexMapper {
        ScrollIndexMapper::new(Arc::new(BucketIndex::from_titles(titles.iter().copied())))
    }

    #[test]
    fn pointer_resolves_by_slot() {
        let mapper = mapper(&["Apple", "Banana", "Cherry"]);
        assert_eq!(mapper.bucket_at(0.0, 16.0), Some(Bucket::Letter('A')));
        assert_eq!(mapper.bucket_at(15.9, 16.0), Some(Bucket::Letter('A')));
        assert_eq!(mapper.bucket_at(16.0, 16.0), Some(Bucket::Letter('B')));
        assert_eq!(mapper.bucket_at(40.0, 16.0), Some(Bucket::Letter('C')));
    }

    #[test]
    fn pointer_outside_rail_is_clamped() {
        let mapper = mapper(&["Apple", "Banana", "Cherry"]);
        assert_eq!(mapper.bucket_at(-30.0, 16.0), Some(Bucket::Letter('A')));
        assert_eq!(mapper.bucket_at(10_000.0, 16.0), Some(Bucket::Letter('C')));
        assert_eq!(mapper.bucket_at(f32::INFINITY, 16.0), Some(Bucket::Letter('C')));
    }

    #[test]
    fn empty_rail_or_bad_height_resolves_nothing() {
        assert_eq!(mapper(&[]).bucket_at(0.0, 16.0), None);
        let mapper = mapper(&["Apple"]);
        assert_eq!(mapper.bucket_at(0.0, 0.0), None);
        assert_eq!(mapper.bucket_at(0.0, -1.0), None);
        assert_eq!(mapper.bucket_at(0.0, f32::NAN), None);
    }

    #[test]
    fn drag_only_scrolls_on_bucket_change() {
        let index = Arc::new(BucketIndex::from_titles(["Apple", "Avocado", "Banana"]));
        let mut rail = FastScrollRail::new(index, 16.0);

        let start = rail.drag_start(2.0).unwrap();
        assert_eq!(start.row, 0);
        assert_eq!(rail.highlighted(), Some(Bucket::Letter('A')));

        // Jitter inside the same label
        assert_eq!(rail.drag_move(8.0), None);
        assert_eq!(rail.drag_move(15.0), None);

        let moved = rail.drag_move(17.0).unwrap();
        assert_eq!(moved, ScrollTarget { bucket: Bucket::Letter('B'), row: 2 });

        rail.release();
        assert_eq!(rail.highlighted(), None);
    }

    #[test]
    fn drag_start_always_scrolls() {
        let index = Arc::new(BucketIndex::from_titles(["Apple"]));
        let mut rail = FastScrollRail::new(index, 16.0);
        assert!(rail.drag_start(0.0).is_some());
        rail.release();
        assert!(rail.drag_start(0.0).is_some());
        assert!(rail.drag_start(0.0).is_some());
    }

    #[test]
    fn tap_keeps_highlight() {
        let index = Arc::new(BucketIndex::from_titles(["Apple", "사과"]));
        let mut rail = FastScrollRail::new(index, 16.0);
        assert_eq!(rail.tap(Bucket::Letter('A')).map(|t| t.row), Some(0));
        assert_eq!(rail.highlighted(), None);
        assert_eq!(rail.tap(Bucket::Letter('Z')), None);
    }

    #[test]
    fn new_index_clears_highlight() {
        let mut rail = FastScrollRail::new(Arc::new(BucketIndex::from_titles(["Apple"])), 16.0);
        rail.drag_start(0.0);
        rail.set_index(Arc::new(BucketIndex::from_titles(["Zebra"])));
        assert_eq!(rail.highlighted(), None);
        assert_eq!(rail.drag_move(0.0).map(|t| t.bucket), Some(Bucket::Letter('Z')));
    }
}
