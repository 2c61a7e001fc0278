#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Uniform grid spatial index used as a candidate filter for barrier queries.
//!
//! The index is deliberately coarse: [`SpatialIndex::query`] returns every
//! id whose cell overlaps the query square, not every id that actually
//! intersects the query circle. Callers run an exact narrow-phase test
//! (circle–rectangle overlap) against the returned candidates.

use std::collections::{BTreeMap, BTreeSet};

use arena_core::{BarrierId, Rect, Vec2, TILE_SIZE};

/// A uniform grid over the playfield, bucketing barrier ids by the cells
/// their footprint overlaps.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    cells: BTreeMap<(i32, i32), BTreeSet<BarrierId>>,
    footprints: BTreeMap<BarrierId, Rect>,
}

impl SpatialIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every entry, returning the index to its initial state.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.footprints.clear();
    }

    /// Places `id` into every cell its rectangle overlaps.
    ///
    /// Re-inserting an id already present first removes its prior
    /// footprint, so callers never need to call [`SpatialIndex::remove`]
    /// themselves before an update.
    pub fn insert(&mut self, id: BarrierId, position: Vec2, size: Vec2) {
        self.remove(id);
        let rect = Rect::from_origin_size(position, size);
        for cell in cells_covering(&rect) {
            self.cells.entry(cell).or_default().insert(id);
        }
        self.footprints.insert(id, rect);
    }

    /// Removes `id` from every cell it was placed into. A no-op if `id`
    /// was never inserted.
    pub fn remove(&mut self, id: BarrierId) {
        if let Some(rect) = self.footprints.remove(&id) {
            for cell in cells_covering(&rect) {
                if let Some(bucket) = self.cells.get_mut(&cell) {
                    bucket.remove(&id);
                    if bucket.is_empty() {
                        self.cells.remove(&cell);
                    }
                }
            }
        }
    }

    /// Returns every id whose cell overlaps the bounding square
    /// `[center.x ± radius] × [center.y ± radius]`.
    ///
    /// Results are deduplicated but not sorted by distance; this is a
    /// candidate filter, not a collision solver.
    #[must_use]
    pub fn query(&self, center: Vec2, radius: f32) -> Vec<BarrierId> {
        let query_rect = Rect::from_origin_size(
            Vec2::new(center.x - radius, center.y - radius),
            Vec2::new(radius * 2.0, radius * 2.0),
        );
        let mut found = BTreeSet::new();
        for cell in cells_covering(&query_rect) {
            if let Some(bucket) = self.cells.get(&cell) {
                found.extend(bucket.iter().copied());
            }
        }
        found.into_iter().collect()
    }
}

fn cells_covering(rect: &Rect) -> impl Iterator<Item = (i32, i32)> {
    let min_col = (rect.left() / TILE_SIZE).floor() as i32;
    let max_col = ((rect.right() - f32::EPSILON) / TILE_SIZE).floor() as i32;
    let min_row = (rect.top() / TILE_SIZE).floor() as i32;
    let max_row = ((rect.bottom() - f32::EPSILON) / TILE_SIZE).floor() as i32;
    (min_row..=max_row).flat_map(move |row| (min_col..=max_col).map(move |col| (col, row)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_finds_inserted_barrier() {
        let mut index = SpatialIndex::new();
        index.insert(BarrierId::new(1), Vec2::new(400.0, 400.0), Vec2::new(80.0, 80.0));
        let hits = index.query(Vec2::new(420.0, 420.0), 10.0);
        assert_eq!(hits, vec![BarrierId::new(1)]);
    }

    #[test]
    fn remove_clears_all_covered_cells() {
        let mut index = SpatialIndex::new();
        index.insert(BarrierId::new(1), Vec2::new(0.0, 0.0), Vec2::new(200.0, 200.0));
        index.remove(BarrierId::new(1));
        assert!(index.query(Vec2::new(50.0, 50.0), 10.0).is_empty());
    }

    #[test]
    fn reinserting_moves_the_footprint() {
        let mut index = SpatialIndex::new();
        index.insert(BarrierId::new(1), Vec2::new(0.0, 0.0), Vec2::new(80.0, 80.0));
        index.insert(BarrierId::new(1), Vec2::new(800.0, 600.0), Vec2::new(80.0, 80.0));
        assert!(index.query(Vec2::new(40.0, 40.0), 10.0).is_empty());
        assert_eq!(index.query(Vec2::new(840.0, 640.0), 10.0), vec![BarrierId::new(1)]);
    }

    #[test]
    fn query_spans_multiple_cells() {
        let mut index = SpatialIndex::new();
        index.insert(BarrierId::new(1), Vec2::new(70.0, 70.0), Vec2::new(20.0, 20.0));
        let hits = index.query(Vec2::new(80.0, 80.0), 5.0);
        assert_eq!(hits, vec![BarrierId::new(1)]);
    }
}
