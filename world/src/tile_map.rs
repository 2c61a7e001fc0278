//! The immutable-after-load tile grid and its pixel/grid conversions.

use std::collections::BTreeMap;

use arena_core::{
    grid_in_bounds, grid_to_pixel_center as grid_to_pixel_center_raw, pixel_to_grid, TileKind, Vec2,
    GRID_COLUMNS, GRID_ROWS,
};

/// A 16×9 grid of tile kinds, row-major, built once at `load_map` and
/// mutated only through [`TileMap::set_tile`] (expected to be rare — map
/// editors and tests, not live simulation).
#[derive(Clone, Debug)]
pub struct TileMap {
    tiles: Vec<Vec<TileKind>>,
    kind_index: BTreeMap<TileKind, Vec<(u32, u32)>>,
}

impl TileMap {
    /// Builds a tile map from a validated, exactly `GRID_ROWS`×`GRID_COLUMNS`
    /// grid. Panics if the shape is wrong; callers are expected to have run
    /// [`arena_core::validate`] first, which rejects malformed shapes
    /// before a `TileMap` is ever constructed.
    #[must_use]
    pub fn load(tiles: Vec<Vec<TileKind>>) -> Self {
        assert_eq!(tiles.len(), GRID_ROWS as usize, "tile map must have exactly GRID_ROWS rows");
        for row in &tiles {
            assert_eq!(row.len(), GRID_COLUMNS as usize, "tile map row must have exactly GRID_COLUMNS columns");
        }
        let kind_index = build_index(&tiles);
        Self { tiles, kind_index }
    }

    /// Looks up the tile at grid coordinate `(column, row)`. `None` if out
    /// of bounds.
    #[must_use]
    pub fn get_tile(&self, column: u32, row: u32) -> Option<TileKind> {
        if !grid_in_bounds(column as i32, row as i32) {
            return None;
        }
        self.tiles.get(row as usize).and_then(|r| r.get(column as usize)).copied()
    }

    /// Looks up the tile containing pixel `(x, y)`. `None` if the pixel
    /// lies outside the playfield.
    #[must_use]
    pub fn get_tile_at_pixel(&self, x: f32, y: f32) -> Option<TileKind> {
        let (column, row) = pixel_to_grid(x, y);
        if !grid_in_bounds(column, row) {
            return None;
        }
        self.get_tile(column as u32, row as u32)
    }

    /// Overwrites the tile at `(column, row)` and rebuilds the kind index.
    /// A no-op, logged, for an out-of-bounds coordinate.
    pub fn set_tile(&mut self, column: u32, row: u32, kind: TileKind) {
        if !grid_in_bounds(column as i32, row as i32) {
            log::warn!("set_tile: ({column}, {row}) is out of bounds, ignoring");
            return;
        }
        self.tiles[row as usize][column as usize] = kind;
        self.kind_index = build_index(&self.tiles);
    }

    /// Every grid coordinate currently holding `kind`, per the cached
    /// index built at load (and rebuilt on `set_tile`).
    #[must_use]
    pub fn tiles_by_kind(&self, kind: TileKind) -> &[(u32, u32)] {
        self.kind_index.get(&kind).map_or(&[], |entries| entries.as_slice())
    }

    /// Reports whether `(column, row)` can be walked across, i.e. is not a
    /// wall or half-wall. Out-of-bounds coordinates are not walkable.
    #[must_use]
    pub fn walkable(&self, column: u32, row: u32) -> bool {
        self.get_tile(column, row).is_some_and(TileKind::walkable)
    }

    /// Pixel coordinate of the center of grid cell `(column, row)`.
    #[must_use]
    pub fn grid_to_pixel_center(&self, column: u32, row: u32) -> Vec2 {
        grid_to_pixel_center_raw(column, row)
    }
}

fn build_index(tiles: &[Vec<TileKind>]) -> BTreeMap<TileKind, Vec<(u32, u32)>> {
    let mut index: BTreeMap<TileKind, Vec<(u32, u32)>> = BTreeMap::new();
    for (row, columns) in tiles.iter().enumerate() {
        for (column, kind) in columns.iter().enumerate() {
            index.entry(*kind).or_default().push((column as u32, row as u32));
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_grid() -> Vec<Vec<TileKind>> {
        vec![vec![TileKind::Floor; GRID_COLUMNS as usize]; GRID_ROWS as usize]
    }

    #[test]
    fn pixel_lookup_matches_grid_lookup_across_cell_interior() {
        let mut tiles = floor_grid();
        tiles[2][3] = TileKind::Wall;
        let map = TileMap::load(tiles);

        for &(dx, dy) in &[(0.0, 0.0), (40.0, 40.0), (79.0, 79.0)] {
            let pixel_kind = map.get_tile_at_pixel(3.0 * 80.0 + dx, 2.0 * 80.0 + dy);
            assert_eq!(pixel_kind, Some(TileKind::Wall));
        }
    }

    #[test]
    fn set_tile_invalidates_the_kind_index() {
        let mut map = TileMap::load(floor_grid());
        assert!(map.tiles_by_kind(TileKind::Wall).is_empty());
        map.set_tile(5, 5, TileKind::Wall);
        assert_eq!(map.tiles_by_kind(TileKind::Wall), &[(5, 5)]);
    }

    #[test]
    fn walkable_rejects_walls_and_out_of_bounds() {
        let mut map = TileMap::load(floor_grid());
        map.set_tile(0, 0, TileKind::HalfWall);
        assert!(!map.walkable(0, 0));
        assert!(!map.walkable(GRID_COLUMNS, 0));
        assert!(map.walkable(1, 0));
    }
}
