// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen partitioning: cell and sub-cell placement in pixels.

use crate::cell::{CELL_ID_CAPACITY, CellId};
use crate::subcell::SubCellId;

/// Default edge length of a grid cell, in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 50;

/// Number of sub-cells along each edge of a cell.
pub const SUBGRID_DIVISIONS: u32 = 3;

/// A pixel position in screen space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    /// Horizontal offset from the left edge of the screen.
    pub x: u32,
    /// Vertical offset from the top edge of the screen.
    pub y: u32,
}

impl PixelPoint {
    /// Create a new point.
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Screen dimensions plus the fixed cell edge.
///
/// Columns and rows round up, so a partial cell at the right or bottom edge is
/// still addressable. Cells are numbered row-major: rows outer, columns inner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    width: u32,
    height: u32,
    cell_size: u32,
}

impl GridGeometry {
    /// Grid over a `width`×`height` screen using [`DEFAULT_CELL_SIZE`].
    pub const fn new(width: u32, height: u32) -> Self {
        Self::with_cell_size(width, height, DEFAULT_CELL_SIZE)
    }

    /// Grid over a `width`×`height` screen with a custom cell edge.
    ///
    /// A zero edge is clamped to one pixel.
    pub const fn with_cell_size(width: u32, height: u32, cell_size: u32) -> Self {
        Self {
            width,
            height,
            cell_size: if cell_size == 0 { 1 } else { cell_size },
        }
    }

    /// Screen width in pixels.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Screen height in pixels.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell edge length in pixels.
    pub const fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Sub-cell edge length in pixels (integer division of the cell edge).
    pub const fn subcell_size(&self) -> u32 {
        self.cell_size / SUBGRID_DIVISIONS
    }

    /// Number of columns covering the screen width.
    pub const fn columns(&self) -> u32 {
        self.width.div_ceil(self.cell_size)
    }

    /// Number of rows covering the screen height.
    pub const fn rows(&self) -> u32 {
        self.height.div_ceil(self.cell_size)
    }

    /// Number of addressable cells, capped at the number of distinct ids.
    pub fn cell_count(&self) -> usize {
        let cells = u64::from(self.columns()) * u64::from(self.rows());
        usize::try_from(cells).map_or(CELL_ID_CAPACITY, |c| c.min(CELL_ID_CAPACITY))
    }

    /// The cell at linear `index`, if it lies on screen and has an id.
    pub fn cell_at_index(&self, index: usize) -> Option<GridCell> {
        let id = CellId::from_index(index)?;
        let columns = usize::try_from(self.columns()).ok()?;
        if columns == 0 {
            return None;
        }
        let column = u32::try_from(index % columns).ok()?;
        let row = u32::try_from(index / columns).ok()?;
        if row >= self.rows() {
            return None;
        }
        Some(GridCell {
            index,
            id,
            origin: PixelPoint::new(column * self.cell_size, row * self.cell_size),
            size: self.cell_size,
        })
    }

    /// The cell named `id`, if it lies within the screen bounds.
    pub fn cell(&self, id: CellId) -> Option<GridCell> {
        self.cell_at_index(id.index())
    }

    /// Top-left pixel of the cell named `id`.
    pub fn origin_of(&self, id: CellId) -> Option<PixelPoint> {
        self.cell(id).map(|cell| cell.origin)
    }

    /// Center pixel of the cell named `id`.
    pub fn cell_center(&self, id: CellId) -> Option<PixelPoint> {
        self.cell(id).map(|cell| cell.center())
    }

    /// Top-left pixel of sub-cell `sub` inside the cell named `id`.
    pub fn subcell_origin(&self, id: CellId, sub: SubCellId) -> Option<PixelPoint> {
        self.cell(id).map(|cell| cell.subcell(sub).origin)
    }

    /// Center pixel of sub-cell `sub` inside the cell named `id`.
    ///
    /// Requires the parent cell to resolve.
    pub fn subcell_center(&self, id: CellId, sub: SubCellId) -> Option<PixelPoint> {
        self.cell(id).map(|cell| cell.subcell(sub).center())
    }

    /// Every addressable cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.cell_count()).filter_map(|index| self.cell_at_index(index))
    }
}

/// One addressable cell of the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridCell {
    /// Linear row-major index.
    pub index: usize,
    /// Two-character id derived from `index`.
    pub id: CellId,
    /// Top-left pixel.
    pub origin: PixelPoint,
    /// Edge length in pixels.
    pub size: u32,
}

impl GridCell {
    /// Center pixel of the cell.
    pub const fn center(&self) -> PixelPoint {
        PixelPoint::new(self.origin.x + self.size / 2, self.origin.y + self.size / 2)
    }

    /// Sub-cell edge length in pixels.
    pub const fn subcell_size(&self) -> u32 {
        self.size / SUBGRID_DIVISIONS
    }

    /// Geometry of sub-cell `id` within this cell.
    pub fn subcell(&self, id: SubCellId) -> SubCell {
        let size = self.subcell_size();
        let (sx, sy) = id.offset();
        SubCell {
            id,
            origin: PixelPoint::new(self.origin.x + sx * size, self.origin.y + sy * size),
            size,
        }
    }

    /// All nine sub-cells, row-major.
    pub fn subcells(&self) -> impl Iterator<Item = SubCell> + '_ {
        SubCellId::all().map(|id| self.subcell(id))
    }
}

/// One of the nine subdivisions of a [`GridCell`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubCell {
    /// Letter naming the position.
    pub id: SubCellId,
    /// Top-left pixel.
    pub origin: PixelPoint,
    /// Edge length in pixels.
    pub size: u32,
}

impl SubCell {
    /// Center pixel of the sub-cell.
    pub const fn center(&self) -> PixelPoint {
        PixelPoint::new(self.origin.x + self.size / 2, self.origin.y + self.size / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CellId {
        s.parse().unwrap()
    }

    #[test]
    fn thousand_by_five_hundred() {
        let grid = GridGeometry::with_cell_size(1000, 500, 50);
        assert_eq!(grid.columns(), 20);
        assert_eq!(grid.rows(), 10);
        assert_eq!(grid.cell_count(), 200);

        let last = grid.cell_at_index(199).unwrap();
        assert_eq!(last.id.as_str(), "t9");
        assert_eq!(last.origin, PixelPoint::new(950, 450));
        assert!(grid.cell_at_index(200).is_none());
        assert!(grid.origin_of(id("u0")).is_none());
    }

    #[test]
    fn partial_edge_cells_are_addressable() {
        let grid = GridGeometry::with_cell_size(120, 60, 50);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.rows(), 2);
        let corner = grid.cell_at_index(5).unwrap();
        assert_eq!(corner.origin, PixelPoint::new(100, 50));
    }

    #[test]
    fn subcell_center_uses_floored_edge() {
        let grid = GridGeometry::with_cell_size(1000, 500, 50);
        let r = SubCellId::from_char('r').unwrap();
        // ⌊50/3⌋ = 16, so sub-cell (2, 0) is centered at 2*16 + 8.
        assert_eq!(grid.subcell_center(id("b0"), r), Some(PixelPoint::new(540, 8)));
        let v = SubCellId::from_char('v').unwrap();
        assert_eq!(grid.subcell_center(id("a0"), v), Some(PixelPoint::new(40, 40)));
        assert_eq!(grid.subcell_center(id("zz"), v), None);
    }

    #[test]
    fn subcell_origin_offsets_from_parent() {
        let grid = GridGeometry::with_cell_size(1000, 500, 50);
        let r = SubCellId::from_char('r').unwrap();
        assert_eq!(grid.subcell_origin(id("b0"), r), Some(PixelPoint::new(532, 0)));
        let v = SubCellId::from_char('v').unwrap();
        assert_eq!(grid.subcell_origin(id("c5"), v), Some(PixelPoint::new(282, 82)));
        assert_eq!(grid.subcell_origin(id("zz"), r), None);
    }

    #[test]
    fn cell_center_is_half_an_edge_in() {
        let grid = GridGeometry::new(1000, 500);
        assert_eq!(grid.cell_center(id("a0")), Some(PixelPoint::new(25, 25)));
        assert_eq!(grid.cell_center(id("c5")), Some(PixelPoint::new(275, 75)));
    }

    #[test]
    fn huge_screens_cap_at_id_capacity() {
        let grid = GridGeometry::with_cell_size(10_000, 10_000, 10);
        assert_eq!(grid.cell_count(), CELL_ID_CAPACITY);
        assert_eq!(grid.cells().count(), CELL_ID_CAPACITY);
    }

    #[test]
    fn empty_screen_has_no_cells() {
        let grid = GridGeometry::new(0, 0);
        assert_eq!(grid.cell_count(), 0);
        assert!(grid.cell_at_index(0).is_none());
        assert_eq!(grid.cells().count(), 0);
    }

    #[test]
    fn cells_iterate_row_major() {
        let grid = GridGeometry::with_cell_size(100, 100, 50);
        let mut origins = grid.cells().map(|c| (c.origin.x, c.origin.y));
        assert_eq!(origins.next(), Some((0, 0)));
        assert_eq!(origins.next(), Some((50, 0)));
        assert_eq!(origins.next(), Some((0, 50)));
        assert_eq!(origins.next(), Some((50, 50)));
        assert_eq!(origins.next(), None);
    }

    #[test]
    fn subcells_tile_the_parent() {
        let grid = GridGeometry::with_cell_size(90, 90, 90);
        let cell = grid.cell_at_index(0).unwrap();
        let subs: [SubCell; 9] = core::array::from_fn(|i| cell.subcells().nth(i).unwrap());
        assert_eq!(subs[0].origin, PixelPoint::new(0, 0));
        assert_eq!(subs[4].origin, PixelPoint::new(30, 30));
        assert_eq!(subs[8].origin, PixelPoint::new(60, 60));
        assert!(subs.iter().all(|s| s.size == 30), "equal sub-cells");
    }
}
