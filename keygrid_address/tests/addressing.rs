// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the addressing scheme.

use keygrid_address::{
    CELL_ID_CAPACITY, CellId, GridGeometry, PixelPoint, SUBCELL_ALPHABET, SubCellId,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn id_resolves_to_geometric_placement(
        width in 1_u32..4000,
        height in 1_u32..3000,
        cell_size in 10_u32..120,
        pick in any::<prop::sample::Index>(),
    ) {
        let grid = GridGeometry::with_cell_size(width, height, cell_size);
        prop_assume!(grid.cell_count() > 0);
        let index = pick.index(grid.cell_count());

        let columns = grid.columns() as usize;
        let expected = PixelPoint::new(
            (index % columns) as u32 * cell_size,
            (index / columns) as u32 * cell_size,
        );
        let id = CellId::from_index(index).unwrap();
        prop_assert_eq!(grid.origin_of(id), Some(expected));
        prop_assert!(expected.x < width && expected.y < height);
    }

    #[test]
    fn ids_are_injective(a in 0_usize..CELL_ID_CAPACITY, b in 0_usize..CELL_ID_CAPACITY) {
        let ia = CellId::from_index(a).unwrap();
        let ib = CellId::from_index(b).unwrap();
        prop_assert_eq!(a == b, ia == ib);
        prop_assert_eq!(ia.as_str().parse::<CellId>().unwrap(), ia);
    }

    #[test]
    fn subcell_centers_stay_inside_parent(
        cell_size in 3_u32..200,
        letter in prop::sample::select(SUBCELL_ALPHABET.to_vec()),
    ) {
        let grid = GridGeometry::with_cell_size(cell_size * 4, cell_size * 4, cell_size);
        let id = CellId::from_index(5).unwrap();
        let origin = grid.origin_of(id).unwrap();
        let sub = SubCellId::from_char(letter).unwrap();
        let center = grid.subcell_center(id, sub).unwrap();
        prop_assert!(center.x >= origin.x && center.x < origin.x + cell_size);
        prop_assert!(center.y >= origin.y && center.y < origin.y + cell_size);
    }
}

#[test]
fn scenario_two_hundred_cells() {
    let grid = GridGeometry::with_cell_size(1000, 500, 50);
    let ids: Vec<_> = grid.cells().map(|c| c.id.to_string()).collect();
    assert_eq!(ids.len(), 200);
    assert_eq!(ids.first().map(String::as_str), Some("a0"));
    assert_eq!(ids.last().map(String::as_str), Some("t9"));
    assert_eq!(ids[19], "b9");
    assert_eq!(ids[25], "c5");
}
