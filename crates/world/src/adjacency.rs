//! Corner connectivity between neighbouring beds.
//!
//! Each bed keeps four corner flags (top-left, top-right, bottom-left,
//! bottom-right) describing which directions out of that corner hold a
//! compatible bed. The flags pick the corner sprites at draw time.

use raised_beds_core::{GardenConfig, TilePos};

use crate::bed::GardenBed;
use crate::location::{Location, TileObject};

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    /// Directions out of one corner that hold a compatible neighbour.
    pub struct Axis: u8 {
        const VERTICAL = 0b0000_0001;
        const HORIZONTAL = 0b0000_0010;
        const DIAGONAL = 0b0000_0100;
    }
}

/// Flags for a bed with no neighbours.
pub const NO_NEIGHBOURS: [Axis; 4] = [Axis::empty(); 4];

/// Column and row offsets of corner `i`: row -1 for the top pair, column
/// +1 for the right pair.
pub const fn corner_offsets(corner: usize) -> (i32, i32) {
    let dx = if corner % 2 == 1 { 1 } else { -1 };
    let dy = if corner > 1 { 1 } else { -1 };
    (dx, dy)
}

fn compatible(bed: &GardenBed, other: Option<&TileObject>, config: &GardenConfig) -> bool {
    match other {
        Some(TileObject::Bed(other)) => other.variant() == bed.variant() && !other.is_broken(config),
        _ => false,
    }
}

/// Corner flags for the bed at `tile`, from the current contents of `location`.
///
/// The diagonal is only consulted once an edge neighbour matches. A diagonal
/// with only a horizontal edge collapses to horizontal; a diagonal with only a
/// vertical edge is kept as is.
pub fn corner_flags(location: &Location, tile: TilePos, config: &GardenConfig) -> [Axis; 4] {
    let Some(TileObject::Bed(bed)) = location.object_at(tile) else {
        return NO_NEIGHBOURS;
    };
    let mut flags = NO_NEIGHBOURS;
    for (corner, flag) in flags.iter_mut().enumerate() {
        let (dx, dy) = corner_offsets(corner);
        let mut n = Axis::empty();
        if compatible(bed, location.object_at(tile.offset(0, dy)), config) {
            n |= Axis::VERTICAL;
        }
        if compatible(bed, location.object_at(tile.offset(dx, 0)), config) {
            n |= Axis::HORIZONTAL;
        }
        if n.intersects(Axis::VERTICAL | Axis::HORIZONTAL)
            && compatible(bed, location.object_at(tile.offset(dx, dy)), config)
        {
            n |= Axis::DIAGONAL;
        }
        if n == Axis::DIAGONAL | Axis::HORIZONTAL {
            n = Axis::HORIZONTAL;
        }
        *flag = n;
    }
    flags
}

/// Recompute the corner flags of the bed at `tile`, if there is one.
pub fn adjust(location: &mut Location, tile: TilePos, config: &GardenConfig) {
    let flags = corner_flags(location, tile, config);
    if let Some(bed) = location.bed_mut(tile) {
        bed.set_neighbours(flags);
    }
}

/// Recompute every bed within `radius` tiles of `tile`, clamped to the map.
pub fn adjust_with_neighbours(
    location: &mut Location,
    tile: TilePos,
    radius: i32,
    config: &GardenConfig,
) {
    if radius < 1 {
        return;
    }
    let (width, height) = location.size();
    let start = TilePos::new((tile.x - radius).max(0), (tile.y - radius).max(0));
    let end = TilePos::new((tile.x + radius).min(width), (tile.y + radius).min(height));
    for y in start.y..=end.y {
        for x in start.x..=end.x {
            adjust(location, TilePos::new(x, y), config);
        }
    }
}

/// Recompute every bed in the location.
pub fn adjust_all(location: &mut Location, config: &GardenConfig) {
    for tile in location.bed_tiles() {
        adjust(location, tile, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationKind;
    use crate::test_support::{context, place};

    fn farm() -> Location {
        Location::new("Farm", LocationKind::Farm, 20, 20)
    }

    #[test]
    fn offsets_follow_corner_order() {
        assert_eq!(corner_offsets(0), (-1, -1));
        assert_eq!(corner_offsets(1), (1, -1));
        assert_eq!(corner_offsets(2), (-1, 1));
        assert_eq!(corner_offsets(3), (1, 1));
    }

    #[test]
    fn lone_bed_has_no_flags() {
        let fx = context();
        let mut farm = farm();
        place(&mut farm, &fx, "wood", TilePos::new(4, 4));
        adjust_all(&mut farm, &fx.config);
        assert_eq!(farm.bed(TilePos::new(4, 4)).unwrap().neighbours(), NO_NEIGHBOURS);
    }

    #[test]
    fn full_square_sets_all_bits() {
        let fx = context();
        let mut farm = farm();
        for (x, y) in [(4, 4), (5, 4), (4, 5), (5, 5)] {
            place(&mut farm, &fx, "wood", TilePos::new(x, y));
        }
        adjust_all(&mut farm, &fx.config);
        let all = Axis::VERTICAL | Axis::HORIZONTAL | Axis::DIAGONAL;
        assert_eq!(farm.bed(TilePos::new(4, 4)).unwrap().neighbours()[3], all);
        assert_eq!(farm.bed(TilePos::new(5, 5)).unwrap().neighbours()[0], all);
        assert_eq!(farm.bed(TilePos::new(4, 4)).unwrap().neighbours()[0], Axis::empty());
    }

    #[test]
    fn diagonal_with_horizontal_collapses() {
        let fx = context();
        let mut farm = farm();
        // (4,4) sees a horizontal neighbour at (5,4) and a diagonal at (5,5),
        // but nothing below at (4,5).
        for (x, y) in [(4, 4), (5, 4), (5, 5)] {
            place(&mut farm, &fx, "wood", TilePos::new(x, y));
        }
        adjust_all(&mut farm, &fx.config);
        assert_eq!(farm.bed(TilePos::new(4, 4)).unwrap().neighbours()[3], Axis::HORIZONTAL);
    }

    #[test]
    fn diagonal_with_vertical_is_kept() {
        let fx = context();
        let mut farm = farm();
        for (x, y) in [(4, 4), (4, 5), (5, 5)] {
            place(&mut farm, &fx, "wood", TilePos::new(x, y));
        }
        adjust_all(&mut farm, &fx.config);
        assert_eq!(
            farm.bed(TilePos::new(4, 4)).unwrap().neighbours()[3],
            Axis::VERTICAL | Axis::DIAGONAL
        );
    }

    #[test]
    fn other_variants_do_not_connect() {
        let fx = context();
        let mut farm = farm();
        place(&mut farm, &fx, "wood", TilePos::new(4, 4));
        place(&mut farm, &fx, "stone", TilePos::new(5, 4));
        adjust_all(&mut farm, &fx.config);
        assert_eq!(farm.bed(TilePos::new(4, 4)).unwrap().neighbours(), NO_NEIGHBOURS);
    }

    #[test]
    fn radius_below_one_is_noop() {
        let fx = context();
        let mut farm = farm();
        place(&mut farm, &fx, "wood", TilePos::new(4, 4));
        farm.bed_mut(TilePos::new(4, 4))
            .unwrap()
            .set_neighbours([Axis::VERTICAL; 4]);
        adjust_with_neighbours(&mut farm, TilePos::new(4, 4), 0, &fx.config);
        assert_eq!(farm.bed(TilePos::new(4, 4)).unwrap().neighbours(), [Axis::VERTICAL; 4]);
    }

    #[test]
    fn scan_is_clamped_at_map_origin() {
        let fx = context();
        let mut farm = farm();
        place(&mut farm, &fx, "wood", TilePos::new(0, 0));
        place(&mut farm, &fx, "wood", TilePos::new(1, 0));
        adjust_with_neighbours(&mut farm, TilePos::new(0, 0), 3, &fx.config);
        assert_eq!(farm.bed(TilePos::new(0, 0)).unwrap().neighbours()[1], Axis::HORIZONTAL);
        assert_eq!(farm.bed(TilePos::new(1, 0)).unwrap().neighbours()[0], Axis::HORIZONTAL);
    }
}
