//! Sprite selection for beds. Produces source/destination rectangles and layer
//! depths; blitting is left to the host.

use raised_beds_assets::{sprite_row_offset, SOIL_INDEX_IN_SHEET};
use raised_beds_core::{GardenConfig, Rect, TilePos, PIXEL_ZOOM, SMALLEST_TILE_SIZE, TILE_SIZE};

use crate::adjacency::Axis;
use crate::bed::GardenBed;

/// Column of the end-piece used to close off a horizontal run.
pub const ENDPIECE_INDEX_IN_SHEET: i32 = 6;
/// Column of the broken sprite. Every row of the spritesheet must supply it.
pub const BROKEN_INDEX_IN_SHEET: i32 = 8;
/// Column of the whole-object sprite used for placement previews.
pub const PREVIEW_INDEX_IN_SHEET: i32 = 9;
/// Below this alpha a draw call is treated as a placement preview.
pub const PREVIEW_ALPHA_THRESHOLD: f32 = 0.6;

const DEPTH_STEP: f32 = 1.0 / 10000.0;

/// One textured quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    /// Area of the combined spritesheet.
    pub source: Rect,
    /// Screen area in world pixels.
    pub destination: Rect,
    /// Sort depth, larger draws on top.
    pub layer_depth: f32,
}

/// Everything needed to draw one bed.
#[derive(Debug, Clone, PartialEq)]
pub enum BedSprites {
    /// A single whole-object sprite (broken or preview).
    Single(SpriteDraw),
    /// Unconnected sprite used at the map origin.
    Neutral {
        /// Soil quad.
        soil: SpriteDraw,
        /// Body quad.
        body: SpriteDraw,
    },
    /// Soil plus four corner quads picked from the neighbour flags.
    Composite {
        /// Soil quad.
        soil: SpriteDraw,
        /// Corners in TL, TR, BL, BR order.
        corners: [SpriteDraw; 4],
    },
}

/// Objects that know which sprites to draw.
pub trait Renderable {
    /// Sprites for drawing in the world at `alpha`, or `None` when the
    /// variant's sprite row can't be addressed and the draw is skipped.
    fn sprites(&self, config: &GardenConfig, alpha: f32) -> Option<BedSprites>;
}

/// Spritesheet area of a full-height column in a variant's row.
pub fn source_rectangle(sprite_index: usize, column: i32) -> Option<Rect> {
    Some(Rect::new(
        column * SMALLEST_TILE_SIZE,
        sprite_row_offset(sprite_index)?,
        SMALLEST_TILE_SIZE,
        SMALLEST_TILE_SIZE * 2,
    ))
}

fn depth_at(pixel_y: i32, soil_height: i32) -> f32 {
    ((pixel_y - soil_height * PIXEL_ZOOM) as f32 / 10000.0).max(0.0) + DEPTH_STEP
}

fn corner_source(flags: Axis, x_offset: i32, y: i32) -> Rect {
    Rect::new(
        x_offset + i32::from(flags.bits()) * SMALLEST_TILE_SIZE,
        y,
        SMALLEST_TILE_SIZE / 2,
        SMALLEST_TILE_SIZE,
    )
}

impl GardenBed {
    fn body_destination(&self) -> Rect {
        let tile = self.tile();
        Rect::new(
            tile.x * TILE_SIZE,
            tile.y * TILE_SIZE - TILE_SIZE,
            TILE_SIZE,
            TILE_SIZE * 2,
        )
    }

    fn soil_sprite(&self, row: i32, layer_depth: f32) -> SpriteDraw {
        let dest = self.body_destination();
        let wet_offset = if self.soil().watered {
            SMALLEST_TILE_SIZE
        } else {
            0
        };
        SpriteDraw {
            source: Rect::new(
                SOIL_INDEX_IN_SHEET * SMALLEST_TILE_SIZE,
                row + wet_offset,
                SMALLEST_TILE_SIZE,
                SMALLEST_TILE_SIZE,
            ),
            destination: Rect::new(
                dest.x,
                dest.y + (SMALLEST_TILE_SIZE - self.soil_height_above_ground()) * PIXEL_ZOOM,
                TILE_SIZE,
                TILE_SIZE,
            ),
            layer_depth,
        }
    }
}

impl Renderable for GardenBed {
    fn sprites(&self, config: &GardenConfig, alpha: f32) -> Option<BedSprites> {
        let row = sprite_row_offset(self.sprite_index())?;
        let dest = self.body_destination();
        let TilePos { y, .. } = self.tile();
        let soil = self.soil_height_above_ground();
        let depth = depth_at((y + 1) * TILE_SIZE, soil);

        let single_column = if self.is_broken(config) {
            Some(BROKEN_INDEX_IN_SHEET)
        } else if alpha < PREVIEW_ALPHA_THRESHOLD {
            Some(PREVIEW_INDEX_IN_SHEET)
        } else {
            None
        };
        if let Some(column) = single_column {
            return Some(BedSprites::Single(SpriteDraw {
                source: source_rectangle(self.sprite_index(), column)?,
                destination: dest,
                layer_depth: depth,
            }));
        }

        if self.tile() == TilePos::ZERO {
            return Some(BedSprites::Neutral {
                soil: self.soil_sprite(row, depth - DEPTH_STEP),
                body: SpriteDraw {
                    source: source_rectangle(self.sprite_index(), 0)?,
                    destination: dest,
                    layer_depth: depth,
                },
            });
        }

        let n = self.neighbours();
        let soil_depth = if n[0].contains(Axis::VERTICAL) {
            depth_at(y * TILE_SIZE, soil)
        } else {
            depth
        };

        let half = SMALLEST_TILE_SIZE / 2;
        let bottom_right = if n[2] == Axis::HORIZONTAL && n[3].is_empty() {
            Axis::from_bits_retain(ENDPIECE_INDEX_IN_SHEET as u8)
        } else {
            n[3]
        };
        let sources = [
            corner_source(n[0], 0, row),
            corner_source(n[1], half, row),
            corner_source(n[2], 0, row + SMALLEST_TILE_SIZE),
            corner_source(bottom_right, half, row + SMALLEST_TILE_SIZE),
        ];
        let corners = std::array::from_fn(|i| SpriteDraw {
            source: sources[i],
            destination: Rect::new(
                dest.x + if i % 2 == 1 { TILE_SIZE / 2 } else { 0 },
                dest.y + if i > 1 { TILE_SIZE } else { 0 },
                TILE_SIZE / 2,
                TILE_SIZE,
            ),
            layer_depth: depth + (i + 1) as f32 * DEPTH_STEP,
        });

        Some(BedSprites::Composite {
            soil: self.soil_sprite(row, soil_depth - DEPTH_STEP),
            corners,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::adjust_all;
    use crate::bed::BedContext;
    use crate::location::{Location, LocationKind};
    use crate::test_support::{context, place};
    use raised_beds_assets::VariantRegistry;

    fn composite(sprites: Option<BedSprites>) -> (SpriteDraw, [SpriteDraw; 4]) {
        match sprites {
            Some(BedSprites::Composite { soil, corners }) => (soil, corners),
            other => panic!("expected composite sprites, got {other:?}"),
        }
    }

    #[test]
    fn lone_bed_uses_unconnected_corners() {
        let fx = context();
        let mut farm = Location::new("Farm", LocationKind::Farm, 10, 10);
        place(&mut farm, &fx, "stone", TilePos::new(2, 3));
        let bed = farm.bed(TilePos::new(2, 3)).unwrap();

        let (soil, corners) = composite(bed.sprites(&fx.config, 1.0));
        assert_eq!(soil.source, Rect::new(64, 32, 16, 16));
        assert_eq!(soil.destination, Rect::new(128, 128 + 56, 64, 64));
        assert_eq!(corners[0].source, Rect::new(0, 32, 8, 16));
        assert_eq!(corners[1].source, Rect::new(8, 32, 8, 16));
        assert_eq!(corners[2].source, Rect::new(0, 48, 8, 16));
        assert_eq!(corners[3].source, Rect::new(8, 48, 8, 16));
        assert_eq!(corners[3].destination, Rect::new(160, 192, 32, 64));
        assert!(corners[3].layer_depth > corners[0].layer_depth);
        assert!(soil.layer_depth < corners[0].layer_depth);
    }

    #[test]
    fn horizontal_run_closes_with_endpiece() {
        let fx = context();
        let mut farm = Location::new("Farm", LocationKind::Farm, 10, 10);
        place(&mut farm, &fx, "wood", TilePos::new(2, 2));
        place(&mut farm, &fx, "wood", TilePos::new(3, 2));
        adjust_all(&mut farm, &fx.config);

        let (_, left) = composite(farm.bed(TilePos::new(2, 2)).unwrap().sprites(&fx.config, 1.0));
        assert_eq!(left[1].source, Rect::new(8 + 32, 0, 8, 16));
        assert_eq!(left[3].source, Rect::new(8 + 32, 16, 8, 16));

        let (_, right) = composite(farm.bed(TilePos::new(3, 2)).unwrap().sprites(&fx.config, 1.0));
        assert_eq!(right[2].source, Rect::new(32, 16, 8, 16));
        assert_eq!(right[3].source, Rect::new(8 + 6 * 16, 16, 8, 16));
    }

    #[test]
    fn wet_soil_uses_lower_row() {
        let fx = context();
        let mut farm = Location::new("Farm", LocationKind::Farm, 10, 10);
        place(&mut farm, &fx, "wood", TilePos::new(1, 1));
        farm.bed_mut(TilePos::new(1, 1)).unwrap().water();
        let (soil, _) = composite(farm.bed(TilePos::new(1, 1)).unwrap().sprites(&fx.config, 1.0));
        assert_eq!(soil.source, Rect::new(64, 16, 16, 16));
    }

    #[test]
    fn broken_preview_and_origin_sprites() {
        let fx = context();
        let mut farm = Location::new("Farm", LocationKind::Farm, 10, 10);
        place(&mut farm, &fx, "wood", TilePos::ZERO);
        place(&mut farm, &fx, "wood", TilePos::new(4, 4));
        let origin = farm.bed(TilePos::ZERO).unwrap();
        assert!(matches!(
            origin.sprites(&fx.config, 1.0),
            Some(BedSprites::Neutral { body, .. }) if body.source == Rect::new(0, 0, 16, 32)
        ));
        assert!(matches!(
            origin.sprites(&fx.config, 0.5),
            Some(BedSprites::Single(draw)) if draw.source == Rect::new(144, 0, 16, 32)
        ));

        let bed = farm.bed_mut(TilePos::new(4, 4)).unwrap();
        bed.break_bed();
        assert!(matches!(
            bed.sprites(&fx.config, 1.0),
            Some(BedSprites::Single(draw)) if draw.source == Rect::new(128, 0, 16, 32)
                && draw.destination == Rect::new(256, 192, 64, 128)
        ));
    }

    #[test]
    fn unaddressable_sprite_row_skips_the_draw() {
        let fx = context();
        let mut def = fx.registry.get("wood").unwrap().clone();
        def.sprite_index = 100_000_000;
        let registry = VariantRegistry::new(vec![def]);
        let ctx = BedContext::new(&registry, &fx.config, &fx.translations);

        for tile in [TilePos::ZERO, TilePos::new(3, 3)] {
            let bed = GardenBed::new(&ctx, Some("wood"), tile, false).unwrap();
            assert_eq!(bed.sprites(&fx.config, 1.0), None);
            assert_eq!(bed.sprites(&fx.config, 0.5), None);
        }
        assert_eq!(source_rectangle(usize::MAX, BROKEN_INDEX_IN_SHEET), None);
    }
}
