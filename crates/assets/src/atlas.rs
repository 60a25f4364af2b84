use image::{imageops, GenericImageView, RgbaImage};
use raised_beds_core::{Rect, SMALLEST_TILE_SIZE};
use thiserror::Error;

/// Column of the soil sprites in the combined garden bed spritesheet.
pub const SOIL_INDEX_IN_SHEET: i32 = 4;

/// Errors that can occur while patching sprite atlases.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Wrap image decoding failures when reading spritesheets.
    #[error("failed to read spritesheet: {0}")]
    Image(#[from] image::ImageError),
    /// A rectangle falls outside the image it addresses.
    #[error("area {area:?} exceeds {width}x{height} image bounds")]
    OutOfBounds {
        /// Offending rectangle.
        area: Rect,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// Atlas is narrower than one big-craftable sprite.
    #[error("atlas width {0} is too narrow for 16px sprites")]
    TooNarrow(u32),
    /// A sprite row or atlas index lies past the pixel coordinate range.
    #[error("sprite index {0} is outside the addressable pixel range")]
    IndexOutOfRange(i64),
}

/// Source rectangle of big-craftable `index` in an atlas of the given width.
///
/// Big craftables are one tile wide and two tiles tall, laid out in rows.
pub fn big_craftable_rect(atlas_width: u32, index: i32) -> Result<Rect, AtlasError> {
    let tile = SMALLEST_TILE_SIZE;
    let width = i32::try_from(atlas_width).unwrap_or(i32::MAX);
    let per_row = width / tile;
    if per_row == 0 {
        return Err(AtlasError::TooNarrow(atlas_width));
    }
    let y = index
        .checked_mul(tile)
        .map(|offset| offset / width)
        .and_then(|row| row.checked_mul(tile * 2))
        .ok_or(AtlasError::IndexOutOfRange(i64::from(index)))?;
    Ok(Rect::new(index % per_row * tile, y, tile, tile * 2))
}

fn check_bounds(image: &RgbaImage, area: Rect) -> Result<(), AtlasError> {
    let (width, height) = image.dimensions();
    let inside = area.x >= 0
        && area.y >= 0
        && area.width >= 0
        && area.height >= 0
        && i64::from(area.right()) <= i64::from(width)
        && i64::from(area.bottom()) <= i64::from(height);
    if inside {
        Ok(())
    } else {
        Err(AtlasError::OutOfBounds {
            area,
            width,
            height,
        })
    }
}

/// Copy `source_area` of `source` onto `target` at `target_pos`, alpha blending.
///
/// Fully transparent source pixels leave the destination untouched, so
/// unrelated atlas content around the sprite survives.
pub fn overlay_region(
    target: &mut RgbaImage,
    source: &RgbaImage,
    source_area: Rect,
    target_pos: (i32, i32),
) -> Result<(), AtlasError> {
    check_bounds(source, source_area)?;
    check_bounds(
        target,
        Rect::new(
            target_pos.0,
            target_pos.1,
            source_area.width,
            source_area.height,
        ),
    )?;
    let region = source
        .view(
            source_area.x as u32,
            source_area.y as u32,
            source_area.width as u32,
            source_area.height as u32,
        )
        .to_image();
    imageops::overlay(
        target,
        &region,
        i64::from(target_pos.0),
        i64::from(target_pos.1),
    );
    Ok(())
}

/// Decode a PNG spritesheet from memory.
pub fn decode_spritesheet(bytes: &[u8]) -> Result<RgbaImage, AtlasError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn big_craftable_rect_wraps_rows() {
        assert_eq!(big_craftable_rect(128, 0).unwrap(), Rect::new(0, 0, 16, 32));
        assert_eq!(big_craftable_rect(128, 9).unwrap(), Rect::new(16, 32, 16, 32));
        assert!(matches!(
            big_craftable_rect(8, 1),
            Err(AtlasError::TooNarrow(8))
        ));
        assert!(matches!(
            big_craftable_rect(128, i32::MAX),
            Err(AtlasError::IndexOutOfRange(_))
        ));
    }

    #[test]
    fn overlay_keeps_destination_under_transparent_pixels() {
        let mut target = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let mut source = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        source.put_pixel(1, 1, Rgba([200, 100, 50, 255]));

        overlay_region(&mut target, &source, Rect::new(0, 0, 2, 2), (1, 1)).unwrap();

        assert_eq!(*target.get_pixel(1, 1), Rgba([10, 20, 30, 255]));
        assert_eq!(*target.get_pixel(2, 2), Rgba([200, 100, 50, 255]));
        assert_eq!(*target.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn overlay_rejects_out_of_bounds() {
        let mut target = RgbaImage::new(4, 4);
        let source = RgbaImage::new(2, 2);
        let err = overlay_region(&mut target, &source, Rect::new(0, 0, 2, 2), (3, 3)).unwrap_err();
        assert!(matches!(err, AtlasError::OutOfBounds { .. }));
        let err = overlay_region(&mut target, &source, Rect::new(1, 1, 2, 2), (0, 0)).unwrap_err();
        assert!(matches!(err, AtlasError::OutOfBounds { .. }));
    }
}
