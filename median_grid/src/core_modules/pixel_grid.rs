// THEORY:
// `PixelGrid` is the in-memory image the reducer reads from and writes to. It is a
// single flat, row-major buffer of `height * width * CHANNELS` bytes, the same
// layout the `image` crate uses for `RgbImage`, so converting in either direction
// is a move of the underlying `Vec` rather than a per-pixel copy.
//
// The shape is validated once, at construction. Every accessor after that can
// compute offsets without re-checking the buffer length.

use crate::core_modules::dimensions::Dimensions;
use crate::core_modules::pixel::pixel::{Byte, CHANNELS, Pixel};
use crate::error::ValidationError;
use image::RgbImage;

/// A (height, width, 3) grid of 8-bit RGB samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    dimensions: Dimensions,
    data: Vec<Byte>,
}

impl PixelGrid {
    /// Wraps a raw row-major RGB buffer.
    pub fn from_raw(width: u32, height: u32, data: Vec<Byte>) -> Result<Self, ValidationError> {
        let dimensions = Dimensions::new(width, height)?;
        let expected = Self::byte_len(&dimensions);
        if data.len() != expected {
            return Err(ValidationError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { dimensions, data })
    }

    /// A grid where every cell holds the same color.
    pub fn filled(dimensions: Dimensions, pixel: Pixel) -> Self {
        let data = pixel
            .channels()
            .iter()
            .copied()
            .cycle()
            .take(Self::byte_len(&dimensions))
            .collect();
        Self { dimensions, data }
    }

    fn byte_len(dimensions: &Dimensions) -> usize {
        dimensions.area() as usize * CHANNELS
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width()
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height()
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width() as usize * CHANNELS
    }

    /// The pixel at (col, row), or `None` outside the grid.
    pub fn pixel(&self, col: u32, row: u32) -> Option<Pixel> {
        if col >= self.width() || row >= self.height() {
            return None;
        }
        let offset = row as usize * self.stride() + col as usize * CHANNELS;
        Pixel::try_from(&self.data[offset..offset + CHANNELS]).ok()
    }

    /// The raw bytes of one row.
    pub fn row(&self, row: u32) -> Option<&[Byte]> {
        if row >= self.height() {
            return None;
        }
        let start = row as usize * self.stride();
        Some(&self.data[start..start + self.stride()])
    }

    /// Iterates the grid row by row, left to right.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|bytes| Pixel::new(bytes[0], bytes[1], bytes[2]))
    }

    pub fn as_bytes(&self) -> &[Byte] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<Byte> {
        self.data
    }
}

impl TryFrom<RgbImage> for PixelGrid {
    type Error = ValidationError;

    fn try_from(image: RgbImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        PixelGrid::from_raw(width, height, image.into_raw())
    }
}

impl TryFrom<PixelGrid> for RgbImage {
    type Error = ValidationError;

    fn try_from(grid: PixelGrid) -> Result<Self, Self::Error> {
        let (width, height) = (grid.width(), grid.height());
        let expected = PixelGrid::byte_len(&grid.dimensions);
        let actual = grid.data.len();
        RgbImage::from_raw(width, height, grid.into_raw()).ok_or(ValidationError::BufferSize {
            width,
            height,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> PixelGrid {
        PixelGrid::from_raw(
            2,
            2,
            vec![
                1, 2, 3, /**/ 4, 5, 6, //
                7, 8, 9, /**/ 10, 11, 12,
            ],
        )
        .expect("valid grid")
    }

    #[test]
    fn indexes_row_major() {
        let grid = two_by_two();
        assert_eq!(grid.pixel(0, 0), Some(Pixel::new(1, 2, 3)));
        assert_eq!(grid.pixel(1, 0), Some(Pixel::new(4, 5, 6)));
        assert_eq!(grid.pixel(0, 1), Some(Pixel::new(7, 8, 9)));
        assert_eq!(grid.pixel(1, 1), Some(Pixel::new(10, 11, 12)));
        assert_eq!(grid.pixel(2, 0), None);
        assert_eq!(grid.pixel(0, 2), None);
        assert_eq!(grid.row(1), Some(&[7u8, 8, 9, 10, 11, 12][..]));
        assert_eq!(grid.row(2), None);
        assert_eq!(grid.pixels().count(), 4);
    }

    #[test]
    fn rejects_mismatched_buffer() {
        let err = PixelGrid::from_raw(2, 2, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::BufferSize {
                width: 2,
                height: 2,
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn rejects_empty_shape() {
        assert!(matches!(
            PixelGrid::from_raw(0, 3, Vec::new()),
            Err(ValidationError::NonPositive { field: "width", .. })
        ));
    }

    #[test]
    fn filled_grid_repeats_the_color() {
        let dims = Dimensions::new(3, 2).unwrap();
        let grid = PixelGrid::filled(dims, Pixel::new(9, 8, 7));
        assert_eq!(grid.as_bytes().len(), 18);
        assert!(grid.pixels().all(|p| p == Pixel::new(9, 8, 7)));
    }

    #[test]
    fn moves_through_rgb_image() {
        let grid = two_by_two();
        let image = RgbImage::try_from(grid.clone()).expect("validated grid");
        assert_eq!(image.get_pixel(1, 1).0, [10, 11, 12]);
        assert_eq!(PixelGrid::try_from(image), Ok(grid));
    }

    #[test]
    fn short_buffer_is_reported_instead_of_blanked() {
        let grid = PixelGrid {
            dimensions: Dimensions::new(2, 2).unwrap(),
            data: vec![0; 5],
        };
        assert_eq!(
            RgbImage::try_from(grid),
            Err(ValidationError::BufferSize {
                width: 2,
                height: 2,
                expected: 12,
                actual: 5
            })
        );
    }
}
