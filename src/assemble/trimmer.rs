use image::imageops;
use image::{Rgb, RgbImage};
use serde::Serialize;

/// Fill colour the tile source pads the last row and column with.
pub const BORDER_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// A trimmed image plus how much was cut from each edge.
#[derive(Debug, Clone)]
pub struct Trimmed {
    pub image: RgbImage,
    pub amounts: TrimAmounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrimAmounts {
    pub right: u32,
    pub bottom: u32,
}

/// Removes the black padding border from the right and bottom edges.
///
/// Only one pixel per candidate line is probed: row 0 for columns, column 0
/// for rows. A border that is not uniform along its whole length can
/// therefore produce a wrong crop.
pub struct BorderTrimmer;

impl BorderTrimmer {
    /// Exclusive right bound: one past the last column whose row-0 pixel is
    /// not border-coloured. Column 0 is never probed.
    pub fn right_edge(image: &RgbImage) -> u32 {
        (1..image.width())
            .rev()
            .find(|&x| *image.get_pixel(x, 0) != BORDER_COLOR)
            .map_or(image.width(), |x| x + 1)
    }

    /// Exclusive bottom bound, probing column 0 of each row.
    pub fn bottom_edge(image: &RgbImage) -> u32 {
        (1..image.height())
            .rev()
            .find(|&y| *image.get_pixel(0, y) != BORDER_COLOR)
            .map_or(image.height(), |y| y + 1)
    }

    pub fn trim(image: RgbImage) -> Trimmed {
        let right_edge = Self::right_edge(&image);
        let bottom_edge = Self::bottom_edge(&image);
        let amounts = TrimAmounts {
            right: image.width() - right_edge,
            bottom: image.height() - bottom_edge,
        };

        if amounts.right == 0 && amounts.bottom == 0 {
            return Trimmed { image, amounts };
        }

        let image = imageops::crop_imm(&image, 0, 0, right_edge, bottom_edge).to_image();
        Trimmed { image, amounts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    /// `width` x `height` white image with a black band of `pad` pixels
    /// on the right and bottom.
    fn padded(width: u32, height: u32, pad: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if x >= width - pad || y >= height - pad {
                BORDER_COLOR
            } else {
                WHITE
            }
        })
    }

    #[test]
    fn test_trims_right_and_bottom_border() {
        let trimmed = BorderTrimmer::trim(padded(50, 40, 7));
        assert_eq!(trimmed.image.dimensions(), (43, 33));
        assert_eq!(trimmed.amounts, TrimAmounts { right: 7, bottom: 7 });
    }

    #[test]
    fn test_no_border_is_untouched() {
        let image = RgbImage::from_pixel(20, 10, WHITE);
        let trimmed = BorderTrimmer::trim(image.clone());
        assert_eq!(trimmed.image, image);
        assert_eq!(trimmed.amounts, TrimAmounts { right: 0, bottom: 0 });
    }

    #[test]
    fn test_trim_is_idempotent() {
        let once = BorderTrimmer::trim(padded(64, 48, 5)).image;
        let twice = BorderTrimmer::trim(once.clone());
        assert_eq!(twice.image, once);
        assert_eq!(twice.amounts, TrimAmounts { right: 0, bottom: 0 });
    }

    #[test]
    fn test_all_black_image_is_not_cropped() {
        let image = RgbImage::new(12, 9);
        let trimmed = BorderTrimmer::trim(image);
        assert_eq!(trimmed.image.dimensions(), (12, 9));
    }

    #[test]
    fn test_only_first_row_and_column_are_probed() {
        // Row 0 has content up to x=9, but row 5 has content further right.
        // Only row 0 decides the right edge.
        let mut image = RgbImage::new(20, 20);
        for x in 0..10 {
            image.put_pixel(x, 0, WHITE);
        }
        for x in 0..18 {
            image.put_pixel(x, 5, WHITE);
        }
        image.put_pixel(0, 3, WHITE);

        assert_eq!(BorderTrimmer::right_edge(&image), 10);
        assert_eq!(BorderTrimmer::bottom_edge(&image), 6);
    }

    #[test]
    fn test_single_pixel_image() {
        let trimmed = BorderTrimmer::trim(RgbImage::new(1, 1));
        assert_eq!(trimmed.image.dimensions(), (1, 1));
    }
}
