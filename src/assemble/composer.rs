use crate::error::ComposeError;
use crate::tile::{TileCoordinate, TileSet};
use image::imageops;
use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

/// Canvas geometry derived from a tile set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasLayout {
    pub max_col: u32,
    pub max_row: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl CanvasLayout {
    /// Raw canvas size before any trimming. Overlap is not subtracted here,
    /// so the canvas is never smaller than the pasted content.
    ///
    /// `None` when a side does not fit in `u32` or the RGB buffer does not
    /// fit in `usize`.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        let width = self.columns()?.checked_mul(self.tile_width)?;
        let height = self.rows()?.checked_mul(self.tile_height)?;
        let bytes = u64::from(width)
            .checked_mul(u64::from(height))?
            .checked_mul(3)?;
        usize::try_from(bytes).ok()?;
        Some((width, height))
    }

    pub fn columns(&self) -> Option<u32> {
        self.max_col.checked_add(1)
    }

    pub fn rows(&self) -> Option<u32> {
        self.max_row.checked_add(1)
    }
}

/// Top-left pixel where the tile at `coord` is pasted.
///
/// Tiles after the first column and first row overlap their predecessor by
/// one pixel, so they are shifted back by one along that axis.
pub fn paste_origin(coord: TileCoordinate, tile_width: u32, tile_height: u32) -> (i64, i64) {
    let dx = if coord.col > 0 { -1 } else { 0 };
    let dy = if coord.row > 0 { -1 } else { 0 };
    (
        i64::from(coord.col) * i64::from(tile_width) + dx,
        i64::from(coord.row) * i64::from(tile_height) + dy,
    )
}

/// Pastes a [`TileSet`] onto one canvas.
pub struct CanvasComposer;

impl CanvasComposer {
    /// Grid extent and tile size. `None` only for an empty set.
    pub fn layout(tiles: &TileSet) -> Option<CanvasLayout> {
        let (max_col, max_row) = tiles.extent()?;
        let (_, first) = tiles.first()?;
        Some(CanvasLayout {
            max_col,
            max_row,
            tile_width: first.width(),
            tile_height: first.height(),
        })
    }

    /// Paste every tile onto a black canvas sized by [`CanvasLayout::canvas_size`].
    ///
    /// Tiles that differ from the authoritative size are still pasted and
    /// clipped to the canvas.
    pub fn compose(tiles: &TileSet) -> Result<(CanvasLayout, RgbImage), ComposeError> {
        let layout = Self::layout(tiles).ok_or(ComposeError::Empty)?;
        let (width, height) = layout
            .canvas_size()
            .ok_or(ComposeError::TooLarge(layout))?;
        debug!(?layout, width, height, "Allocating canvas");

        let mut canvas = RgbImage::new(width, height);

        let pb = ProgressBar::new(tiles.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} tiles")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        for (coord, tile) in tiles.iter() {
            if tile.dimensions() != (layout.tile_width, layout.tile_height) {
                warn!(
                    %coord,
                    width = tile.width(),
                    height = tile.height(),
                    expected_width = layout.tile_width,
                    expected_height = layout.tile_height,
                    "Tile size differs from the first tile"
                );
            }

            let (x, y) = paste_origin(*coord, layout.tile_width, layout.tile_height);
            imageops::replace(&mut canvas, tile, x, y);
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok((layout, canvas))
    }
}
