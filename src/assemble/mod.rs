//! Tile assembly: index a folder of tiles, compose them onto one canvas and
//! trim the padding border the source adds to the last row and column.

pub mod composer;
pub mod indexer;
pub mod trimmer;

use crate::error::{AssembleError, ComposeError};
use crate::tile::TileSet;
use crate::utils::files::{list_tile_folders, output_path_for};
use crate::utils::images::save_jpeg;
use composer::{CanvasComposer, CanvasLayout};
use image::RgbImage;
use indexer::TileIndexer;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use trimmer::{BorderTrimmer, TrimAmounts};

/// Final image of one assembly run along with the geometry that produced it.
#[derive(Debug, Clone)]
pub struct Stitched {
    pub layout: CanvasLayout,
    pub image: RgbImage,
    pub trimmed: TrimAmounts,
}

/// Summary of one assembled folder.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyReport {
    pub folder: PathBuf,
    pub output: PathBuf,
    pub tiles: usize,
    pub columns: u32,
    pub rows: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub width: u32,
    pub height: u32,
    pub trimmed: TrimAmounts,
}

/// Outcome for one folder of a batch run.
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub folder: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AssemblyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Compose and trim an already indexed tile set.
pub fn stitch(tiles: &TileSet) -> Result<Stitched, ComposeError> {
    let (layout, canvas) = CanvasComposer::compose(tiles)?;
    let trimmed = BorderTrimmer::trim(canvas);

    info!(
        vertically = trimmed.amounts.bottom,
        horizontally = trimmed.amounts.right,
        "Cropped padding border"
    );

    Ok(Stitched {
        layout,
        image: trimmed.image,
        trimmed: trimmed.amounts,
    })
}

/// Assemble the tiles in `dir` into one image, without writing anything.
pub fn assemble_tiles(dir: &Path) -> Result<(Stitched, usize), AssembleError> {
    let tiles = TileIndexer::index(dir)?;
    let stitched = stitch(&tiles).map_err(|e| match e {
        ComposeError::Empty => AssembleError::NoTilesFound(dir.to_path_buf()),
        ComposeError::TooLarge(layout) => AssembleError::CanvasTooLarge {
            path: dir.to_path_buf(),
            max_col: layout.max_col,
            max_row: layout.max_row,
            tile_width: layout.tile_width,
            tile_height: layout.tile_height,
        },
    })?;
    Ok((stitched, tiles.len()))
}

/// Assemble `folder` and save the result as `<folder>.jpg`.
///
/// An existing output is never overwritten: the run stops with
/// [`AssembleError::OutputExists`], which callers treat as benign.
pub fn assemble_folder(folder: &Path) -> Result<AssemblyReport, AssembleError> {
    let output = output_path_for(folder);
    if output.exists() {
        return Err(AssembleError::OutputExists(output));
    }

    if !folder.exists() {
        return Err(AssembleError::InputMissing(folder.to_path_buf()));
    }

    let (stitched, tile_count) = assemble_tiles(folder)?;
    save_jpeg(&stitched.image, &output)?;
    info!(path = %output.display(), "Image saved");

    Ok(AssemblyReport {
        folder: folder.to_path_buf(),
        output,
        tiles: tile_count,
        // Both counts were checked when the canvas was sized.
        columns: stitched.layout.columns().unwrap_or(u32::MAX),
        rows: stitched.layout.rows().unwrap_or(u32::MAX),
        tile_width: stitched.layout.tile_width,
        tile_height: stitched.layout.tile_height,
        width: stitched.image.width(),
        height: stitched.image.height(),
        trimmed: stitched.trimmed,
    })
}

/// Assemble every tile folder directly under `root`.
///
/// Folders are independent: a failure in one is logged and recorded, and the
/// batch moves on.
pub fn assemble_all(root: &Path) -> Result<Vec<BatchEntry>, AssembleError> {
    if !root.exists() {
        return Err(AssembleError::InputMissing(root.to_path_buf()));
    }

    let folders = list_tile_folders(root).map_err(|source| AssembleError::ReadDir {
        path: root.to_path_buf(),
        source,
    })?;
    info!(root = %root.display(), folders = folders.len(), "Assembling folders");

    let entries = folders
        .into_iter()
        .map(|folder| match assemble_folder(&folder) {
            Ok(report) => BatchEntry {
                folder,
                report: Some(report),
                error: None,
            },
            Err(e) => {
                if e.exit_code() == 0 {
                    info!("{}", e);
                } else {
                    error!(folder = %folder.display(), "{}", e);
                }
                BatchEntry {
                    folder,
                    report: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    Ok(entries)
}
