use crate::error::AssembleError;
use crate::tile::{TileCoordinate, TileSet};
use crate::utils::images::open_tile;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Builds a [`TileSet`] from a folder of `{col}_{row}.jpg` files.
pub struct TileIndexer;

impl TileIndexer {
    /// Decode every tile in `dir`. Files with other names are skipped.
    ///
    /// Fails with [`AssembleError::NoTilesFound`] when nothing matched, since
    /// there is no grid to size a canvas from.
    pub fn index(dir: &Path) -> Result<TileSet, AssembleError> {
        let entries = fs::read_dir(dir).map_err(|source| AssembleError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut tiles = TileSet::new();
        let mut skipped = 0usize;

        for entry in entries {
            let entry = entry.map_err(|source| AssembleError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let coord = entry
                .file_name()
                .to_str()
                .and_then(TileCoordinate::from_file_name);

            match coord {
                Some(coord) => {
                    let tile = open_tile(&path)?;
                    debug!(%coord, width = tile.width(), height = tile.height(), "Indexed tile");
                    tiles.insert(coord, tile);
                }
                None => {
                    debug!(path = %path.display(), "Ignoring non-tile file");
                    skipped += 1;
                }
            }
        }

        if tiles.is_empty() {
            return Err(AssembleError::NoTilesFound(dir.to_path_buf()));
        }

        info!(
            folder = %dir.display(),
            tiles = tiles.len(),
            skipped,
            "Indexed tile folder"
        );
        Ok(tiles)
    }
}
