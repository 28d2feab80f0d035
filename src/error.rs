//! Error types for both pipelines.
//!
//! A failed or duplicate fetch is not an error: the fetcher reads it as a
//! grid boundary. Only conditions that abort a run appear here.

use crate::assemble::composer::CanvasLayout;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a tile set could not be turned into a canvas.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("No tiles to compose")]
    Empty,

    #[error("Canvas for {:?} does not fit in memory", .0)]
    TooLarge(CanvasLayout),
}

/// Errors that stop an assembly run.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// The output image is already on disk. Benign: nothing is overwritten.
    #[error("Image with name {} already exists. Please delete it before running again.", .0.display())]
    OutputExists(PathBuf),

    #[error("Folder with path {} does not exist", .0.display())]
    InputMissing(PathBuf),

    #[error("No tiles named {{col}}_{{row}}.jpg found in {}", .0.display())]
    NoTilesFound(PathBuf),

    /// Grid extent times tile size does not fit a single canvas, usually
    /// because of a stray far-out tile name.
    #[error(
        "Canvas for tiles up to col={max_col} row={max_row} at {tile_width}x{tile_height} px in {} is too large",
        .path.display()
    )]
    CanvasTooLarge {
        path: PathBuf,
        max_col: u32,
        max_row: u32,
        tile_width: u32,
        tile_height: u32,
    },

    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode tile {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl AssembleError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AssembleError::OutputExists(_) => 0,
            _ => 1,
        }
    }
}

/// Errors that stop an acquisition run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Row or column counter hit the configured maximum. Almost always means
    /// the source answers every request, so probing would never end.
    #[error("max_row_col_count ({max}) reached for col={col} row={row}. This is likely an error. Terminating.")]
    CeilingReached { max: u32, col: u32, row: u32 },

    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write tile {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove duplicate tile {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_exists_is_benign() {
        let err = AssembleError::OutputExists(PathBuf::from("art.jpg"));
        assert_eq!(err.exit_code(), 0);
        assert_eq!(
            err.to_string(),
            "Image with name art.jpg already exists. Please delete it before running again."
        );
    }

    #[test]
    fn test_fatal_assembly_errors_exit_one() {
        assert_eq!(AssembleError::InputMissing(PathBuf::from("art")).exit_code(), 1);
        assert_eq!(AssembleError::NoTilesFound(PathBuf::from("art")).exit_code(), 1);
    }

    #[test]
    fn test_canvas_too_large_is_fatal() {
        let err = AssembleError::CanvasTooLarge {
            path: PathBuf::from("art"),
            max_col: u32::MAX,
            max_row: 0,
            tile_width: 256,
            tile_height: 256,
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("col=4294967295 row=0 at 256x256 px"));
    }

    #[test]
    fn test_no_tiles_message_shows_pattern() {
        let err = AssembleError::NoTilesFound(PathBuf::from("art"));
        assert_eq!(err.to_string(), "No tiles named {col}_{row}.jpg found in art");
    }

    #[test]
    fn test_ceiling_message() {
        let err = FetchError::CeilingReached {
            max: 60,
            col: 0,
            row: 60,
        };
        assert_eq!(err.exit_code(), 1);
        let msg = err.to_string();
        assert!(msg.contains("(60)"));
        assert!(msg.contains("col=0 row=60"));
    }

    #[test]
    fn test_error_source_is_kept() {
        use std::error::Error as _;
        let err = FetchError::Write {
            path: PathBuf::from("tiles/0_0.jpg"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
    }
}
