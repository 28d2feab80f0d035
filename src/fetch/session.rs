use crate::tile::TileCoordinate;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Lowercase hex SHA-256 of a tile body.
pub fn content_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Remembers the digest of every tile stored so far.
///
/// A repeated body means the source has started serving the same image
/// again past the real grid edge.
#[derive(Debug, Default)]
pub struct ContentDeduper {
    seen: HashSet<String>,
}

impl ContentDeduper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `bytes`. Returns `false` if identical content was seen before.
    pub fn admit(&mut self, bytes: &[u8]) -> bool {
        self.seen.insert(content_digest(bytes))
    }
}

/// State of one grid walk under one extension.
#[derive(Debug)]
pub struct FetchSession {
    pub extension: &'static str,
    pub position: TileCoordinate,
    pub deduper: ContentDeduper,
    pub written: Vec<TileCoordinate>,
    pub duplicates: Vec<TileCoordinate>,
}

impl FetchSession {
    pub fn new(extension: &'static str) -> Self {
        Self {
            extension,
            position: TileCoordinate::new(0, 0),
            deduper: ContentDeduper::new(),
            written: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    /// Number of columns that produced at least one tile.
    pub fn columns(&self) -> u32 {
        self.written.iter().map(|c| c.col + 1).max().unwrap_or(0)
    }

    /// Tallest column, in tiles.
    pub fn rows(&self) -> u32 {
        self.written.iter().map(|c| c.row + 1).max().unwrap_or(0)
    }
}
