use image::RgbImage;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Extension every tile carries on disk, whatever the remote source used.
pub const TILE_EXTENSION: &str = "jpg";

fn tile_name_regex() -> &'static Regex {
    static TILE_NAME: OnceLock<Regex> = OnceLock::new();
    TILE_NAME.get_or_init(|| {
        Regex::new(r"^([0-9]+)_([0-9]+)\.jpg$").expect("tile name pattern is valid")
    })
}

/// Grid position of one tile. Ordered column-major so iteration starts at (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileCoordinate {
    pub col: u32,
    pub row: u32,
}

impl TileCoordinate {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Parse a file name of the form `{col}_{row}.jpg`.
    ///
    /// Returns `None` for anything else, including digit runs too large for `u32`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let caps = tile_name_regex().captures(name)?;
        let col = caps[1].parse().ok()?;
        let row = caps[2].parse().ok()?;
        Some(Self { col, row })
    }

    /// `{col}_{row}`, shared by remote URLs and local file names.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.col, self.row)
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_stem(), TILE_EXTENSION)
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Decoded tiles keyed by coordinate.
///
/// Sparse on purpose: holes in the grid are simply absent keys, and the grid
/// extent is derived from the largest coordinates present.
#[derive(Debug, Default, Clone)]
pub struct TileSet {
    tiles: BTreeMap<TileCoordinate, RgbImage>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, coord: TileCoordinate, tile: RgbImage) -> Option<RgbImage> {
        self.tiles.insert(coord, tile)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TileCoordinate, &RgbImage)> {
        self.tiles.iter()
    }

    /// The tile whose dimensions are taken as authoritative for the grid.
    pub fn first(&self) -> Option<(&TileCoordinate, &RgbImage)> {
        self.tiles.iter().next()
    }

    /// Largest column and largest row present, taken independently.
    pub fn extent(&self) -> Option<(u32, u32)> {
        let max_col = self.tiles.keys().map(|c| c.col).max()?;
        let max_row = self.tiles.keys().map(|c| c.row).max()?;
        Some((max_col, max_row))
    }
}

impl FromIterator<(TileCoordinate, RgbImage)> for TileSet {
    fn from_iter<I: IntoIterator<Item = (TileCoordinate, RgbImage)>>(iter: I) -> Self {
        Self {
            tiles: iter.into_iter().collect(),
        }
    }
}
