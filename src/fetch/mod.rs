//! Tile grid acquisition: probe `{base_url}{col}_{row}{ext}` column by
//! column and store every tile found as `{col}_{row}.jpg`.

pub mod grid;
pub mod session;
pub mod source;

use crate::utils::http::{get_user_agent, DEFAULT_TIMEOUT_SECS};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for both the row and the column counter.
pub const DEFAULT_MAX_ROW_COL_COUNT: u32 = 60;

/// Extensions tried for the whole grid, in order.
pub const EXTENSIONS: [&str; 2] = [".jpg", ".jpeg"];

/// Settings for one acquisition run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Prefix every tile name is appended to, e.g. `https://host/art/`.
    pub base_url: String,
    /// Folder tiles are written to. Created if absent.
    pub dest: PathBuf,
    pub max_row_col_count: u32,
    pub extensions: Vec<&'static str>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl FetchConfig {
    pub fn new(base_url: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            dest: dest.into(),
            max_row_col_count: DEFAULT_MAX_ROW_COL_COUNT,
            extensions: EXTENSIONS.to_vec(),
            user_agent: get_user_agent().to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_max_row_col_count(mut self, max: u32) -> Self {
        self.max_row_col_count = max;
        self
    }
}

/// Summary of one acquisition run.
#[derive(Debug, Clone, Serialize)]
pub struct FetchReport {
    pub base_url: String,
    pub dest: PathBuf,
    /// Extension the grid was found under; `None` when even (0, 0) was missing.
    pub extension: Option<String>,
    pub tiles: usize,
    pub columns: u32,
    pub rows: u32,
    pub duplicates: usize,
}
