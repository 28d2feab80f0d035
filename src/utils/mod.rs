//! Utility modules for tile-stitch
//!
//! This module contains the thin I/O wrappers used by both pipelines:
//! - `files`: Directory handling and output naming
//! - `images`: Tile decoding and JPEG output
//! - `http`: HTTP client utilities

pub mod files;
pub mod http;
pub mod images;
