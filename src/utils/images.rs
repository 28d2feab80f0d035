use crate::error::AssembleError;
use image::{ImageFormat, RgbImage};
use std::path::Path;

/// Decode a tile from disk as 8-bit RGB.
pub fn open_tile(path: &Path) -> Result<RgbImage, AssembleError> {
    let img = image::open(path).map_err(|source| AssembleError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(img.into_rgb8())
}

/// Save an image as JPEG regardless of the extension on `path`.
pub fn save_jpeg(image: &RgbImage, path: &Path) -> Result<(), AssembleError> {
    image
        .save_with_format(path, ImageFormat::Jpeg)
        .map_err(|source| AssembleError::Save {
            path: path.to_path_buf(),
            source,
        })
}
