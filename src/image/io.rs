//! I/O helpers for photos and JSON.
//!
//! - `load_rgba_image`: decode a PNG/JPEG into an owned RGBA buffer.
//! - `save_intensity_png`: write an `ImageF32` in [0, 1] to a grayscale PNG.
//! - `write_json_file` / `read_json_file`: serde round-trips with path context.
use super::{ImageF32, ImageView, RasterImage};
use crate::error::{PalmError, Result};
use image::{GrayImage, Luma};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned RGBA buffer with a borrowed [`RasterImage`] view.
#[derive(Clone, Debug)]
pub struct OwnedRaster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl OwnedRaster {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_view(&self) -> RasterImage<'_> {
        RasterImage {
            w: self.width,
            h: self.height,
            data: &self.data,
        }
    }
}

/// Load a photo from disk and convert it to 8-bit RGBA.
pub fn load_rgba_image(path: &Path) -> Result<OwnedRaster> {
    let img = image::open(path)
        .map_err(|source| PalmError::ImageCodec {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(OwnedRaster::new(width, height, img.into_raw()))
}

/// Save a float field to a grayscale PNG, mapping [0, 1] to [0, 255].
pub fn save_intensity_png(image: &ImageF32, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = (px * 255.0).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path).map_err(|source| PalmError::ImageCodec {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|source| PalmError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| PalmError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and deserialize a JSON document.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = read_text_file(path)?;
    serde_json::from_str(&data).map_err(|source| PalmError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| PalmError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| PalmError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
