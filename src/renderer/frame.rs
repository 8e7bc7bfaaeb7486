//! Fixed-size RGB frame

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::ExportError;
use crate::settings::Rgb as Color;

/// One rendered frame: row-major RGB8 pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Frame filled with a single color
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Rgb(color)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel at `(x, y)`, `None` outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Write a pixel, silently clipping anything outside the frame
    #[inline]
    pub fn put(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, Rgb(color));
    }

    /// Raw row-major RGB bytes (`width * height * 3`)
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Count pixels of exactly `color`
    pub fn count(&self, color: Color) -> usize {
        self.image.pixels().filter(|p| p.0 == color).count()
    }

    /// Save as PNG
    pub fn save_png(&self, path: &Path) -> Result<(), ExportError> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| ExportError::Image {
                path: path.to_path_buf(),
                source,
            })
    }
}
