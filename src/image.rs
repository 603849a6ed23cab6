use std::{convert::TryFrom, path::Path, sync::Arc};

use thiserror::Error;

use crate::models::Color;

mod neighborhood;
pub use neighborhood::*;

/// Color lookup into a rasterized bitmap
pub trait PixelReader {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Color of the pixel at `(x, y)`, `None` past the right or bottom edge
    fn color_at(&self, x: u32, y: u32) -> Option<Color>;
}

impl<P: PixelReader + ?Sized> PixelReader for Arc<P> {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        (**self).color_at(x, y)
    }
}

#[derive(Debug, Error)]
pub enum RawImageError {
    #[error("invalid data ({data} bytes) for the given dimensions ({width} x {height} x {channels} = {expected})")]
    InvalidData {
        data: usize,
        width: usize,
        height: usize,
        channels: usize,
        expected: usize,
    },
    #[error("image error: {0}")]
    Decode(#[from] image::ImageError),
}

/// 8-bit sRGB bitmap, row-major, tightly packed
#[derive(Clone)]
pub struct RawImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl RawImage {
    pub const CHANNELS: usize = 3;

    /// Decodes an image file into an RGB bitmap. The alpha channel, if any, is dropped.
    pub fn open(path: &Path) -> Result<Self, RawImageError> {
        let image = image::open(path)?.to_rgb8();
        Ok(image.into())
    }

    /// Bitmap of the given size filled with a single color
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let (r, g, b) = color.into_components();
        let data = std::iter::repeat([r, g, b])
            .take(width as usize * height as usize)
            .flatten()
            .collect();

        Self {
            data,
            width: width as usize,
            height: height as usize,
        }
    }

    pub fn set_color(&mut self, x: u32, y: u32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            let (r, g, b) = color.into_components();
            self.data[idx..idx + Self::CHANNELS].copy_from_slice(&[r, g, b]);
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        let (x, y) = (x as usize, y as usize);

        if x < self.width && y < self.height {
            Some((y * self.width + x) * Self::CHANNELS)
        } else {
            None
        }
    }
}

impl PixelReader for RawImage {
    fn width(&self) -> u32 {
        self.width as _
    }

    fn height(&self) -> u32 {
        self.height as _
    }

    fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y)
            .map(|idx| Color::new(self.data[idx], self.data[idx + 1], self.data[idx + 2]))
    }
}

impl std::fmt::Debug for RawImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut f = f.debug_struct("RawImage");
        f.field("width", &self.width);
        f.field("height", &self.height);

        if self.data.len() > 32 {
            f.field("data", &format!("[{} bytes]", self.data.len()));
        } else {
            f.field("data", &self.data);
        }

        f.finish()
    }
}

impl TryFrom<(Vec<u8>, u32, u32)> for RawImage {
    type Error = RawImageError;

    fn try_from((data, width, height): (Vec<u8>, u32, u32)) -> Result<Self, Self::Error> {
        let width = width as usize;
        let height = height as usize;
        let expected = width * height * Self::CHANNELS;

        if data.len() != expected {
            return Err(RawImageError::InvalidData {
                data: data.len(),
                width,
                height,
                channels: Self::CHANNELS,
                expected,
            });
        }

        Ok(Self {
            data,
            width,
            height,
        })
    }
}

impl From<image::RgbImage> for RawImage {
    fn from(image: image::RgbImage) -> Self {
        let (width, height) = image.dimensions();

        Self {
            data: image.into_raw(),
            width: width as _,
            height: height as _,
        }
    }
}
