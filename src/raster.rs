//! Rasterization of pick targets into bitmaps

use std::{collections::HashMap, fmt::Debug, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::image::{PixelReader, RawImage, RawImageError};

#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("target `{0}` is not available for capture")]
    TargetUnavailable(String),
    #[error("image error: {0}")]
    Image(#[from] RawImageError),
    #[error("capture task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Produces a bitmap snapshot of a target
///
/// This is the only asynchronous step of a pick.
#[async_trait]
pub trait Rasterizer: Send + Sync + 'static {
    /// Identifies what is being captured, as carried by click events
    type Target: Debug + Send + Sync + 'static;
    type Bitmap: PixelReader + Send + 'static;

    async fn rasterize(&self, target: &Self::Target) -> Result<Self::Bitmap, RasterizeError>;
}

/// Rasterizer serving already rendered bitmaps by name
#[derive(Debug, Default, Clone)]
pub struct ImageRasterizer {
    images: HashMap<String, Arc<RawImage>>,
}

impl ImageRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, name: impl Into<String>, image: RawImage) -> Self {
        self.insert(name, image);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, image: RawImage) {
        self.images.insert(name.into(), Arc::new(image));
    }
}

#[async_trait]
impl Rasterizer for ImageRasterizer {
    type Target = String;
    type Bitmap = Arc<RawImage>;

    async fn rasterize(&self, target: &String) -> Result<Arc<RawImage>, RasterizeError> {
        self.images
            .get(target)
            .cloned()
            .ok_or_else(|| RasterizeError::TargetUnavailable(target.clone()))
    }
}

/// Rasterizer decoding image files, targets being file paths
#[derive(Debug, Default, Clone, Copy)]
pub struct FileRasterizer;

#[async_trait]
impl Rasterizer for FileRasterizer {
    type Target = PathBuf;
    type Bitmap = RawImage;

    async fn rasterize(&self, target: &PathBuf) -> Result<RawImage, RasterizeError> {
        let path = target.clone();

        debug!(path = %path.display(), "decoding image");
        let image = tokio::task::spawn_blocking(move || RawImage::open(&path)).await??;
        debug!(width = image.width(), height = image.height(), "decoded image");

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Color;

    #[tokio::test]
    async fn rasterize_named_image() {
        let rasterizer =
            ImageRasterizer::new().with_image("canvas", RawImage::filled(2, 2, Color::new(1, 2, 3)));

        let bitmap = rasterizer
            .rasterize(&"canvas".to_owned())
            .await
            .expect("canvas should be available");
        assert_eq!(bitmap.color_at(1, 1), Some(Color::new(1, 2, 3)));

        let missing = rasterizer.rasterize(&"overlay".to_owned()).await;
        assert!(matches!(missing, Err(RasterizeError::TargetUnavailable(name)) if name == "overlay"));
    }

    #[tokio::test]
    async fn rasterize_missing_file() {
        let result = FileRasterizer
            .rasterize(&PathBuf::from("/nonexistent/eyedropper/target.png"))
            .await;

        assert!(matches!(result, Err(RasterizeError::Image(_))));
    }
}
