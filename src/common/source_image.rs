use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use crate::error::DetectError;

/// Decoded source frame, always 8-bit RGB.
#[derive(Debug, Clone, Default)]
pub struct SourceImage {
    pub image: RgbImage,
}

impl std::ops::Deref for SourceImage {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl From<RgbImage> for SourceImage {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

impl From<RgbaImage> for SourceImage {
    fn from(image: RgbaImage) -> Self {
        Self::from_rgba(&image)
    }
}

impl From<GrayImage> for SourceImage {
    fn from(image: GrayImage) -> Self {
        Self {
            image: DynamicImage::from(image).to_rgb8(),
        }
    }
}

impl From<DynamicImage> for SourceImage {
    fn from(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageRgb8(rgb) => Self { image: rgb },
            DynamicImage::ImageRgba8(rgba) => Self::from_rgba(&rgba),
            other => Self {
                image: other.to_rgb8(),
            },
        }
    }
}

impl From<SourceImage> for RgbImage {
    fn from(image: SourceImage) -> Self {
        image.image
    }
}

impl SourceImage {
    /// Decodes a compressed image (PNG, JPEG, ...) into RGB.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DetectError> {
        let image = image::load_from_memory(bytes).map_err(DetectError::Decode)?;
        Ok(Self::from(image))
    }

    /// Drops the alpha byte of every pixel. Alpha is never blended into the colour.
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let rgb: Vec<u8> = image
            .as_raw()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        // Buffer length is exactly width * height * 3 by construction.
        let image = RgbImage::from_raw(width, height, rgb).unwrap_or_else(|| RgbImage::new(width, height));
        Self { image }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn into_rgb8(self) -> RgbImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn alpha_is_dropped_not_blended() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 0]));
        let src = SourceImage::from(DynamicImage::ImageRgba8(rgba));
        assert_eq!(src.dimensions(), (2, 2));
        assert!(src.as_raw().chunks(3).all(|px| px == [200, 100, 50]));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = SourceImage::from_bytes(b"definitely not a png").unwrap_err();
        assert!(matches!(err, DetectError::Decode(_)));
    }
}
