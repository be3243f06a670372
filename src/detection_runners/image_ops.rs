//! Functions to turn source images into model input tensors.

use std::borrow::Cow;
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;
use rayon::prelude::*;
use crate::common::{CropRect, CropResult, Normalization, SourceImage};
use crate::detection_runners::tensor::Tensor;
use crate::error::DetectError;

/// Tensor plus what happened on the way there.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// `[target_height, target_width, 3]`.
    pub tensor: Tensor,
    pub crop: CropResult,
    pub source_width: u32,
    pub source_height: u32,
}

/// Decodes `source`, optionally crops it, resizes to `target_width x target_height` and
/// converts to floats.
///
/// A crop that cannot be applied is not an error: the full image is used and the returned
/// [`CropResult`] says so.
pub fn preprocess<N: Into<Normalization>>(
    source: &[u8],
    target_width: u32,
    target_height: u32,
    normalize: N,
    crop: Option<&CropRect>,
) -> Result<Preprocessed, DetectError> {
    check_target(target_width, target_height)?;
    let image = SourceImage::from_bytes(source)?;
    preprocess_image(&image, target_width, target_height, normalize, crop)
}

/// Same as [`preprocess`] for an already decoded frame.
pub fn preprocess_image<N: Into<Normalization>>(
    image: &SourceImage,
    target_width: u32,
    target_height: u32,
    normalize: N,
    crop: Option<&CropRect>,
) -> Result<Preprocessed, DetectError> {
    check_target(target_width, target_height)?;
    let normalization = normalize.into();
    let (source_width, source_height) = image.dimensions();

    let (region, crop) = apply_crop(image, crop);
    let resized = resize_rgb(&region, target_width, target_height);
    let values = to_f32s(&resized, normalization);

    let tensor = Tensor::from_hwc(target_height as usize, target_width as usize, values)
        .map_err(|_| DetectError::Dimension { width: target_width, height: target_height })?;

    Ok(Preprocessed {
        tensor,
        crop,
        source_width,
        source_height,
    })
}

fn check_target(width: u32, height: u32) -> Result<(), DetectError> {
    if width == 0 || height == 0 {
        return Err(DetectError::Dimension { width, height });
    }
    Ok(())
}

// First attempt uses the crop, the second the whole frame.
fn apply_crop<'a>(image: &'a SourceImage, crop: Option<&CropRect>) -> (Cow<'a, RgbImage>, CropResult) {
    let Some(rect) = crop else {
        return (Cow::Borrowed(&image.image), CropResult::NotRequested);
    };

    let (w, h) = image.dimensions();
    match rect.clamp_to(w, h) {
        Ok(region) => {
            let cropped = image::imageops::crop_imm(&image.image, region.x, region.y, region.width, region.height)
                .to_image();
            (Cow::Owned(cropped), CropResult::Cropped(region))
        }
        Err(reason) => {
            log::warn!("Crop {rect:?} unusable on {w}x{h} source ({reason}), using full image");
            (Cow::Borrowed(&image.image), CropResult::FallbackFullImage { reason })
        }
    }
}

/// Bilinear resize; `fast_image_resize` first, `image` as fallback.
pub fn resize_rgb(image: &RgbImage, target_width: u32, target_height: u32) -> RgbImage {
    if image.dimensions() == (target_width, target_height) {
        return image.clone();
    }

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));

    let mut resized = RgbImage::new(target_width, target_height);
    if let Err(err) = resizer.resize(image, &mut resized, &options) {
        log::warn!("Failed to use `fast_image_resize`: {err:?}. Falling back.");
        resized = image::imageops::resize(image, target_width, target_height, image::imageops::FilterType::Triangle);
    }
    resized
}

pub fn to_f32s(image: &RgbImage, normalization: Normalization) -> Vec<f32> {
    image
        .as_raw()
        .par_iter()
        .map(|x| normalization.apply(*x))
        .collect()
}
