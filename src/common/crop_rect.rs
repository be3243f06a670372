use serde::{Deserialize, Serialize};
use crate::error::CropError;

/// Requested crop in source pixel coordinates. May be fractional or partly outside the source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub origin_x: f32,
    pub origin_y: f32,
    pub width: f32,
    pub height: f32,
}

/// Crop that is known to lie inside the source image.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Which path preprocessing took for the crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropResult {
    /// No crop was requested.
    NotRequested,
    /// The crop was applied, clamped to the source bounds.
    Cropped(CropRegion),
    /// The crop was unusable and the full image was used instead.
    FallbackFullImage { reason: CropError },
}

impl CropResult {
    pub fn is_fallback(&self) -> bool {
        matches!(self, CropResult::FallbackFullImage { .. })
    }
}

impl CropRect {
    pub fn new(origin_x: f32, origin_y: f32, width: f32, height: f32) -> Self {
        Self { origin_x, origin_y, width, height }
    }

    /// Clamps the rectangle to a `src_width x src_height` image.
    ///
    /// The origin is floored and the size is kept at least one pixel, so any rectangle that
    /// overlaps the source yields a non-empty region.
    pub fn clamp_to(&self, src_width: u32, src_height: u32) -> Result<CropRegion, CropError> {
        let Self { origin_x, origin_y, width, height } = *self;
        if ![origin_x, origin_y, width, height].iter().all(|v| v.is_finite()) {
            return Err(CropError::NonFinite);
        }
        if width <= 0. || height <= 0. {
            return Err(CropError::Degenerate { width, height });
        }

        let (sw, sh) = (src_width as f32, src_height as f32);
        let out_of_bounds = CropError::OutOfBounds { src_width, src_height };
        if src_width == 0 || src_height == 0 {
            return Err(out_of_bounds);
        }

        let x0 = origin_x.floor().max(0.);
        let y0 = origin_y.floor().max(0.);
        if x0 >= sw || y0 >= sh || origin_x + width <= 0. || origin_y + height <= 0. {
            return Err(out_of_bounds);
        }
        let x1 = (origin_x + width).floor().min(sw);
        let y1 = (origin_y + height).floor().min(sh);

        Ok(CropRegion {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0).max(1.) as u32,
            height: (y1 - y0).max(1.) as u32,
        })
    }
}

/// Largest square centred in a `width x height` frame, `None` for an empty frame.
pub fn center_square_crop(width: u32, height: u32) -> Option<CropRect> {
    if width == 0 || height == 0 {
        return None;
    }
    let side = width.min(height) as f32;
    Some(CropRect::new(
        (width as f32 - side) / 2.,
        (height as f32 - side) / 2.,
        side,
        side,
    ))
}
