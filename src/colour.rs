//! Dominant colour naming for the colour identification screen.

use serde::{Deserialize, Serialize};
use crate::common::{CropRect, Normalization};
use crate::detection_runners::image_ops;
use crate::error::DetectError;

const BIN_COUNT: usize = 8;
const BIN_SIZE: u32 = 256 / BIN_COUNT as u32;

/// Frames are downsampled to this square before binning.
pub const DOWNSAMPLE_SIZE: u32 = 32;

#[derive(Debug, Clone, Copy, Default)]
struct Bin {
    count: u32,
    r: u32,
    g: u32,
    b: u32,
    first_seen: usize,
}

/// Mean colour of the most populated RGB bin of a `[0, 1]` interleaved RGB tensor.
///
/// Each channel is split into 8 bins. When two bins hold the same number of pixels the one
/// seen first wins. An empty tensor yields black.
pub fn dominant_colour(pixels: &[f32]) -> [u8; 3] {
    let mut bins = [Bin::default(); BIN_COUNT * BIN_COUNT * BIN_COUNT];

    for (i, px) in pixels.chunks_exact(3).enumerate() {
        let [r, g, b] = [px[0], px[1], px[2]].map(|v| (v * 255.).round().clamp(0., 255.) as u32);
        let bin_of = |v: u32| (v / BIN_SIZE).min(BIN_COUNT as u32 - 1) as usize;
        let key = (bin_of(r) * BIN_COUNT + bin_of(g)) * BIN_COUNT + bin_of(b);

        let bin = &mut bins[key];
        if bin.count == 0 {
            bin.first_seen = i;
        }
        bin.count += 1;
        bin.r += r;
        bin.g += g;
        bin.b += b;
    }

    let best = bins
        .iter()
        .filter(|b| b.count > 0)
        .min_by_key(|b| (std::cmp::Reverse(b.count), b.first_seen));

    match best {
        Some(b) => {
            let mean = |sum: u32| (sum as f32 / b.count as f32).round() as u8;
            [mean(b.r), mean(b.g), mean(b.b)]
        }
        None => [0, 0, 0],
    }
}

/// Hue in whole degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
pub fn rgb_to_hsl(rgb: [u8; 3]) -> (f32, f32, f32) {
    let [rn, gn, bn] = rgb.map(|c| c as f32 / 255.);
    let max = rn.max(gn).max(bn);
    let min = rn.min(gn).min(bn);
    let delta = max - min;

    let mut h = 0.;
    if delta != 0. {
        h = if max == rn {
            ((gn - bn) / delta) % 6.
        } else if max == gn {
            (bn - rn) / delta + 2.
        } else {
            (rn - gn) / delta + 4.
        };
        // Half-up rounding.
        h = (h * 60. + 0.5).floor();
        if h < 0. {
            h += 360.;
        }
    }

    let l = (max + min) / 2.;
    let s = if delta == 0. { 0. } else { delta / (1. - (2. * l - 1.).abs()) };
    (h, s, l)
}

/// Plain-language colour name, e.g. `"Dark Red"` or `"Light Gray"`.
pub fn colour_name(rgb: [u8; 3]) -> String {
    let (h, s, l) = rgb_to_hsl(rgb);

    if s < 0.15 {
        let grey = if l < 0.15 {
            "Black"
        } else if l > 0.85 {
            "White"
        } else if l < 0.5 {
            "Dark Gray"
        } else {
            "Light Gray"
        };
        return grey.to_string();
    }

    let base = if h >= 345. || h < 15. {
        "Red"
    } else if h < 35. {
        if l < 0.4 { "Brown" } else { "Orange" }
    } else if h < 60. {
        "Yellow"
    } else if h < 150. {
        "Green"
    } else if h < 200. {
        "Cyan"
    } else if h < 250. {
        "Blue"
    } else if h < 290. {
        "Purple"
    } else {
        "Pink"
    };

    if l < 0.35 {
        format!("Dark {base}")
    } else if l > 0.7 {
        format!("Light {base}")
    } else {
        base.to_string()
    }
}

pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColourResult {
    pub name: String,
    pub hex: String,
    pub rgb: [u8; 3],
}

/// Names the dominant colour of a compressed image, optionally cropped first.
pub fn identify_colour(source: &[u8], crop: Option<&CropRect>) -> Result<ColourResult, DetectError> {
    let pre = image_ops::preprocess(source, DOWNSAMPLE_SIZE, DOWNSAMPLE_SIZE, Normalization::UnitRange, crop)?;
    let rgb = dominant_colour(&pre.tensor.to_vec());
    Ok(ColourResult {
        name: colour_name(rgb),
        hex: to_hex(rgb),
        rgb,
    })
}
