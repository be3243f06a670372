mod crop_rect;
mod det_box;
mod detection;
mod detector_kind;
mod model_config;
mod normalization;
mod source_image;

pub use crop_rect::*;
pub use det_box::*;
pub use detection::*;
pub use detector_kind::*;
pub use model_config::*;
pub use normalization::*;
pub use source_image::*;
