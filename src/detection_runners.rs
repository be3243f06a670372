pub mod decoder;
pub mod engine;
pub mod image_ops;
pub mod inference_process;
pub mod layout;
pub mod nms;
pub mod tensor;
#[cfg(feature = "onnx")]
pub mod ort_detector;

pub use decoder::{decode, decode_split, decode_with, decode_with_layout};
pub use engine::{InferenceEngine, ModelLoader, RawOutput};
pub use image_ops::{preprocess, preprocess_image, Preprocessed};
pub use layout::{resolve_counts, resolve_layout, Layout, LayoutHints, OutputLayout};
pub use nms::{suppress, Nms};
pub use tensor::Tensor;
#[cfg(feature = "onnx")]
pub use ort_detector::{OrtEngine, OrtLoader};
