//! Seams to the black-box inference runtime.

use crate::data::DetectorOptions;
use crate::detection_runners::tensor::Tensor;

/// Flat output tensor of one model output. Length and layout are not guaranteed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOutput {
    pub name: Option<String>,
    pub data: Vec<f32>,
}

impl RawOutput {
    pub fn new(data: Vec<f32>) -> Self {
        Self { name: None, data }
    }

    pub fn named(name: &str, data: Vec<f32>) -> Self {
        Self {
            name: Some(name.to_string()),
            data,
        }
    }
}

impl From<Vec<f32>> for RawOutput {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl std::ops::Deref for RawOutput {
    type Target = [f32];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// A loaded model. Calls take `&mut self`, so one engine serves one request at a time.
pub trait InferenceEngine: Send {
    fn run(&mut self, inputs: &[Tensor]) -> anyhow::Result<Vec<RawOutput>>;

    /// Free-form model metadata, e.g. the `names` entry of an exported detector.
    fn metadata(&self, _key: &str) -> Option<String> {
        None
    }
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn run(&mut self, inputs: &[Tensor]) -> anyhow::Result<Vec<RawOutput>> {
        (**self).run(inputs)
    }

    fn metadata(&self, key: &str) -> Option<String> {
        (**self).metadata(key)
    }
}

/// Resolves a model description to a loaded engine.
pub trait ModelLoader {
    type Engine: InferenceEngine;

    fn load(&self, options: &DetectorOptions) -> anyhow::Result<Self::Engine>;
}

impl<F, E> ModelLoader for F
where
    F: Fn(&DetectorOptions) -> anyhow::Result<E>,
    E: InferenceEngine,
{
    type Engine = E;

    fn load(&self, options: &DetectorOptions) -> anyhow::Result<E> {
        self(options)
    }
}
