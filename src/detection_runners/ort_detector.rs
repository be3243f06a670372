//! ONNX Runtime backed engine. The runtime library is loaded dynamically.

use anyhow::Result;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::{Session, SessionInputValue};
use ort::value::Value;
use crate::data::DetectorOptions;
use crate::detection_runners::engine::{InferenceEngine, ModelLoader, RawOutput};
use crate::detection_runners::tensor::Tensor;

/// ONNXRuntime Backend
#[derive(Debug)]
pub struct OrtEngine {
    session: Session,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl OrtEngine {
    pub fn new(options: &DetectorOptions) -> Result<Self> {
        if let Some(ort_lib_path) = &options.ort_lib_path {
            let ort_init = ort::init_from(ort_lib_path);
            if let Err(e) = ort_init.commit() {
                return Err(anyhow::anyhow!("Failed to commit ORT: {:?}", e));
            }
        }

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&options.weights_path)?;

        let input_names: Vec<String> = session.inputs.iter().map(|i| i.name.to_string()).collect();
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.to_string()).collect();
        log::info!(
            "Backend: ONNXRuntime | Model: {} | Inputs: {:?} | Outputs: {:?}",
            options.weights_path, input_names, output_names
        );

        Ok(Self {
            session,
            input_names,
            output_names,
        })
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

impl InferenceEngine for OrtEngine {
    fn run(&mut self, inputs: &[Tensor]) -> Result<Vec<RawOutput>> {
        let mut xs_ = Vec::with_capacity(inputs.len());
        for x in inputs {
            // Exported detectors take a batch of one.
            let value = Value::from_array(x.batched().0)?.into_dyn();
            xs_.push(Into::<SessionInputValue<'_>>::into(value));
        }

        let outputs = self.session.run(&xs_[..])?;

        let mut ys = Vec::with_capacity(self.output_names.len());
        for name in self.output_names.iter() {
            let y = outputs[name.as_str()].try_extract_array::<f32>()?;
            ys.push(RawOutput::named(name, y.iter().copied().collect()));
        }
        Ok(ys)
    }

    fn metadata(&self, key: &str) -> Option<String> {
        match self.session.metadata() {
            Err(_) => None,
            Ok(metadata) => metadata.custom(key).unwrap_or_default(),
        }
    }
}

/// Loads `options.weights_path` with ONNX Runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrtLoader;

impl ModelLoader for OrtLoader {
    type Engine = OrtEngine;

    fn load(&self, options: &DetectorOptions) -> Result<OrtEngine> {
        OrtEngine::new(options)
    }
}
