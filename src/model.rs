//! The model seam: a ready-to-run classification model and the provider
//! that loads it.
//!
//! The pipeline treats the model as a black box exposing one forward pass.
//! The ONNX-backed implementation below is the production path; tests plug
//! in their own [`Model`] doubles.

use std::path::{Path, PathBuf};

use ndarray::{Array4, ArrayD, IxDyn};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

use crate::error::{Error, Result};

/// A loaded, stateful inference model. One forward pass per call, blocking.
///
/// Inference engines of this kind are not guaranteed reentrant, so the
/// forward pass takes `&mut self`; a model instance has a single owner for
/// the duration of a workload.
pub trait Model {
    fn predict(&mut self, input: Array4<f32>) -> Result<ArrayD<f32>>;
}

/// Produces a ready model for a fixed, pretrained configuration.
/// Load failures surface as [`Error::ModelUnavailable`].
pub trait ModelProvider {
    type Model: Model;

    fn load(&self) -> Result<Self::Model>;
}

/// Loads the pretrained classification model from an ONNX file.
// TODO Switch ort to the load-dynamic strategy before shipping prebuilt
//      binaries, to avoid shared library hell.
pub struct OnnxProvider {
    model_path: PathBuf,
}

impl OnnxProvider {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        OnnxProvider {
            model_path: model_path.into(),
        }
    }
}

impl ModelProvider for OnnxProvider {
    type Model = OnnxModel;

    fn load(&self) -> Result<OnnxModel> {
        if !self.model_path.exists() {
            return Err(Error::ModelUnavailable(anyhow::anyhow!(
                "ONNX model not found at {}",
                self.model_path.display()
            )));
        }

        let session = build_session(&self.model_path)
            .map_err(|e| Error::ModelUnavailable(e.into()))?;
        log::debug!("model session ready: {}", self.model_path.display());

        Ok(OnnxModel { session })
    }
}

fn build_session(path: &Path) -> std::result::Result<Session, ort::Error> {
    Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(4)?
        .commit_from_file(path)
}

/// An ONNX Runtime session wrapped as a [`Model`].
///
/// The session holds native graph memory; dropping the model releases it.
/// Callers running repeated workloads should drop the model as soon as the
/// workload completes rather than keeping it cached indefinitely.
pub struct OnnxModel {
    session: Session,
}

impl Model for OnnxModel {
    fn predict(&mut self, input: Array4<f32>) -> Result<ArrayD<f32>> {
        let input = Tensor::from_array(input).map_err(to_inference)?;
        let outputs = self.session.run(ort::inputs![input]).map_err(to_inference)?;

        let (shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(to_inference)?;
        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();

        ArrayD::from_shape_vec(IxDyn(&dims), data.to_vec())
            .map_err(|e| Error::Inference(e.into()))
    }
}

fn to_inference(e: ort::Error) -> Error {
    Error::Inference(e.into())
}
