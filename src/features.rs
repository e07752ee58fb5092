//! Feature extraction: raw images in, embedding vectors out.

use ndarray::ArrayD;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::model::{Model, ModelProvider};
use crate::preprocessing::{self, RawImage};

/// Runs images through the pretrained classification model and returns the
/// flattened output tensor as the image's embedding vector.
///
/// Two entry points: [`extract`](FeatureExtractor::extract) for one image,
/// [`extract_all`](FeatureExtractor::extract_all) for a whole dataset.
/// Both paths share the same preprocessing, so an embedding computed either
/// way is identical for the same image and model.
///
/// Each call loads a fresh model from the provider. Callers that extract
/// repeatedly and want to amortize the load should do so through
/// `extract_all`, which loads once for the whole traversal.
pub struct FeatureExtractor<P> {
    provider: P,
}

impl<P: ModelProvider> FeatureExtractor<P> {
    pub fn new(provider: P) -> Self {
        FeatureExtractor { provider }
    }

    /// Compute the embedding vector for a single image.
    ///
    /// Loads the model, normalizes the image, runs one forward pass, and
    /// flattens the output. The model session is released before returning.
    pub fn extract(&self, image: &RawImage) -> Result<Vec<f32>> {
        let mut model = self.provider.load()?;
        let input = preprocessing::normalize(image)?;
        let output = model.predict(input)?;
        // Release the session's native graph memory now, not at some later
        // scope exit chosen by the caller.
        drop(model);
        Ok(flatten(output))
    }

    /// Compute embeddings for every image in the dataset, lazily.
    ///
    /// The model is loaded once for the whole traversal. The returned
    /// iterator yields one embedding per image, in dataset order; nothing is
    /// fetched or inferred until the consumer asks for the next element, so
    /// peak memory stays at one image plus one tensor regardless of dataset
    /// size. The first failing item halts the stream; embeddings already
    /// yielded remain valid. A consumer that stops pulling simply drops the
    /// iterator, which releases the model.
    pub fn extract_all<D: Dataset>(&self, dataset: D) -> Result<Embeddings<D::Images, P::Model>> {
        let model = self.provider.load()?;
        log::info!("dataset holds {} images", dataset.len());
        Ok(Embeddings {
            images: dataset.images(),
            model: Some(model),
        })
    }
}

/// Lazy stream of embedding vectors over a dataset traversal.
///
/// Forward-only and single-use, like the dataset iteration underneath it.
/// Once the stream ends, by exhaustion or by the first error, the model is
/// dropped immediately so the runtime's native memory is reclaimed even if
/// the consumer keeps the handle around.
pub struct Embeddings<I, M> {
    images: I,
    model: Option<M>,
}

impl<I, M> Iterator for Embeddings<I, M>
where
    I: Iterator<Item = RawImage>,
    M: Model,
{
    type Item = Result<Vec<f32>>;

    fn next(&mut self) -> Option<Self::Item> {
        let model = self.model.as_mut()?;

        let Some(image) = self.images.next() else {
            self.model = None;
            return None;
        };

        let result = preprocessing::normalize(&image).and_then(|input| model.predict(input));
        match result {
            Ok(output) => Some(Ok(flatten(output))),
            Err(e) => {
                // Halt the stream: no further items after a failure.
                self.model = None;
                Some(Err(e))
            }
        }
    }
}

/// Collapse the model's output tensor into a flat embedding vector.
fn flatten(output: ArrayD<f32>) -> Vec<f32> {
    output.into_iter().collect()
}
