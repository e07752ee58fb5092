#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("image cannot be interpreted as a 3-channel array: {reason}")]
    InvalidImage { reason: String },
    #[error("model provider could not produce a ready model")]
    ModelUnavailable(#[source] anyhow::Error),
    #[error("forward pass failed")]
    Inference(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
