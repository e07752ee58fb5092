//! Feature extraction for paintings.
//!
//! Converts raw images into fixed-length embedding vectors using a
//! pretrained image-classification model, either one image at a time or as
//! a lazy stream over a whole dataset.

pub mod dataset;
pub mod error;
pub mod features;
pub mod model;
pub mod preprocessing;
