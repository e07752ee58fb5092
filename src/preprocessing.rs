/// Preprocessing functions for input data for the classification model.
/// Do not use these functions for any other purpose (for example,
/// to prepare images for display or thumbnailing).

use image::{imageops, imageops::FilterType, Rgb, RgbImage};
use ndarray::{Array3, Array4};

use crate::error::{Error, Result};

pub const IMAGE_INPUT_SIZE: usize = 224;

/// ImageNet per-channel means in RGB order. The ResNet family is trained on
/// mean-centered inputs; no further scaling is applied.
pub const IMAGENET_MEAN_RGB: [f32; 3] = [123.68, 116.779, 103.939];

/// A decoded image as it comes off the image source: height x width x 3
/// bytes, BGR channel order, arbitrary height and width.
#[derive(Debug, Clone)]
pub struct RawImage {
    pixels: Array3<u8>,
}

impl RawImage {
    /// Wrap a height x width x 3 BGR array. The channel count is not checked
    /// here; [`normalize`] rejects anything that is not 3-channel.
    pub fn from_bgr(pixels: Array3<u8>) -> Self {
        RawImage { pixels }
    }

    /// Convert from the `image` crate's RGB buffer, swapping to BGR.
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut pixels = Array3::zeros((height as usize, width as usize, 3));
        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            pixels[[y as usize, x as usize, 0]] = b;
            pixels[[y as usize, x as usize, 1]] = g;
            pixels[[y as usize, x as usize, 2]] = r;
        }
        RawImage { pixels }
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn pixels(&self) -> &Array3<u8> {
        &self.pixels
    }
}

/// Converts a raw image into the exact tensor the model expects:
/// shape `[1, 224, 224, 3]`, RGB channel order, mean-centered f32 values.
///
/// Images that are not already 224x224 are resampled first; images at the
/// target size skip the resample entirely. The input is never mutated, and
/// the result depends only on the input pixels.
pub fn normalize(image: &RawImage) -> Result<Array4<f32>> {
    let (height, width, channels) = image.pixels.dim();
    if channels != 3 || height == 0 || width == 0 {
        return Err(Error::InvalidImage {
            reason: format!("expected non-empty height x width x 3, got {:?}", image.pixels.dim()),
        });
    }

    let bgr = if height != IMAGE_INPUT_SIZE || width != IMAGE_INPUT_SIZE {
        resample(&image.pixels)
    } else {
        image.pixels.to_owned()
    };

    // BGR -> RGB swap, leading batch axis, and mean subtraction in one pass.
    let mut tensor = Array4::zeros((1, IMAGE_INPUT_SIZE, IMAGE_INPUT_SIZE, 3));
    for y in 0..IMAGE_INPUT_SIZE {
        for x in 0..IMAGE_INPUT_SIZE {
            let b = bgr[[y, x, 0]] as f32;
            let g = bgr[[y, x, 1]] as f32;
            let r = bgr[[y, x, 2]] as f32;
            tensor[[0, y, x, 0]] = r - IMAGENET_MEAN_RGB[0];
            tensor[[0, y, x, 1]] = g - IMAGENET_MEAN_RGB[1];
            tensor[[0, y, x, 2]] = b - IMAGENET_MEAN_RGB[2];
        }
    }

    Ok(tensor)
}

/// Resample to exactly 224x224 with a fixed filter. Channel order is
/// irrelevant to the resampler, so the BGR bytes ride through an `Rgb`
/// container unchanged.
fn resample(pixels: &Array3<u8>) -> Array3<u8> {
    let (height, width, _) = pixels.dim();
    let buffer = RgbImage::from_fn(width as u32, height as u32, |x, y| {
        Rgb([
            pixels[[y as usize, x as usize, 0]],
            pixels[[y as usize, x as usize, 1]],
            pixels[[y as usize, x as usize, 2]],
        ])
    });

    let resized = imageops::resize(
        &buffer,
        IMAGE_INPUT_SIZE as u32,
        IMAGE_INPUT_SIZE as u32,
        FilterType::CatmullRom,
    );

    let mut out = Array3::zeros((IMAGE_INPUT_SIZE, IMAGE_INPUT_SIZE, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        let [c0, c1, c2] = pixel.0;
        out[[y as usize, x as usize, 0]] = c0;
        out[[y as usize, x as usize, 1]] = c1;
        out[[y as usize, x as usize, 2]] = c2;
    }
    out
}
