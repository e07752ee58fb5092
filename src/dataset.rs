use crate::preprocessing::RawImage;

/// A collection of raw images with a known logical size.
///
/// `images()` consumes the dataset into a forward-only sequence in the
/// dataset's own order; traversing it again requires a fresh dataset value.
/// How the images are stored or fetched is the implementor's business.
pub trait Dataset {
    type Images: Iterator<Item = RawImage>;

    /// Number of images the dataset will yield. Reported for observability;
    /// correctness does not depend on it.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the dataset into its image sequence.
    fn images(self) -> Self::Images;
}

/// In-memory dataset over an already-loaded batch of images.
impl Dataset for Vec<RawImage> {
    type Images = std::vec::IntoIter<RawImage>;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn images(self) -> Self::Images {
        self.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::*;

    #[test]
    fn vec_dataset_reports_length_and_preserves_order() {
        let dataset: Vec<RawImage> = (1..=3)
            .map(|n| RawImage::from_bgr(Array3::zeros((n, 10, 3))))
            .collect();
        assert_eq!(Dataset::len(&dataset), 3);
        assert!(!dataset.is_empty());

        let heights: Vec<usize> = dataset.images().map(|image| image.height()).collect();
        assert_eq!(heights, vec![1, 2, 3]);
    }
}
