use image::{GrayImage, Luma};
use crate::config::ThresholdBand;

/// Inclusive band binarization producing a 0/1 plane
#[derive(Debug, Clone, Copy, Default)]
pub struct BandThreshold {
    pub band: ThresholdBand,
}

impl BandThreshold {
    pub fn new(band: ThresholdBand) -> Self {
        Self { band }
    }

    pub fn binarize(&self, intensity: &GrayImage) -> GrayImage {
        GrayImage::from_fn(intensity.width(), intensity.height(), |x, y| {
            Luma([u8::from(self.band.contains(intensity.get_pixel(x, y)[0]))])
        })
    }
}
