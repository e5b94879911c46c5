use image::{GrayImage, Luma};
use crate::{config::AlphaPolicy, types::{ChannelLayout, RasterImage}};

// Fixed-point luma weights for blue-first samples, scaled by 2^14.
const B_WEIGHT: u32 = 1868;
const G_WEIGHT: u32 = 9617;
const R_WEIGHT: u32 = 4899;
const SHIFT: u32 = 14;
const ROUND: u32 = 1 << (SHIFT - 1);

/// Collapses any supported channel layout into one intensity plane
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelCollapse {
    pub alpha: AlphaPolicy,
}

impl ChannelCollapse {
    pub fn new(alpha: AlphaPolicy) -> Self {
        Self { alpha }
    }

    pub fn to_intensity(&self, image: &RasterImage) -> GrayImage {
        GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let px = image.pixel(x, y);
            let value = match image.layout() {
                ChannelLayout::Gray => px[0],
                ChannelLayout::Bgr => bgr_luma(px[0], px[1], px[2]),
                ChannelLayout::Bgra => match self.alpha {
                    AlphaPolicy::Discard => bgr_luma(px[0], px[1], px[2]),
                    AlphaPolicy::Premultiply => bgr_luma(
                        premultiply(px[0], px[3]),
                        premultiply(px[1], px[3]),
                        premultiply(px[2], px[3]),
                    ),
                },
            };
            Luma([value])
        })
    }
}

/// Weighted luma of a blue-green-red pixel, rounded to nearest.
pub fn bgr_luma(b: u8, g: u8, r: u8) -> u8 {
    let y = (b as u32 * B_WEIGHT + g as u32 * G_WEIGHT + r as u32 * R_WEIGHT + ROUND) >> SHIFT;
    y.min(255) as u8
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((channel as u32 * alpha as u32 + 127) / 255) as u8
}
