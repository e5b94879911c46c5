use std::path::Path;

use image::{GrayImage, RgbImage};
use crate::{algorithms::LabelMap, error::Result, mission::MissionArtifacts, types::RasterImage};

/// Trait for decoding source rasters and encoding rendered output
pub trait ImageCodec: Send + Sync {
    /// Load a raster from a file
    fn load(&self, path: &Path) -> Result<RasterImage>;

    /// Decode a raster from an in-memory buffer
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage>;

    /// Encode a three-channel image as PNG
    fn encode_png(&self, image: &RgbImage) -> Result<Vec<u8>>;
}

/// Trait for connected-component labeling of a binary plane
pub trait ComponentLabeler: Send + Sync {
    /// Label the non-zero pixels of `binary` into components and measure them
    fn label(&self, binary: &GrayImage) -> Result<LabelMap>;
}

/// Trait for the boundary that persists or transports mission output
pub trait ArtifactSink {
    /// Receive the two annotated images and the geo path of one mission
    fn emit(&mut self, artifacts: &MissionArtifacts) -> Result<()>;
}
