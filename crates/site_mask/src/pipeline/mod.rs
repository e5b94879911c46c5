pub mod builder;

use tracing::debug;
use crate::{
    algorithms::{AreaFilter, BandThreshold, ChannelCollapse},
    config::ThresholdBand,
    error::{MissionError, Result},
    traits::ComponentLabeler,
    types::{BinaryMask, RasterImage, Region},
};

/// Result of one extraction call
#[derive(Debug, Clone)]
pub struct Extraction<'a> {
    /// The untouched source image, kept for rendering
    pub original: &'a RasterImage,
    pub mask: BinaryMask,
    /// Components that met the minimum area
    pub kept: Vec<Region>,
    /// Components removed by the area filter
    pub dropped: Vec<Region>,
}

/// Image to mask extraction: channel collapse, band threshold,
/// 8-connected labeling and area filtering
pub struct MaskExtractor {
    collapse: ChannelCollapse,
    threshold: BandThreshold,
    labeler: Box<dyn ComponentLabeler>,
    filter: AreaFilter,
}

impl MaskExtractor {
    /// Create a new extractor builder
    pub fn builder() -> builder::MaskExtractorBuilder {
        builder::MaskExtractorBuilder::new()
    }

    pub fn new(
        collapse: ChannelCollapse,
        threshold: BandThreshold,
        labeler: Box<dyn ComponentLabeler>,
        filter: AreaFilter,
    ) -> Self {
        Self {
            collapse,
            threshold,
            labeler,
            filter,
        }
    }

    pub fn band(&self) -> ThresholdBand {
        self.threshold.band
    }

    pub fn min_area(&self) -> u32 {
        self.filter.min_area
    }

    /// Run the extraction. Pure: the same image always gives the same mask.
    pub fn extract<'a>(&self, image: &'a RasterImage) -> Result<Extraction<'a>> {
        let intensity = self.collapse.to_intensity(image);
        let binary = self.threshold.binarize(&intensity);

        let map = self.labeler.label(&binary)?;
        if map.labels().dimensions() != binary.dimensions() {
            return Err(MissionError::ImageProcessing(format!(
                "labeler returned {:?} labels for a {:?} plane",
                map.labels().dimensions(),
                binary.dimensions()
            )));
        }

        let (kept, dropped): (Vec<Region>, Vec<Region>) = map
            .regions()
            .into_iter()
            .partition(|region| self.filter.retains(region.area));
        let mask = self.filter.apply(&map);

        debug!(
            width = image.width(),
            height = image.height(),
            layout = %image.layout(),
            lower = self.threshold.band.lower,
            upper = self.threshold.band.upper,
            kept = kept.len(),
            dropped = dropped.len(),
            foreground = mask.foreground_count(),
            "extracted mask"
        );

        Ok(Extraction {
            original: image,
            mask,
            kept,
            dropped,
        })
    }

    /// Get information about the extractor configuration
    pub fn info(&self) -> String {
        format!(
            "MaskExtractor: band [{}, {}], min area {}, alpha {}",
            self.threshold.band.lower,
            self.threshold.band.upper,
            self.filter.min_area,
            self.collapse.alpha
        )
    }
}

impl Default for MaskExtractor {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Extract the filtered mask of `image`.
///
/// Unless both `lower` and `upper` are given the near-white band [245, 249]
/// is used. Returns the original image alongside the mask.
pub fn extract_mask(
    image: &RasterImage,
    lower: Option<u8>,
    upper: Option<u8>,
    min_area: u32,
) -> Result<(&RasterImage, BinaryMask)> {
    let extraction = MaskExtractor::builder()
        .thresholds(lower, upper)
        .min_area(min_area)
        .build()
        .extract(image)?;

    Ok((extraction.original, extraction.mask))
}
