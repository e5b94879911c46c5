use crate::{
    algorithms::{AreaFilter, BandThreshold, ChannelCollapse, ImageprocLabeler},
    config::{AlphaPolicy, ExtractionConfig, ThresholdBand},
    pipeline::MaskExtractor,
    traits::ComponentLabeler,
};

/// Builder for creating mask extractors with a fluent API
pub struct MaskExtractorBuilder {
    band: ThresholdBand,
    min_area: u32,
    alpha: AlphaPolicy,
    labeler: Option<Box<dyn ComponentLabeler>>,
}

impl MaskExtractorBuilder {
    /// Create a new builder with the marker band and default minimum area
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            band: config.band,
            min_area: config.min_area,
            alpha: config.alpha,
            labeler: None,
        }
    }

    pub fn band(mut self, band: ThresholdBand) -> Self {
        self.band = band;
        self
    }

    /// Set both bounds; if either is missing the marker band is used
    pub fn thresholds(self, lower: Option<u8>, upper: Option<u8>) -> Self {
        self.band(ThresholdBand::resolve(lower, upper))
    }

    pub fn min_area(mut self, min_area: u32) -> Self {
        self.min_area = min_area;
        self
    }

    pub fn alpha_policy(mut self, alpha: AlphaPolicy) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the component labeler (replaces any existing one)
    pub fn labeler<L>(mut self, labeler: L) -> Self
    where
        L: ComponentLabeler + 'static,
    {
        self.labeler = Some(Box::new(labeler));
        self
    }

    /// Build the extractor, labeling with imageproc if no labeler was set
    pub fn build(self) -> MaskExtractor {
        let labeler = self.labeler
            .unwrap_or_else(|| Box::new(ImageprocLabeler));

        MaskExtractor::new(
            ChannelCollapse::new(self.alpha),
            BandThreshold::new(self.band),
            labeler,
            AreaFilter::new(self.min_area),
        )
    }
}

impl Default for MaskExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let extractor = MaskExtractorBuilder::new().build();
        assert_eq!(extractor.band(), ThresholdBand::new(245, 249));
        assert_eq!(extractor.min_area(), 50);
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            band: ThresholdBand::new(1, 2),
            min_area: 7,
            alpha: AlphaPolicy::Premultiply,
        };
        let extractor = MaskExtractorBuilder::from_config(&config).build();
        assert_eq!(extractor.band(), ThresholdBand::new(1, 2));
        assert_eq!(extractor.min_area(), 7);
        assert!(extractor.info().contains("premultiply"));
    }
}
