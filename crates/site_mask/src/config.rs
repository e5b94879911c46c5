use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

/// Inclusive intensity band selecting foreground pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ThresholdBand {
    pub lower: u8,
    pub upper: u8,
}

impl ThresholdBand {
    /// Near-white band matching the marker/rooftop signature.
    pub const MARKER: Self = Self { lower: 245, upper: 249 };

    pub fn new(lower: u8, upper: u8) -> Self {
        Self { lower, upper }
    }

    /// Both bounds are needed; if either is missing the marker band is used.
    pub fn resolve(lower: Option<u8>, upper: Option<u8>) -> Self {
        match (lower, upper) {
            (Some(lower), Some(upper)) => Self { lower, upper },
            _ => Self::MARKER,
        }
    }

    pub fn contains(&self, intensity: u8) -> bool {
        self.lower <= intensity && intensity <= self.upper
    }
}

impl Default for ThresholdBand {
    fn default() -> Self {
        Self::MARKER
    }
}

/// How a 4-channel image's alpha takes part in the intensity conversion.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlphaPolicy {
    /// Ignore alpha and convert the color channels only
    #[default]
    Discard,
    /// Scale color channels by alpha (composite over black) before converting
    Premultiply,
}

/// What the renderer does with a path too short to draw a segment.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DegeneratePathPolicy {
    /// Return unmodified copies of the inputs
    #[default]
    Passthrough,
    /// Fail with `InvalidPath`
    Reject,
}

/// Parameters of the mask extraction stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ExtractionConfig {
    pub band: ThresholdBand,
    /// Components smaller than this many pixels are dropped
    pub min_area: u32,
    pub alpha: AlphaPolicy,
}

impl ExtractionConfig {
    pub const DEFAULT_MIN_AREA: u32 = 50;
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            band: ThresholdBand::default(),
            min_area: Self::DEFAULT_MIN_AREA,
            alpha: AlphaPolicy::default(),
        }
    }
}

/// Route colors (red, green, blue) and stroke width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RenderStyle {
    pub route_color: [u8; 3],
    pub satellite_route_color: [u8; 3],
    pub thickness: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            route_color: [0, 255, 0],
            satellite_route_color: [0, 0, 255],
            thickness: 2,
        }
    }
}
