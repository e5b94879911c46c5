use std::str::FromStr;

use geo_types::{Coord, LineString, Rect};
use image::{DynamicImage, GenericImageView, GrayImage, Luma, Rgb, RgbImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use ts_rs::TS;

use crate::error::{MissionError, Result};

/// Channel layout of a [`RasterImage`]. Color layouts store blue first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChannelLayout {
    Gray,
    Bgr,
    Bgra,
}

impl ChannelLayout {
    pub fn from_channels(channels: usize) -> Result<Self> {
        match channels {
            1 => Ok(Self::Gray),
            3 => Ok(Self::Bgr),
            4 => Ok(Self::Bgra),
            other => Err(MissionError::UnsupportedChannelDepth { channels: other }),
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Bgr => 3,
            Self::Bgra => 4,
        }
    }
}

/// An 8-bit raster with 1, 3 or 4 interleaved channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    samples: Vec<u8>,
}

impl RasterImage {
    /// Wrap interleaved samples. `channels` must be 1, 3 or 4 and the buffer
    /// must hold exactly `width * height * channels` samples.
    pub fn from_raw(width: u32, height: u32, channels: usize, samples: Vec<u8>) -> Result<Self> {
        let layout = ChannelLayout::from_channels(channels)?;
        let expected = width as usize * height as usize * channels;
        if samples.len() != expected {
            return Err(MissionError::ImageProcessing(format!(
                "sample buffer holds {} values, expected {} for {}x{}x{}",
                samples.len(),
                expected,
                width,
                height,
                channels
            )));
        }

        Ok(Self { width, height, layout, samples })
    }

    pub fn from_gray(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            layout: ChannelLayout::Gray,
            samples: image.into_raw(),
        }
    }

    /// Convert a decoded image. Decoders hand out red-first samples, so color
    /// pixels are reordered to blue-first. Gray+alpha widens to BGRA and
    /// deeper sample types are narrowed to 8 bits.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        let color = image.color();

        if let DynamicImage::ImageLuma8(gray) = image {
            return Self::from_gray(gray.clone());
        }

        if color.has_alpha() {
            let mut samples = image.to_rgba8().into_raw();
            samples.chunks_exact_mut(4).for_each(|px| px.swap(0, 2));
            Self { width, height, layout: ChannelLayout::Bgra, samples }
        } else if color.has_color() {
            let mut samples = image.to_rgb8().into_raw();
            samples.chunks_exact_mut(3).for_each(|px| px.swap(0, 2));
            Self { width, height, layout: ChannelLayout::Bgr, samples }
        } else {
            Self::from_gray(image.to_luma8())
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Samples of the pixel at (x, y), `channels()` values long.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let channels = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * channels;
        &self.samples[start..start + channels]
    }

    /// Drop the alpha channel of a BGRA image. Other layouts are cloned.
    pub fn strip_alpha(&self) -> RasterImage {
        match self.layout {
            ChannelLayout::Bgra => Self {
                width: self.width,
                height: self.height,
                layout: ChannelLayout::Bgr,
                samples: self
                    .samples
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect(),
            },
            _ => self.clone(),
        }
    }

    /// Three-channel copy for drawing and encoding. Gray is replicated,
    /// alpha is dropped.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let px = self.pixel(x, y);
            match self.layout {
                ChannelLayout::Gray => Rgb([px[0], px[0], px[0]]),
                ChannelLayout::Bgr | ChannelLayout::Bgra => Rgb([px[2], px[1], px[0]]),
            }
        })
    }
}

/// A single-plane mask holding 0 (background) and 1 (foreground).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    inner: GrayImage,
}

impl BinaryMask {
    /// Wrap a 0/1 plane. Any non-zero value counts as foreground.
    pub fn from_binary(plane: GrayImage) -> Self {
        let (width, height) = plane.dimensions();
        let inner = GrayImage::from_fn(width, height, |x, y| {
            Luma([u8::from(plane.get_pixel(x, y)[0] != 0)])
        });
        Self { inner }
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.inner.get_pixel(x, y)[0] == 1
    }

    pub fn foreground_count(&self) -> usize {
        self.inner.as_raw().iter().filter(|&&v| v == 1).count()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.inner
    }

    /// Foreground as 255, background as 0.
    pub fn to_display_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            Luma([self.inner.get_pixel(x, y)[0].saturating_mul(255)])
        })
    }

    pub fn to_raster(&self) -> RasterImage {
        RasterImage::from_gray(self.to_display_image())
    }
}

/// A labeled 8-connected component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub label: u32,
    pub area: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for PixelPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Parses `"x,y"` or `"(x, y)"`.
impl FromStr for PixelPoint {
    type Err = MissionError;

    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = split_pair(s)?;
        let parse = |v: &str| {
            v.parse::<i32>()
                .map_err(|_| MissionError::InvalidCoordinate(s.to_string()))
        };
        Ok(Self { x: parse(x)?, y: parse(y)? })
    }
}

/// An ordered polyline in pixel space with at least two points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PixelPoint>")]
pub struct PixelPath(Vec<PixelPoint>);

impl PixelPath {
    pub const MIN_POINTS: usize = 2;

    pub fn new(points: Vec<PixelPoint>) -> Result<Self> {
        if points.len() < Self::MIN_POINTS {
            return Err(MissionError::InvalidPath {
                points: points.len(),
                required: Self::MIN_POINTS,
            });
        }
        Ok(Self(points))
    }

    /// Straight takeoff to landing route.
    pub fn direct(takeoff: PixelPoint, landing: PixelPoint) -> Self {
        Self(vec![takeoff, landing])
    }

    pub fn points(&self) -> &[PixelPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<PixelPoint>> for PixelPath {
    type Error = MissionError;

    fn try_from(points: Vec<PixelPoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl AsRef<[PixelPoint]> for PixelPath {
    fn as_ref(&self) -> &[PixelPoint] {
        &self.0
    }
}

/// A real-world coordinate. Serializes as `{"x": .., "y": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
}

impl GeoPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        Coord { x: point.x, y: point.y }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(coord: Coord<f64>) -> Self {
        Self { x: coord.x, y: coord.y }
    }
}

/// Parses `"(x, y)"`, the corner format submitted with mission requests.
/// The parentheses are optional.
impl FromStr for GeoPoint {
    type Err = MissionError;

    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = split_pair(s)?;
        let parse = |v: &str| {
            v.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| MissionError::InvalidCoordinate(s.to_string()))
        };
        Ok(Self { x: parse(x)?, y: parse(y)? })
    }
}

fn split_pair(s: &str) -> Result<(&str, &str)> {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed);

    match inner.split(',').map(str::trim).collect::<Vec<_>>().as_slice() {
        &[x, y] => Ok((x, y)),
        _ => Err(MissionError::InvalidCoordinate(s.to_string())),
    }
}

/// Geographic extent the image rectangle maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoBoundingBox {
    pub top_left: GeoPoint,
    pub bottom_right: GeoPoint,
}

impl GeoBoundingBox {
    pub fn new(x_top_left: f64, y_top_left: f64, x_bottom_right: f64, y_bottom_right: f64) -> Self {
        Self {
            top_left: GeoPoint::new(x_top_left, y_top_left),
            bottom_right: GeoPoint::new(x_bottom_right, y_bottom_right),
        }
    }

    pub fn from_corners(top_left: GeoPoint, bottom_right: GeoPoint) -> Self {
        Self { top_left, bottom_right }
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(Coord::from(self.top_left), Coord::from(self.bottom_right))
    }
}

/// The serialized route record: `{"path": [{"x": .., "y": ..}, ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeoPath {
    pub path: Vec<GeoPoint>,
}

impl GeoPath {
    pub fn new(path: Vec<GeoPoint>) -> Self {
        Self { path }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(self.path.iter().copied().map(Coord::from).collect())
    }

    /// Route length in bounding-box units.
    pub fn length(&self) -> f64 {
        use geo::EuclideanLength;
        self.to_line_string().euclidean_length()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
