use image::RgbImage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::{
    config::{DegeneratePathPolicy, ExtractionConfig, RenderStyle},
    error::Result,
    pipeline::{builder::MaskExtractorBuilder, MaskExtractor},
    projection::project_path,
    render::RouteRenderer,
    traits::ArtifactSink,
    types::{BinaryMask, GeoBoundingBox, GeoPath, PixelPath, PixelPoint, RasterImage},
};

/// Everything a mission run hands to the output boundary
#[derive(Debug, Clone, PartialEq)]
pub struct MissionArtifacts {
    pub geo_path: GeoPath,
    pub route_image: RgbImage,
    pub satellite_image: RgbImage,
}

impl MissionArtifacts {
    pub fn write_to<S: ArtifactSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.emit(self)
    }
}

/// Takeoff and landing pixels plus the site's geographic extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MissionRequest {
    pub takeoff: PixelPoint,
    pub landing: PixelPoint,
    pub bbox: GeoBoundingBox,
}

/// Runs mask extraction, projection and rendering for one site
pub struct MissionPlanner {
    extractor: MaskExtractor,
    renderer: RouteRenderer,
}

impl MissionPlanner {
    pub fn new(extractor: MaskExtractor, renderer: RouteRenderer) -> Self {
        Self { extractor, renderer }
    }

    pub fn from_config(extraction: &ExtractionConfig, style: RenderStyle) -> Self {
        Self::new(
            MaskExtractorBuilder::from_config(extraction).build(),
            RouteRenderer::new(style, DegeneratePathPolicy::Passthrough),
        )
    }

    pub fn extractor(&self) -> &MaskExtractor {
        &self.extractor
    }

    pub fn renderer(&self) -> &RouteRenderer {
        &self.renderer
    }

    /// Project `path` using the base image's size and draw it on both images.
    pub fn generate(
        &self,
        path: &PixelPath,
        base: &RasterImage,
        satellite: &RasterImage,
        bbox: &GeoBoundingBox,
    ) -> Result<MissionArtifacts> {
        let geo_path = project_path(path.points(), base.height(), base.width(), bbox)?;
        let rendered = self.renderer.render(path.points(), base, satellite)?;

        Ok(MissionArtifacts {
            geo_path,
            route_image: rendered.route_image,
            satellite_image: rendered.satellite_image,
        })
    }

    /// Straight takeoff to landing route drawn over the mask.
    pub fn direct_route(
        &self,
        mask: &BinaryMask,
        satellite: &RasterImage,
        request: &MissionRequest,
    ) -> Result<MissionArtifacts> {
        let base = mask.to_raster();
        let path = PixelPath::direct(request.takeoff, request.landing);
        self.generate(&path, &base, satellite, &request.bbox)
    }

    /// Extract the site mask from `buildings`, then build the direct route.
    pub fn plan(
        &self,
        buildings: &RasterImage,
        satellite: &RasterImage,
        request: &MissionRequest,
    ) -> Result<MissionArtifacts> {
        let extraction = self.extractor.extract(buildings)?;
        info!(
            regions = extraction.kept.len(),
            filtered = extraction.dropped.len(),
            "site mask ready"
        );

        let artifacts = self.direct_route(&extraction.mask, satellite, request)?;
        info!(
            takeoff = ?request.takeoff,
            landing = ?request.landing,
            length = artifacts.geo_path.length(),
            "mission route generated"
        );
        Ok(artifacts)
    }
}

impl Default for MissionPlanner {
    fn default() -> Self {
        Self::new(MaskExtractor::default(), RouteRenderer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{io::MemorySink, pipeline::extract_mask, types::GeoPoint};
    use image::{GrayImage, Luma, Rgb};

    fn scenario_image() -> RasterImage {
        let mut img = GrayImage::new(10, 10);
        for y in 3..6 {
            for x in 4..7 {
                img.put_pixel(x, y, Luma([247u8]));
            }
        }
        RasterImage::from_gray(img)
    }

    fn request() -> MissionRequest {
        MissionRequest {
            takeoff: PixelPoint::new(0, 0),
            landing: PixelPoint::new(9, 9),
            bbox: GeoBoundingBox::new(0.0, 0.0, 10.0, 10.0),
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let image = scenario_image();
        let (_, mask) = extract_mask(&image, None, None, 5).unwrap();

        assert_eq!(mask.foreground_count(), 9);
        for y in 0..10 {
            for x in 0..10 {
                let inside = (4..7).contains(&x) && (3..6).contains(&y);
                assert_eq!(mask.is_foreground(x, y), inside, "pixel ({x}, {y})");
            }
        }

        let satellite = RasterImage::from_raw(10, 10, 3, vec![128; 300]).unwrap();
        let artifacts = MissionPlanner::default()
            .direct_route(&mask, &satellite, &request())
            .unwrap();

        assert_eq!(
            artifacts.geo_path.points(),
            &[GeoPoint::new(0.0, 0.0), GeoPoint::new(9.0, 9.0)]
        );
        assert_eq!(artifacts.route_image.get_pixel(0, 0), &Rgb([0, 255, 0]));
        assert_eq!(artifacts.route_image.get_pixel(5, 0), &Rgb([0, 0, 0]));
        assert_eq!(artifacts.route_image.get_pixel(6, 3), &Rgb([255, 255, 255]));
        assert_eq!(artifacts.satellite_image.get_pixel(9, 9), &Rgb([0, 0, 255]));
        assert_eq!(artifacts.satellite_image.get_pixel(0, 9), &Rgb([128, 128, 128]));
    }

    #[test]
    fn test_plan_uses_configured_extraction() {
        let config = ExtractionConfig {
            min_area: 10,
            ..ExtractionConfig::default()
        };
        let planner = MissionPlanner::from_config(&config, RenderStyle::default());
        let satellite = RasterImage::from_gray(GrayImage::new(10, 10));

        let artifacts = planner.plan(&scenario_image(), &satellite, &request()).unwrap();
        // the 9-pixel block is below min_area, so only the route is drawn
        assert_eq!(artifacts.route_image.get_pixel(6, 3), &Rgb([0, 0, 0]));
        assert_eq!(artifacts.geo_path.len(), 2);
    }

    #[test]
    fn test_projection_uses_base_size() {
        let base = RasterImage::from_gray(GrayImage::new(20, 5));
        let satellite = RasterImage::from_gray(GrayImage::new(40, 40));
        let path = PixelPath::new(vec![PixelPoint::new(10, 5), PixelPoint::new(20, 0)]).unwrap();

        let artifacts = MissionPlanner::default()
            .generate(&path, &base, &satellite, &GeoBoundingBox::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        assert_eq!(
            artifacts.geo_path.points(),
            &[GeoPoint::new(50.0, 100.0), GeoPoint::new(100.0, 0.0)]
        );
        assert_eq!(artifacts.satellite_image.dimensions(), (40, 40));
    }

    #[test]
    fn test_artifacts_to_sink() {
        let (_, mask) = extract_mask(&scenario_image(), None, None, 5).unwrap();
        let satellite = RasterImage::from_gray(GrayImage::new(10, 10));
        let artifacts = MissionPlanner::default()
            .direct_route(&mask, &satellite, &request())
            .unwrap();

        let mut sink = MemorySink::new();
        artifacts.write_to(&mut sink).unwrap();
        let stored: GeoPath = serde_json::from_str(sink.coordinates_json.as_deref().unwrap()).unwrap();
        assert_eq!(stored, artifacts.geo_path);
    }
}
