//! Pixel to geographic projection.
//!
//! Each axis is scaled independently from the image extent onto the bounding
//! box: `real = corner + pixel * (span / extent)`. No rotation or shear.

use tracing::debug;
use crate::{
    error::{MissionError, Result},
    types::{GeoBoundingBox, GeoPath, GeoPoint, PixelPoint},
};

/// Affine mapping between an image's pixel rectangle and a bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjector {
    bbox: GeoBoundingBox,
    width: u32,
    height: u32,
    scale_x: f64,
    scale_y: f64,
}

impl GeoProjector {
    /// Fails with `DegenerateGeometry` if either extent is zero.
    pub fn new(bbox: GeoBoundingBox, image_height: u32, image_width: u32) -> Result<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(MissionError::DegenerateGeometry {
                width: image_width,
                height: image_height,
            });
        }

        let scale_x = (bbox.bottom_right.x - bbox.top_left.x) / image_width as f64;
        let scale_y = (bbox.bottom_right.y - bbox.top_left.y) / image_height as f64;

        Ok(Self {
            bbox,
            width: image_width,
            height: image_height,
            scale_x,
            scale_y,
        })
    }

    pub fn bbox(&self) -> &GeoBoundingBox {
        &self.bbox
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_to_geo(&self, point: PixelPoint) -> GeoPoint {
        GeoPoint {
            x: self.bbox.top_left.x + point.x as f64 * self.scale_x,
            y: self.bbox.top_left.y + point.y as f64 * self.scale_y,
        }
    }

    /// Inverse mapping in fractional pixels. A flat bounding-box axis
    /// (zero span) has no inverse and yields `DegenerateGeometry`.
    pub fn geo_to_pixel(&self, point: GeoPoint) -> Result<(f64, f64)> {
        if self.scale_x == 0.0 || self.scale_y == 0.0 {
            return Err(MissionError::DegenerateGeometry {
                width: self.width,
                height: self.height,
            });
        }

        Ok((
            (point.x - self.bbox.top_left.x) / self.scale_x,
            (point.y - self.bbox.top_left.y) / self.scale_y,
        ))
    }

    pub fn project(&self, pixel_path: &[PixelPoint]) -> GeoPath {
        GeoPath::new(pixel_path.iter().map(|&p| self.pixel_to_geo(p)).collect())
    }
}

/// Map every pixel of `pixel_path` onto `bbox`, preserving order.
pub fn project_path(
    pixel_path: &[PixelPoint],
    image_height: u32,
    image_width: u32,
    bbox: &GeoBoundingBox,
) -> Result<GeoPath> {
    let projector = GeoProjector::new(*bbox, image_height, image_width)?;
    let geo_path = projector.project(pixel_path);

    debug!(points = geo_path.len(), image_width, image_height, "projected pixel path");
    Ok(geo_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[(i32, i32)]) -> Vec<PixelPoint> {
        coords.iter().copied().map(PixelPoint::from).collect()
    }

    #[test]
    fn test_linear_scaling() {
        let bbox = GeoBoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let path = project_path(&points(&[(0, 0), (50, 50), (100, 100)]), 100, 100, &bbox).unwrap();

        assert_eq!(
            path.points(),
            &[GeoPoint::new(0.0, 0.0), GeoPoint::new(50.0, 50.0), GeoPoint::new(100.0, 100.0)]
        );
    }

    #[test]
    fn test_axes_scale_independently() {
        // y grows downward in pixels but the box's y decreases.
        let bbox = GeoBoundingBox::new(1000.0, 500.0, 1200.0, 400.0);
        let path = project_path(&points(&[(100, 25)]), 50, 400, &bbox).unwrap();

        assert_eq!(path.points(), &[GeoPoint::new(1050.0, 450.0)]);
    }

    #[test]
    fn test_matches_reference_evaluation_order() {
        let bbox = GeoBoundingBox::new(178_123.45, 665_987.65, 178_456.78, 665_654.32);
        let (w, h) = (977u32, 641u32);
        let p = PixelPoint::new(313, 517);

        let geo = project_path(&[p], h, w, &bbox).unwrap().path[0];
        let x: f64 = 178_123.45 + 313.0 * ((178_456.78 - 178_123.45) / 977.0);
        let y: f64 = 665_987.65 + 517.0 * ((665_654.32 - 665_987.65) / 641.0);
        assert_eq!(geo.x.to_bits(), x.to_bits());
        assert_eq!(geo.y.to_bits(), y.to_bits());
    }

    #[test]
    fn test_order_preserved() {
        let bbox = GeoBoundingBox::new(0.0, 0.0, 20.0, 40.0);
        for coords in [&[(3, 1), (0, 0)][..], &[(5, 5), (1, 2), (1, 2), (9, 0), (0, 9)][..]] {
            let pixel_path = points(coords);
            let geo = project_path(&pixel_path, 10, 10, &bbox).unwrap();

            assert_eq!(geo.len(), pixel_path.len());
            for (p, g) in pixel_path.iter().zip(geo.points()) {
                assert_eq!(g.x, p.x as f64 * 2.0);
                assert_eq!(g.y, p.y as f64 * 4.0);
            }
        }
    }

    #[test]
    fn test_zero_extent_is_degenerate() {
        let bbox = GeoBoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let path = points(&[(0, 0), (1, 1)]);

        assert!(matches!(
            project_path(&path, 10, 0, &bbox),
            Err(MissionError::DegenerateGeometry { width: 0, height: 10 })
        ));
        assert!(matches!(
            project_path(&path, 0, 10, &bbox),
            Err(MissionError::DegenerateGeometry { width: 10, height: 0 })
        ));
    }

    #[test]
    fn test_geo_to_pixel_inverts() {
        let projector = GeoProjector::new(GeoBoundingBox::new(10.0, 90.0, 30.0, 50.0), 40, 20).unwrap();
        let geo = projector.pixel_to_geo(PixelPoint::new(5, 8));

        assert_eq!(projector.geo_to_pixel(geo).unwrap(), (5.0, 8.0));
    }

    #[test]
    fn test_geo_to_pixel_flat_box() {
        let projector = GeoProjector::new(GeoBoundingBox::new(0.0, 0.0, 0.0, 10.0), 10, 10).unwrap();
        assert!(projector.geo_to_pixel(GeoPoint::new(0.0, 1.0)).is_err());
    }
}
