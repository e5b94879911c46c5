use image::{Rgb, RgbImage};
use tracing::debug;
use crate::{
    config::{DegeneratePathPolicy, RenderStyle},
    error::{MissionError, Result},
    types::{PixelPath, PixelPoint, RasterImage},
};

/// The two annotated images of a mission
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRoute {
    /// Route drawn over the base (mask-derived) image
    pub route_image: RgbImage,
    /// Route drawn over the satellite image
    pub satellite_image: RgbImage,
}

/// Draws pixel routes as thick polylines on copies of the input images
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteRenderer {
    pub style: RenderStyle,
    pub degenerate: DegeneratePathPolicy,
}

impl RouteRenderer {
    pub fn new(style: RenderStyle, degenerate: DegeneratePathPolicy) -> Self {
        Self { style, degenerate }
    }

    /// Copy `canvas` and draw one segment per consecutive pair of `path`.
    pub fn draw_route(&self, canvas: &RgbImage, path: &[PixelPoint], color: Rgb<u8>) -> RgbImage {
        let mut out = canvas.clone();
        for pair in path.windows(2) {
            draw_thick_segment(&mut out, pair[0], pair[1], color, self.style.thickness);
        }
        out
    }

    /// Render `path` on the base image and on the satellite image. Both are
    /// normalized to three channels first; neither input is modified.
    pub fn render(
        &self,
        path: &[PixelPoint],
        base: &RasterImage,
        satellite: &RasterImage,
    ) -> Result<RenderedRoute> {
        if path.len() < PixelPath::MIN_POINTS && self.degenerate == DegeneratePathPolicy::Reject {
            return Err(MissionError::InvalidPath {
                points: path.len(),
                required: PixelPath::MIN_POINTS,
            });
        }

        let route_image = self.draw_route(&base.to_rgb_image(), path, Rgb(self.style.route_color));
        let satellite_image = self.draw_route(
            &satellite.strip_alpha().to_rgb_image(),
            path,
            Rgb(self.style.satellite_route_color),
        );

        debug!(
            segments = path.len().saturating_sub(1),
            thickness = self.style.thickness,
            "rendered route"
        );

        Ok(RenderedRoute {
            route_image,
            satellite_image,
        })
    }
}

/// Render with the default style. Paths shorter than two points draw nothing.
pub fn render_path(
    path_pixels: &[PixelPoint],
    base_image: &RasterImage,
    satellite_image: &RasterImage,
) -> Result<(RgbImage, RgbImage)> {
    let rendered = RouteRenderer::default().render(path_pixels, base_image, satellite_image)?;
    Ok((rendered.route_image, rendered.satellite_image))
}

/// Draw `from -> to` with a square brush of side `thickness`.
///
/// Only the steps whose brush can touch the canvas are walked, so far
/// off-canvas endpoints cost no more than a segment inside the image.
fn draw_thick_segment(
    canvas: &mut RgbImage,
    from: PixelPoint,
    to: PixelPoint,
    color: Rgb<u8>,
    thickness: u32,
) {
    let thickness = i64::from(thickness.max(1));
    let offset = (thickness - 1) / 2;
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    if width == 0 || height == 0 {
        return;
    }

    // brush centers whose footprint overlaps the canvas
    let x_window = (offset - (thickness - 1), width - 1 + offset);
    let y_window = (offset - (thickness - 1), height - 1 + offset);

    let (x0, y0) = (i64::from(from.x), i64::from(from.y));
    let (dx, dy) = (i64::from(to.x) - x0, i64::from(to.y) - y0);
    let steps = dx.abs().max(dy.abs());

    let (start, major_delta, (lo, hi)) = if dx.abs() >= dy.abs() {
        (x0, dx, x_window)
    } else {
        (y0, dy, y_window)
    };
    let (first, last) = if major_delta >= 0 {
        (lo - start, hi - start)
    } else {
        (start - hi, start - lo)
    };
    let (first, last) = (first.max(0), last.min(steps));

    for step in first..=last {
        let x = x0 + step_offset(step, dx, steps);
        let y = y0 + step_offset(step, dy, steps);
        if (y_window.0..=y_window.1).contains(&y) {
            stamp(canvas, x - offset, y - offset, thickness, color);
        }
    }
}

/// `round(step * delta / steps)` without overflow, ties rounding up.
fn step_offset(step: i64, delta: i64, steps: i64) -> i64 {
    if steps == 0 {
        return 0;
    }
    let (n, d) = (i128::from(step) * i128::from(delta), i128::from(steps));
    // |result| <= |delta|, which fits in i64
    ((2 * n + d).div_euclid(2 * d)) as i64
}

fn stamp(canvas: &mut RgbImage, left: i64, top: i64, side: i64, color: Rgb<u8>) {
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    for y in top.max(0)..(top + side).min(height) {
        for x in left.max(0)..(left + side).min(width) {
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    fn points(coords: &[(i32, i32)]) -> Vec<PixelPoint> {
        coords.iter().copied().map(PixelPoint::from).collect()
    }

    fn satellite(width: u32, height: u32) -> RasterImage {
        let samples = (0..width * height).flat_map(|i| [40, 80, (i % 200) as u8, 255]).collect();
        RasterImage::from_raw(width, height, 4, samples).unwrap()
    }

    #[test]
    fn test_direct_route() {
        let base = RasterImage::from_gray(GrayImage::new(10, 10));
        let (route, sat) = render_path(&points(&[(0, 0), (9, 9)]), &base, &satellite(10, 10)).unwrap();

        assert_eq!(route.dimensions(), (10, 10));
        assert_eq!(sat.dimensions(), (10, 10));
        for i in 0..10 {
            assert_eq!(route.get_pixel(i, i), &GREEN);
            assert_eq!(sat.get_pixel(i, i), &BLUE);
        }
        assert_eq!(route.get_pixel(9, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_two_pixel_stroke() {
        let base = RasterImage::from_gray(GrayImage::new(8, 8));
        let (route, _) = render_path(&points(&[(1, 3), (6, 3)]), &base, &base).unwrap();

        assert_eq!(route.get_pixel(3, 3), &GREEN);
        assert_eq!(route.get_pixel(3, 4), &GREEN);
        assert_eq!(route.get_pixel(3, 2), &Rgb([0, 0, 0]));
        assert_eq!(route.get_pixel(3, 5), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_multi_segment_path() {
        let base = RasterImage::from_gray(GrayImage::new(12, 12));
        let path = points(&[(0, 0), (5, 0), (5, 5), (10, 5)]);
        let (route, _) = render_path(&path, &base, &base).unwrap();

        assert_eq!(route.get_pixel(3, 0), &GREEN);
        assert_eq!(route.get_pixel(5, 3), &GREEN);
        assert_eq!(route.get_pixel(8, 5), &GREEN);
        assert_eq!(route.get_pixel(2, 3), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let base = RasterImage::from_gray(GrayImage::from_pixel(6, 6, image::Luma([90])));
        let sat = satellite(6, 6);
        let (base_before, sat_before) = (base.clone(), sat.clone());

        render_path(&points(&[(0, 5), (5, 0)]), &base, &sat).unwrap();
        assert_eq!(base, base_before);
        assert_eq!(sat, sat_before);
    }

    #[test]
    fn test_short_path_passthrough() {
        let base = RasterImage::from_gray(GrayImage::from_pixel(4, 4, image::Luma([17])));
        let sat = satellite(4, 4);

        for path in [vec![], points(&[(2, 2)])] {
            let (route, sat_out) = render_path(&path, &base, &sat).unwrap();
            assert_eq!(route, base.to_rgb_image());
            assert_eq!(sat_out, sat.to_rgb_image());
        }
    }

    #[test]
    fn test_short_path_rejected() {
        let base = RasterImage::from_gray(GrayImage::new(4, 4));
        let renderer = RouteRenderer::new(RenderStyle::default(), DegeneratePathPolicy::Reject);

        let err = renderer.render(&points(&[(1, 1)]), &base, &base).unwrap_err();
        assert!(matches!(err, MissionError::InvalidPath { points: 1, required: 2 }));
        assert!(renderer.render(&points(&[(1, 1), (2, 2)]), &base, &base).is_ok());
    }

    #[test]
    fn test_segments_outside_canvas_are_clipped() {
        let base = RasterImage::from_gray(GrayImage::new(5, 5));
        let (route, _) = render_path(&points(&[(-3, 2), (8, 2)]), &base, &base).unwrap();

        assert_eq!(route.get_pixel(0, 2), &GREEN);
        assert_eq!(route.get_pixel(4, 2), &GREEN);
    }

    #[test]
    fn test_custom_style() {
        let style = RenderStyle {
            route_color: [255, 0, 0],
            satellite_route_color: [1, 2, 3],
            thickness: 1,
        };
        let base = RasterImage::from_gray(GrayImage::new(5, 5));
        let rendered = RouteRenderer::new(style, DegeneratePathPolicy::Passthrough)
            .render(&points(&[(0, 1), (4, 1)]), &base, &base)
            .unwrap();

        assert_eq!(rendered.route_image.get_pixel(2, 1), &Rgb([255, 0, 0]));
        assert_eq!(rendered.route_image.get_pixel(2, 2), &Rgb([0, 0, 0]));
        assert_eq!(rendered.satellite_image.get_pixel(2, 1), &Rgb([1, 2, 3]));
    }

    #[test]
    fn test_endpoint_at_coordinate_limit() {
        let base = RasterImage::from_gray(GrayImage::new(10, 10));
        let path = points(&[(i32::MAX - 200, 5), (i32::MAX, 5)]);
        let (route, sat) = render_path(&path, &base, &base).unwrap();

        assert_eq!(route, base.to_rgb_image());
        assert_eq!(sat, base.to_rgb_image());

        let path = points(&[(i32::MIN, i32::MIN), (i32::MAX, i32::MAX)]);
        let (route, _) = render_path(&path, &base, &base).unwrap();
        assert_eq!(route.get_pixel(0, 0), &GREEN);
        assert_eq!(route.get_pixel(9, 9), &GREEN);
    }

    #[test]
    fn test_very_long_segment_only_walks_visible_part() {
        let base = RasterImage::from_gray(GrayImage::new(10, 10));
        let started = std::time::Instant::now();
        let (route, _) = render_path(&points(&[(0, 0), (100_000_000, 0)]), &base, &base).unwrap();

        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        for x in 0..10 {
            assert_eq!(route.get_pixel(x, 0), &GREEN);
            assert_eq!(route.get_pixel(x, 1), &GREEN);
            assert_eq!(route.get_pixel(x, 2), &Rgb([0, 0, 0]));
        }
    }

    #[test]
    fn test_steep_segment_crossing_canvas() {
        let base = RasterImage::from_gray(GrayImage::new(10, 10));
        let path = points(&[(-1_000_000, -1_000_000), (1_000_000, 1_000_000)]);
        let (route, _) = render_path(&path, &base, &base).unwrap();

        for i in 0..10 {
            assert_eq!(route.get_pixel(i, i), &GREEN);
        }
        assert_eq!(route.get_pixel(9, 0), &Rgb([0, 0, 0]));

        let (column, _) = render_path(&points(&[(4, -900_000_000), (4, 900_000_000)]), &base, &base).unwrap();
        for y in 0..10 {
            assert_eq!(column.get_pixel(4, y), &GREEN);
            assert_eq!(column.get_pixel(3, y), &Rgb([0, 0, 0]));
        }
    }
}
