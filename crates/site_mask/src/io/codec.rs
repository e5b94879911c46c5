use std::{io::Cursor, path::Path};

use image::{ImageFormat, RgbImage};
use tracing::debug;
use crate::{
    error::{MissionError, Result},
    traits::ImageCodec,
    types::RasterImage,
};

/// Codec backed by the `image` crate
#[derive(Debug, Clone, Default)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn load(&self, path: &Path) -> Result<RasterImage> {
        let decoded = image::open(path)?;
        let raster = RasterImage::from_dynamic(&decoded);
        debug!(
            path = %path.display(),
            width = raster.width(),
            height = raster.height(),
            layout = %raster.layout(),
            "loaded raster"
        );
        Ok(raster)
    }

    fn decode(&self, bytes: &[u8]) -> Result<RasterImage> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(RasterImage::from_dynamic(&decoded))
    }

    fn encode_png(&self, image: &RgbImage) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(MissionError::ImageEncode)?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbaImage, Rgba};
    use crate::types::ChannelLayout;

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_roundtrip_keeps_colors() {
        let codec = ImageCrateCodec;
        let rgb = RgbImage::from_pixel(3, 2, Rgb([200, 100, 50]));

        let raster = codec.decode(&codec.encode_png(&rgb).unwrap()).unwrap();
        assert_eq!(raster.layout(), ChannelLayout::Bgr);
        assert_eq!(raster.pixel(1, 1), &[50, 100, 200]);
        assert_eq!(raster.to_rgb_image(), rgb);
    }

    #[test]
    fn test_decode_rgba_keeps_alpha() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 4]));
        let raster = ImageCrateCodec.decode(&png_bytes(DynamicImage::ImageRgba8(rgba))).unwrap();

        assert_eq!(raster.layout(), ChannelLayout::Bgra);
        assert_eq!(raster.pixel(0, 0), &[3, 2, 1, 4]);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let result = ImageCrateCodec.load(Path::new("/nonexistent/site.png"));
        assert!(matches!(result, Err(MissionError::ImageLoad(_))));
    }

    #[test]
    fn test_garbage_bytes_is_load_error() {
        let result = ImageCrateCodec.decode(b"not an image");
        assert!(matches!(result, Err(MissionError::ImageLoad(_))));
    }
}
