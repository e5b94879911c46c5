use image::{GrayImage, Luma};
use crate::{algorithms::LabelMap, config::ExtractionConfig, types::BinaryMask};

/// Drops components whose area is below `min_area`; equal areas are kept
#[derive(Debug, Clone, Copy)]
pub struct AreaFilter {
    pub min_area: u32,
}

impl Default for AreaFilter {
    fn default() -> Self {
        Self { min_area: ExtractionConfig::DEFAULT_MIN_AREA }
    }
}

impl AreaFilter {
    pub fn new(min_area: u32) -> Self {
        Self { min_area }
    }

    pub fn retains(&self, area: u32) -> bool {
        area >= self.min_area
    }

    pub fn apply(&self, map: &LabelMap) -> BinaryMask {
        let labels = map.labels();
        let plane = GrayImage::from_fn(labels.width(), labels.height(), |x, y| {
            let label = labels.get_pixel(x, y)[0];
            let keep = label != 0 && self.retains(map.area_of(label));
            Luma([u8::from(keep)])
        });
        BinaryMask::from_binary(plane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::LabelImage;

    #[test]
    fn test_boundary_area_is_kept() {
        // label 1 has area 2, label 2 has area 1
        let labels = LabelImage::from_raw(4, 1, vec![1, 1, 0, 2]).unwrap();
        let map = LabelMap::from_labels(labels);

        let mask = AreaFilter::new(2).apply(&map);
        assert!(mask.is_foreground(0, 0));
        assert!(mask.is_foreground(1, 0));
        assert!(!mask.is_foreground(3, 0));
        assert_eq!(mask.foreground_count(), 2);
    }

    #[test]
    fn test_zero_min_area_keeps_all_foreground() {
        let labels = LabelImage::from_raw(3, 1, vec![1, 0, 2]).unwrap();
        let mask = AreaFilter::new(0).apply(&LabelMap::from_labels(labels));
        assert_eq!(mask.as_image().as_raw(), &vec![1, 0, 1]);
    }
}
