use std::collections::BTreeMap;

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use crate::{error::Result, traits::ComponentLabeler, types::Region};

pub type LabelImage = ImageBuffer<Luma<u32>, Vec<u32>>;

/// Per-pixel component labels (0 = background) with the area of each label
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: LabelImage,
    areas: BTreeMap<u32, u32>,
}

impl LabelMap {
    /// Measure a label image. Labels need not be contiguous or small.
    pub fn from_labels(labels: LabelImage) -> Self {
        let mut areas = BTreeMap::new();
        for p in labels.pixels().filter(|p| p[0] != 0) {
            *areas.entry(p[0]).or_insert(0u32) += 1;
        }

        Self { labels, areas }
    }

    pub fn labels(&self) -> &LabelImage {
        &self.labels
    }

    pub fn label_at(&self, x: u32, y: u32) -> u32 {
        self.labels.get_pixel(x, y)[0]
    }

    pub fn area_of(&self, label: u32) -> u32 {
        self.areas.get(&label).copied().unwrap_or(0)
    }

    /// Components present in the map, ordered by label.
    pub fn regions(&self) -> Vec<Region> {
        self.areas
            .iter()
            .map(|(&label, &area)| Region { label, area })
            .collect()
    }
}

/// Imageproc-based 8-connected labeler
#[derive(Debug, Clone, Default)]
pub struct ImageprocLabeler;

impl ComponentLabeler for ImageprocLabeler {
    fn label(&self, binary: &GrayImage) -> Result<LabelMap> {
        let labels = connected_components(binary, Connectivity::Eight, Luma([0u8]));
        Ok(LabelMap::from_labels(labels))
    }
}
