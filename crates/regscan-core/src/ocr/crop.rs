//! Plate-region pre-crop.
//!
//! A pure pre-filter to improve OCR odds: find the large, elongated shape a
//! Danish plate presents on a photo and hand the engine just that region.
//! Absence of a crop is normal; the scanner falls back to the full image.

use image::DynamicImage;
use imageproc::contours::{Contour, find_contours};
use imageproc::edges::canny;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Locates the sub-image believed to contain the plate.
pub trait RegionCropper: Send + Sync {
    fn locate_plate_region(&self, image: &DynamicImage) -> Option<DynamicImage>;
}

/// Thresholds for the edge-detection cropper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Canny low threshold.
    pub canny_low: f32,

    /// Canny high threshold.
    pub canny_high: f32,

    /// How many of the largest contours to inspect.
    pub top_contours: usize,

    /// Minimum width/height ratio (exclusive).
    pub min_aspect: f32,

    /// Maximum width/height ratio (exclusive).
    pub max_aspect: f32,

    /// Minimum region width in pixels.
    pub min_width: u32,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            canny_low: 100.0,
            canny_high: 200.0,
            top_contours: 15,
            min_aspect: 2.0,
            max_aspect: 6.0,
            min_width: 100,
        }
    }
}

/// Edge-contour plate locator.
///
/// Grayscale, Canny edges, contour trace, then the first of the largest
/// bounding rects that is plate-shaped wins.
pub struct EdgeCropper {
    config: CropConfig,
}

impl EdgeCropper {
    pub fn new(config: CropConfig) -> Self {
        Self { config }
    }
}

impl Default for EdgeCropper {
    fn default() -> Self {
        Self::new(CropConfig::default())
    }
}

/// Axis-aligned bounding rect of a contour.
fn bounding_rect(contour: &Contour<u32>) -> Option<(u32, u32, u32, u32)> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &contour.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

impl RegionCropper for EdgeCropper {
    fn locate_plate_region(&self, image: &DynamicImage) -> Option<DynamicImage> {
        let gray = image.to_luma8();
        let edges = canny(&gray, self.config.canny_low, self.config.canny_high);

        let mut rects: Vec<(u32, u32, u32, u32)> = find_contours::<u32>(&edges)
            .iter()
            .filter_map(bounding_rect)
            .collect();

        // Largest shapes first
        rects.sort_by_key(|&(_, _, w, h)| std::cmp::Reverse(u64::from(w) * u64::from(h)));

        for &(x, y, w, h) in rects.iter().take(self.config.top_contours) {
            if h == 0 {
                continue;
            }
            let aspect = w as f32 / h as f32;
            if aspect > self.config.min_aspect
                && aspect < self.config.max_aspect
                && w > self.config.min_width
            {
                debug!(x, y, w, h, aspect, "plate region located");
                return Some(image.crop_imm(x, y, w, h));
            }
        }

        debug!("no plate-shaped region found");
        None
    }
}
