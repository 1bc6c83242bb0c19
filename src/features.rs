//! Scalar visual statistics used to caption an uploaded photo.
//!
//! Colour statistics follow the 8-bit HSV convention: hue in [0, 180),
//! saturation and value in [0, 255].

use image::{GrayImage, Luma, RgbImage};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Gradient thresholds handed to the Canny operator.
pub const CANNY_LOW: f32 = 100.0;
pub const CANNY_HIGH: f32 = 200.0;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },
}

/// Per-image statistics.  Scoped to one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
    /// Standard deviation of grayscale intensities.
    pub contrast: f64,
    /// Fraction of pixels marked as edges.
    pub edge_density: f64,
    /// Mean of the green channel.
    pub green_intensity: f64,
}

/// Decodes `bytes` and measures the feature vector.
pub fn extract(bytes: &[u8]) -> Result<FeatureVector, FeatureError> {
    let img = image::load_from_memory(bytes)?;
    let features = extract_from_rgb(&img.to_rgb8());
    if let Err(err) = &features {
        warn!(error = %err, "feature extraction failed");
    }
    features
}

pub fn extract_from_rgb(rgb: &RgbImage) -> Result<FeatureVector, FeatureError> {
    let (width, height) = rgb.dimensions();
    let total = width as usize * height as usize;
    if total == 0 {
        return Err(FeatureError::EmptyRaster { width, height });
    }

    let mut hsv_sum = [0.0f64; 3];
    let mut green_sum = 0.0;
    for px in rgb.pixels() {
        let [r, g, b] = px.0;
        let (h, s, v) = rgb_to_hsv(r, g, b);
        hsv_sum[0] += h as f64;
        hsv_sum[1] += s as f64;
        hsv_sum[2] += v as f64;
        green_sum += g as f64;
    }
    let n = total as f64;

    let gray = to_gray(rgb);
    let edges = imageproc::edges::canny(&gray, CANNY_LOW, CANNY_HIGH);

    Ok(FeatureVector {
        hue: hsv_sum[0] / n,
        saturation: hsv_sum[1] / n,
        value: hsv_sum[2] / n,
        contrast: std_dev(gray.as_raw()),
        edge_density: edge_density(&edges),
        green_intensity: green_sum / n,
    })
}

/// Converts one 8-bit RGB pixel to 8-bit HSV (H halved to fit [0, 180)).
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (r as f64, g as f64, b as f64);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let diff = max - min;

    let s = if max == 0.0 { 0.0 } else { 255.0 * diff / max };
    let mut h = if diff == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / diff
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    let h8 = ((h / 2.0).round() as u16 % 180) as u8;
    (h8, s.round() as u8, max as u8)
}

/// Luma with the 0.299/0.587/0.114 weights.
fn to_gray(rgb: &RgbImage) -> GrayImage {
    let (w, h) = rgb.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let l = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        Luma([l.round().min(255.0) as u8])
    })
}

/// Population standard deviation.
fn std_dev(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

/// Share of non-zero pixels in an edge map; 0 for an empty map.
pub fn edge_density(edges: &GrayImage) -> f64 {
    let total = edges.as_raw().len();
    if total == 0 {
        return 0.0;
    }
    let marked = edges.as_raw().iter().filter(|&&p| p > 0).count();
    marked as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb};
    use std::io::Cursor;

    fn png(img: RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn hsv_of_primaries() {
        assert_eq!(rgb_to_hsv(255, 0, 0), (0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), (60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), (120, 255, 255));
        assert_eq!(rgb_to_hsv(128, 128, 128), (0, 0, 128));
        assert_eq!(rgb_to_hsv(0, 0, 0), (0, 0, 0));
    }

    #[test]
    fn flat_green_image() {
        let f = extract(&png(RgbImage::from_pixel(16, 16, Rgb([0, 200, 0])))).unwrap();
        assert_eq!(f.hue, 60.0);
        assert_eq!(f.saturation, 255.0);
        assert_eq!(f.value, 200.0);
        assert_eq!(f.green_intensity, 200.0);
        assert_eq!(f.contrast, 0.0);
        assert_eq!(f.edge_density, 0.0);
    }

    #[test]
    fn split_image_has_contrast_and_edges() {
        let img = RgbImage::from_fn(32, 32, |x, _| {
            if x < 16 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let f = extract(&png(img)).unwrap();
        assert!((f.contrast - 127.5).abs() < 1e-9);
        assert!(f.edge_density > 0.0 && f.edge_density < 0.5);
    }

    #[test]
    fn undecodable_bytes_are_an_error() {
        assert!(matches!(extract(b"nope"), Err(FeatureError::Decode(_))));
    }

    #[test]
    fn empty_raster_is_reported() {
        let err = extract_from_rgb(&RgbImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, FeatureError::EmptyRaster { width: 0, height: 0 }));
    }

    #[test]
    fn empty_edge_map_has_zero_density() {
        assert_eq!(edge_density(&GrayImage::new(0, 0)), 0.0);
    }
}
