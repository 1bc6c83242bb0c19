//! Image preprocessing for network inference.
//!
//! Decodes image bytes (PNG/JPEG/BMP/GIF), resizes them to the model's fixed
//! geometry and scales channel values according to the model's normalization.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::network::{InputType, Normalization};

/// Resizes `image` to the geometry in `input_type` and flattens it, row by
/// row, as L or R,G,B values passed through `normalization`.
///
/// Returns a `Vec<f64>` of length `input_type.input_len()`.
pub fn image_to_input(
    image: &DynamicImage,
    input_type: &InputType,
    normalization: Normalization,
) -> Vec<f64> {
    let (width, height) = input_type.dimensions();
    let resized = image.resize_exact(width, height, FilterType::Triangle);
    match input_type {
        InputType::ImageGrayscale { .. } => resized
            .to_luma8()
            .pixels()
            .map(|p| normalization.apply(p.0[0]))
            .collect(),
        InputType::ImageRgb { .. } => resized
            .to_rgb8()
            .pixels()
            .flat_map(|p| p.0.into_iter().map(move |c| normalization.apply(c)))
            .collect(),
    }
}

/// Decodes `bytes` and prepares them for the model in one step.
pub fn image_bytes_to_input(
    bytes: &[u8],
    input_type: &InputType,
    normalization: Normalization,
) -> Result<Vec<f64>, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    Ok(image_to_input(&img, input_type, normalization))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(img: RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn rgb_input_has_three_values_per_pixel() {
        let img = RgbImage::from_pixel(10, 6, Rgb([255, 0, 0]));
        let input = image_bytes_to_input(
            &png_bytes(img),
            &InputType::ImageRgb { width: 4, height: 3 },
            Normalization::Unit,
        )
        .unwrap();
        assert_eq!(input.len(), 36);
        assert!((input[0] - 1.0).abs() < 1e-9);
        assert!(input[1].abs() < 1e-9);
    }

    #[test]
    fn symmetric_normalization_spans_minus_one_to_one() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([0, 255, 0])));
        let input = image_to_input(
            &img,
            &InputType::ImageRgb { width: 2, height: 2 },
            Normalization::Symmetric,
        );
        assert!((input[0] + 1.0).abs() < 1e-9);
        assert!((input[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn grayscale_input_uses_one_channel() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 255, 255])));
        let input = image_to_input(
            &img,
            &InputType::ImageGrayscale { width: 3, height: 3 },
            Normalization::Raw,
        );
        assert_eq!(input, vec![255.0; 9]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = image_bytes_to_input(
            b"definitely not an image",
            &InputType::ImageRgb { width: 2, height: 2 },
            Normalization::Unit,
        );
        assert!(result.is_err());
    }
}
