use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageOutputFormat};

use super::upload::UploadError;

/// Target size for an image whose larger side exceeds `max`, or `None`
/// when it already fits.  The larger side becomes exactly `max`; the other
/// is scaled proportionally and rounded down (never below 1).
pub fn fit_within(width: u32, height: u32, max: u32) -> Option<(u32, u32)> {
    if width <= max && height <= max {
        return None;
    }
    let scale = |side: u32, larger: u32| ((side as u64 * max as u64) / larger as u64).max(1) as u32;
    if width >= height {
        Some((max, scale(height, width)))
    } else {
        Some((scale(width, height), max))
    }
}

/// Decodes `bytes` and, if needed, downsizes and re-encodes them in their
/// original format.  Returns `None` when the image already fits.
pub fn downscale(bytes: &[u8], max: u32) -> Result<Option<Vec<u8>>, UploadError> {
    let format = image::guess_format(bytes).map_err(|_| UploadError::Unreadable)?;
    let img = image::load_from_memory_with_format(bytes, format).map_err(|_| UploadError::Unreadable)?;

    let Some((w, h)) = fit_within(img.width(), img.height(), max) else {
        return Ok(None);
    };
    let resized = img.resize_exact(w, h, FilterType::Triangle);
    encode(resized, format).map(Some)
}

fn encode(img: DynamicImage, format: ImageFormat) -> Result<Vec<u8>, UploadError> {
    // JPEG has no alpha channel.
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageOutputFormat::from(format))
        .map_err(UploadError::Encode)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn encoded(w: u32, h: u32, format: ImageOutputFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(w, h)).write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn small_images_are_untouched() {
        assert_eq!(fit_within(800, 600, 800), None);
        assert_eq!(fit_within(10, 10, 800), None);
        assert_eq!(downscale(&encoded(20, 10, ImageOutputFormat::Png), 800).unwrap(), None);
    }

    #[test]
    fn larger_side_becomes_max() {
        assert_eq!(fit_within(1600, 1200, 800), Some((800, 600)));
        assert_eq!(fit_within(1000, 3000, 800), Some((266, 800)));
        assert_eq!(fit_within(5000, 3, 800), Some((800, 1)));
    }

    #[test]
    fn aspect_ratio_is_kept_within_rounding() {
        for (w, h) in [(1234, 987), (801, 799), (3000, 4000), (999, 1001)] {
            let (nw, nh) = fit_within(w, h, 800).unwrap();
            let before = w as f64 / h as f64;
            let after = nw as f64 / nh as f64;
            let tolerance = before / nh.min(nw) as f64 + 1e-9;
            assert!((before - after).abs() <= tolerance * 2.0, "{w}x{h} -> {nw}x{nh}");
        }
    }

    #[test]
    fn downscale_reencodes_in_same_format() {
        let out = downscale(&encoded(1600, 400, ImageOutputFormat::Jpeg(90)), 800)
            .unwrap()
            .unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (800, 200));
    }

    #[test]
    fn garbage_is_unreadable() {
        assert!(matches!(downscale(b"not an image", 800), Err(UploadError::Unreadable)));
    }
}
