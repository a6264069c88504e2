use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage};

use super::ForensicsError;

/// JPEG quality used for recompression by the service.
pub const ELA_QUALITY: u8 = 90;

pub struct ElaOutput {
    pub image: RgbImage,
    /// Largest per-channel difference after clamping to at least 1.
    pub max_difference: u8,
    pub scale: f32,
}

pub struct ElaAnalyzer {
    quality: u8,
}

impl Default for ElaAnalyzer {
    fn default() -> Self {
        Self::new(ELA_QUALITY)
    }
}

impl ElaAnalyzer {
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Recompresses `image` as JPEG and returns the brightness-stretched
    /// absolute difference between the original and the recompressed copy.
    pub fn analyze(&self, image: &RgbImage) -> Result<ElaOutput, ForensicsError> {
        let (width, height) = image.dimensions();
        let recompressed = self.recompress_jpeg(image)?;

        let mut difference = RgbImage::new(width, height);
        let mut max_difference = 0u8;

        for (x, y, orig) in image.enumerate_pixels() {
            let recomp = recompressed.get_pixel(x, y);
            let diff = Rgb([
                orig[0].abs_diff(recomp[0]),
                orig[1].abs_diff(recomp[1]),
                orig[2].abs_diff(recomp[2]),
            ]);
            max_difference = max_difference.max(diff[0]).max(diff[1]).max(diff[2]);
            difference.put_pixel(x, y, diff);
        }

        let max_difference = max_difference.max(1);
        let scale = amplification_scale(max_difference);

        for pixel in difference.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = (f32::from(*channel) * scale).round().min(255.0) as u8;
            }
        }

        Ok(ElaOutput {
            image: difference,
            max_difference,
            scale,
        })
    }

    fn recompress_jpeg(&self, image: &RgbImage) -> Result<RgbImage, ForensicsError> {
        let mut buffer = Cursor::new(Vec::new());

        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
        encoder.encode_image(image)?;

        let recompressed =
            image::load_from_memory_with_format(&buffer.into_inner(), ImageFormat::Jpeg)?;

        Ok(recompressed.to_rgb8())
    }
}

/// Brightness factor that maps `max_difference` to full intensity.
/// A zero difference is treated as 1.
pub fn amplification_scale(max_difference: u8) -> f32 {
    255.0 / f32::from(max_difference.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = ((x * 37 + y * 91) ^ (x * y)) % 256;
            Rgb([v as u8, (255 - v) as u8, ((v * 7) % 256) as u8])
        })
    }

    #[test]
    fn default_analyzer_uses_quality_90() {
        assert_eq!(ElaAnalyzer::default().quality(), 90);
    }

    #[test]
    fn output_keeps_input_dimensions() {
        let analyzer = ElaAnalyzer::default();
        for (w, h) in [(1, 1), (37, 23), (128, 64)] {
            let out = analyzer.analyze(&textured(w, h)).unwrap();
            assert_eq!(out.image.dimensions(), (w, h));
        }
    }

    #[test]
    fn zero_difference_does_not_divide_by_zero() {
        assert_eq!(amplification_scale(0), 255.0);
        assert_eq!(amplification_scale(1), 255.0);
        assert_eq!(amplification_scale(255), 1.0);
    }

    #[test]
    fn flat_image_yields_finite_scale() {
        let flat = RgbImage::from_pixel(32, 32, Rgb([0, 0, 0]));
        let out = ElaAnalyzer::default().analyze(&flat).unwrap();
        assert!(out.max_difference >= 1);
        assert!(out.scale.is_finite());
        assert_eq!(out.image.dimensions(), (32, 32));
    }

    #[test]
    fn strongest_difference_maps_to_full_intensity() {
        let out = ElaAnalyzer::default().analyze(&textured(64, 64)).unwrap();
        let brightest = out
            .image
            .pixels()
            .flat_map(|p| p.0)
            .max()
            .unwrap();
        assert!(out.max_difference > 1);
        assert_eq!(brightest, 255);
    }
}
