use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};

use super::ForensicsError;

const DATA_URL_QUALITY: u8 = 75;

/// Encodes `image` as a JPEG `data:` URL for embedding in JSON.
pub fn jpeg_data_url(image: &RgbImage) -> Result<String, ForensicsError> {
    let mut buffer = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, DATA_URL_QUALITY);
    encoder.encode_image(image)?;

    Ok(format!(
        "data:image/jpeg;base64,{}",
        STANDARD.encode(buffer.into_inner())
    ))
}

pub fn format_name(format: Option<ImageFormat>) -> String {
    let Some(format) = format else {
        return "None".to_string();
    };
    match format {
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::Ico => "ICO".to_string(),
        ImageFormat::Tga => "TGA".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

pub fn image_details(format: Option<ImageFormat>, width: u32, height: u32) -> String {
    format!(
        "Format: {} | Size: {}x{}px",
        format_name(format),
        width,
        height
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn data_url_decodes_back_to_a_jpeg_of_the_same_size() {
        let image = RgbImage::from_pixel(20, 10, Rgb([10, 200, 30]));
        let url = jpeg_data_url(&image).unwrap();

        let payload = url.strip_prefix("data:image/jpeg;base64,").unwrap();
        let bytes = STANDARD.decode(payload).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (20, 10));
    }

    #[test]
    fn details_use_upper_case_format_names() {
        assert_eq!(
            image_details(Some(ImageFormat::Jpeg), 640, 480),
            "Format: JPEG | Size: 640x480px"
        );
        assert_eq!(
            image_details(Some(ImageFormat::Png), 1, 2),
            "Format: PNG | Size: 1x2px"
        );
        assert_eq!(format_name(None), "None");
    }
}
