pub mod ela;
pub mod encode;
pub mod histogram;

use std::io::Cursor;

use image::{ImageFormat, ImageReader, RgbImage};

#[derive(Debug, thiserror::Error)]
pub enum ForensicsError {
    #[error("{0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct DecodedImage {
    /// Container format sniffed from the leading bytes.
    pub format: Option<ImageFormat>,
    pub image: RgbImage,
}

pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, ForensicsError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format();
    let image = reader.decode()?.to_rgb8();
    Ok(DecodedImage { format, image })
}
