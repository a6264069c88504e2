use image::{GrayImage, Luma, RgbImage};
use shared::HistogramData;

/// ITU-R 601-2 luma in 16.16 fixed point, rounded.
pub fn rgb_to_gray(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut gray = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let lum = (u32::from(pixel[0]) * 19595
            + u32::from(pixel[1]) * 38470
            + u32::from(pixel[2]) * 7471
            + 0x8000)
            >> 16;
        gray.put_pixel(x, y, Luma([lum as u8]));
    }

    gray
}

pub fn calculate_histogram(image: &GrayImage) -> [u32; 256] {
    let mut histogram = [0u32; 256];

    for pixel in image.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    histogram
}

pub fn grayscale_histogram(image: &RgbImage) -> HistogramData {
    let histogram = calculate_histogram(&rgb_to_gray(image));
    HistogramData {
        labels: (0..=255u8).collect(),
        values: histogram.to_vec(),
    }
}
