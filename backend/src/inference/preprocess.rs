use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::Array4;

/// Side length of the square frame the classifier was trained on.
pub const INPUT_SIZE: u32 = 128;

/// Resizes the ELA image and lays it out as a `(1, 128, 128, 3)` NHWC batch
/// scaled to `[-1, 1]`.
pub fn to_input_tensor(ela: &RgbImage) -> Array4<f32> {
    let side = INPUT_SIZE as usize;
    let resized = imageops::resize(ela, INPUT_SIZE, INPUT_SIZE, FilterType::CatmullRom);

    let mut input = Array4::<f32>::zeros((1, side, side, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            input[[0, y as usize, x as usize, c]] = scale_to_unit_range(pixel[c]);
        }
    }

    input
}

pub fn scale_to_unit_range(value: u8) -> f32 {
    f32::from(value) / 127.5 - 1.0
}
