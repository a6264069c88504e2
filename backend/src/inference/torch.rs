use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use tch::{CModule, Device, Kind, Tensor};

use super::{Classifier, InferenceError};

impl From<tch::TchError> for InferenceError {
    fn from(err: tch::TchError) -> Self {
        InferenceError::Model(err.to_string())
    }
}

/// TorchScript export of the forgery classifier.
pub struct TorchClassifier {
    model: Mutex<CModule>,
    device: Device,
    apply_softmax: bool,
}

impl TorchClassifier {
    pub fn load(model_path: &Path, apply_softmax: bool) -> Result<Self, InferenceError> {
        if !model_path.is_file() {
            return Err(InferenceError::MissingArtifact(
                model_path.display().to_string(),
            ));
        }

        let device = Device::cuda_if_available();
        let model = CModule::load_on_device(model_path, device)?;
        log::debug!("TorchScript module loaded on {:?}", device);

        Ok(Self {
            model: Mutex::new(model),
            device,
            apply_softmax,
        })
    }
}

impl Classifier for TorchClassifier {
    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let shape: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_slice(&data)
            .view(shape.as_slice())
            .to_device(self.device);

        let model = self.model.lock().map_err(|_| InferenceError::LockPoisoned)?;
        let output = tch::no_grad(|| model.forward_ts(&[tensor]))?;
        let output = if self.apply_softmax {
            output.softmax(-1, Kind::Float)
        } else {
            output
        };

        let output_flat = output.to_kind(Kind::Float).to_device(Device::Cpu).reshape([-1]);
        let num_elements = output_flat.size()[0] as usize;
        let mut output_vec = vec![0.0f32; num_elements];
        output_flat.f_copy_data(&mut output_vec, num_elements)?;
        Ok(output_vec)
    }
}
