use image::ImageFormat;
use shared::{HistogramData, PredictResponse, TrainingMetrics};

use crate::forensics::ela::{ELA_QUALITY, ElaAnalyzer, ElaOutput};
use crate::forensics::encode::{image_details, jpeg_data_url};
use crate::forensics::histogram::grayscale_histogram;
use crate::forensics::{self, ForensicsError};
use crate::inference::{Classifier, InferenceError, Prediction, preprocess};
use crate::metrics::GLOBAL_ACCURACY;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Forensics(#[from] ForensicsError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("Processing task failed: {0}")]
    Blocking(String),
}

pub struct AnalysisReport {
    pub prediction: Prediction,
    pub ela: ElaOutput,
    pub format: Option<ImageFormat>,
    pub width: u32,
    pub height: u32,
    pub histogram: HistogramData,
}

/// Decode, ELA, classify. The histogram is taken from the decoded original.
pub fn analyze(bytes: &[u8], classifier: &dyn Classifier) -> Result<AnalysisReport, AnalysisError> {
    let decoded = forensics::decode_image(bytes)?;
    let (width, height) = decoded.image.dimensions();

    let analyzer = ElaAnalyzer::new(ELA_QUALITY);
    let ela = analyzer.analyze(&decoded.image)?;
    log::debug!(
        "ELA at quality {}: max difference {}, scale {:.2}",
        analyzer.quality(),
        ela.max_difference,
        ela.scale
    );

    let input = preprocess::to_input_tensor(&ela.image);
    let probabilities = classifier.predict(&input)?;
    let prediction = Prediction::from_probabilities(&probabilities)?;
    log::debug!(
        "Class probabilities: authentic {:.4}, tempered {:.4}",
        prediction.authentic,
        prediction.tempered
    );

    Ok(AnalysisReport {
        prediction,
        ela,
        format: decoded.format,
        width,
        height,
        histogram: grayscale_histogram(&decoded.image),
    })
}

impl AnalysisReport {
    pub fn details(&self) -> String {
        image_details(self.format, self.width, self.height)
    }

    pub fn into_response(self, metrics: TrainingMetrics) -> Result<PredictResponse, AnalysisError> {
        Ok(PredictResponse {
            prediction: self.prediction.verdict,
            confidence: self.prediction.confidence_label(),
            accuracy: GLOBAL_ACCURACY.to_string(),
            ela_image: jpeg_data_url(&self.ela.image)?,
            image_details: self.details(),
            histogram: self.histogram,
            metrics,
        })
    }
}
