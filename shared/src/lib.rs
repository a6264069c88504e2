use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Verdict {
    Authentic,
    Tempered,
}

impl Verdict {
    /// Maps a class index of the two-class model to its label.
    pub fn from_class_index(index: usize) -> Self {
        if index == 1 {
            Verdict::Tempered
        } else {
            Verdict::Authentic
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramData {
    pub labels: Vec<u8>,
    pub values: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub train_accuracy: String,
    pub val_accuracy: String,
    pub train_loss: String,
    pub val_loss: String,
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self {
            train_accuracy: "96.5%".to_string(),
            val_accuracy: "94.2%".to_string(),
            train_loss: "0.12".to_string(),
            val_loss: "0.15".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Verdict,
    pub confidence: String,
    pub accuracy: String,
    pub ela_image: String,
    pub image_details: String,
    pub histogram: HistogramData,
    #[serde(flatten)]
    pub metrics: TrainingMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn verdict_display_round_trips_through_from_str() {
        assert_eq!(Verdict::Tempered.to_string(), "Tempered");
        assert_eq!(Verdict::from_str("Authentic").unwrap(), Verdict::Authentic);
    }

    #[test]
    fn class_index_one_is_tempered() {
        assert_eq!(Verdict::from_class_index(0), Verdict::Authentic);
        assert_eq!(Verdict::from_class_index(1), Verdict::Tempered);
    }

    #[test]
    fn metrics_are_flattened_into_response() {
        let response = PredictResponse {
            prediction: Verdict::Authentic,
            confidence: "88.00%".to_string(),
            accuracy: "95.2%".to_string(),
            ela_image: "data:image/jpeg;base64,".to_string(),
            image_details: "Format: PNG | Size: 1x1px".to_string(),
            histogram: HistogramData {
                labels: vec![0],
                values: vec![1],
            },
            metrics: TrainingMetrics::default(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["prediction"], "Authentic");
        assert_eq!(value["train_accuracy"], "96.5%");
        assert_eq!(value["val_loss"], "0.15");
        assert!(value.get("metrics").is_none());
    }
}
