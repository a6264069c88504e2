use std::fs;
use std::path::Path;

use shared::TrainingMetrics;

/// Headline accuracy reported with every prediction.
pub const GLOBAL_ACCURACY: &str = "95.2%";

/// Reads the training metrics file, falling back to the built-in figures when
/// it is missing or unreadable.
pub fn load_static_metrics(path: &Path) -> TrainingMetrics {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::debug!("Metrics file {} not read ({}), using fallback", path.display(), e);
            return TrainingMetrics::default();
        }
    };

    serde_json::from_str(&contents).unwrap_or_else(|e| {
        log::warn!("Malformed metrics file {}: {}", path.display(), e);
        TrainingMetrics::default()
    })
}
