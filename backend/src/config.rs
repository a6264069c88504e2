use std::env;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub metrics_path: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub apply_softmax: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            model_path: PathBuf::from("models/forgery_model.pt"),
            metrics_path: PathBuf::from("static/accuracy.json"),
            static_dir: PathBuf::from("static"),
            max_upload_bytes: 50 * 1024 * 1024,
            apply_softmax: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// the defaults for every missing key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => parse_value("PORT", value)?,
            None => defaults.port,
        };
        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(value) => parse_value("MAX_UPLOAD_BYTES", value)?,
            None => defaults.max_upload_bytes,
        };
        let apply_softmax = match lookup("MODEL_APPLY_SOFTMAX") {
            Some(value) => parse_flag("MODEL_APPLY_SOFTMAX", value)?,
            None => defaults.apply_softmax,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            metrics_path: lookup("METRICS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.metrics_path),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            max_upload_bytes,
            apply_softmax,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.model_path, PathBuf::from("models/forgery_model.pt"));
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
        assert!(!config.apply_softmax);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8081"),
            ("MODEL_PATH", "/srv/model.pt"),
            ("MODEL_APPLY_SOFTMAX", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8081");
        assert_eq!(config.model_path, PathBuf::from("/srv/model.pt"));
        assert!(config.apply_softmax);
    }

    #[test]
    fn malformed_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
