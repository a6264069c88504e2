use actix_files::{Files, NamedFile};
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use futures::{StreamExt, TryStreamExt};
use log::{error, info};
use shared::{ErrorResponse, PredictResponse};

use crate::config::AppConfig;
use crate::inference::ModelState;
use crate::metrics::load_static_metrics;
use crate::pipeline::{self, AnalysisError};

pub fn configure_routes(cfg: &mut web::ServiceConfig, config: &AppConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/predict").route(web::post().to(predict)))
        .service(Files::new("/static", config.static_dir.clone()));
}

#[derive(Debug, thiserror::Error)]
enum UploadError {
    #[error("No file uploaded")]
    Missing,
    #[error("No file selected")]
    Empty,
    #[error("File too large")]
    TooLarge,
    #[error("Malformed upload: {0}")]
    Malformed(String),
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

impl ResponseError for AnalysisError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

struct Upload {
    file_name: String,
    data: Vec<u8>,
}

/// Pulls the first part named `file` that carries a filename. Every other
/// part is drained and discarded.
async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Upload, UploadError> {
    let mut upload: Option<Upload> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let file_name = match (
            field.name(),
            field.content_disposition().and_then(|cd| cd.get_filename()),
        ) {
            (Some("file"), Some(name)) if upload.is_none() => Some(name.to_string()),
            _ => None,
        };

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
            if file_name.is_some() {
                if data.len() + chunk.len() > limit {
                    return Err(UploadError::TooLarge);
                }
                data.extend_from_slice(&chunk);
            }
        }

        if let Some(file_name) = file_name {
            upload = Some(Upload { file_name, data });
        }
    }

    let upload = upload.ok_or(UploadError::Missing)?;
    if upload.file_name.is_empty() || upload.data.is_empty() {
        return Err(UploadError::Empty);
    }
    Ok(upload)
}

async fn index(config: web::Data<AppConfig>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open_async(config.static_dir.join("index.html")).await?)
}

async fn predict(
    req: HttpRequest,
    model: web::Data<ModelState>,
    config: web::Data<AppConfig>,
    payload: web::Payload,
) -> Result<HttpResponse, actix_web::Error> {
    // Non-multipart bodies surface as an empty part stream, not an extractor error.
    let multipart = Multipart::new(req.headers(), payload);
    let upload = read_upload(multipart, config.max_upload_bytes).await?;
    info!(
        "Received {} ({} bytes) for prediction",
        upload.file_name,
        upload.data.len()
    );

    match run_prediction(&model, &config, upload.data).await {
        Ok(response) => {
            info!(
                "{}: {} ({})",
                upload.file_name, response.prediction, response.confidence
            );
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            error!("Error processing image {}: {}", upload.file_name, e);
            Err(e.into())
        }
    }
}

async fn run_prediction(
    model: &ModelState,
    config: &AppConfig,
    data: Vec<u8>,
) -> Result<PredictResponse, AnalysisError> {
    let classifier = model.classifier()?;
    let metrics_path = config.metrics_path.clone();

    web::block(move || {
        let report = pipeline::analyze(&data, classifier.as_ref())?;
        report.into_response(load_static_metrics(&metrics_path))
    })
    .await
    .map_err(|e| AnalysisError::Blocking(e.to_string()))?
}
